//! Error types for the lingo interpreter and translation service.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use strsim::levenshtein;
use thiserror::Error;

use crate::parser::ParseError;

/// Errors produced while fetching a language's dictionary.
///
/// Load outcomes are shared by every caller waiting on the same language, so
/// this type is `Clone`.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// File I/O error when reading a dictionary file.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    /// The dictionary file is not a valid dictionary.
    #[error("{path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The loader has nothing for this language.
    #[error("no translations for language '{language}'")]
    NotFound { language: String },

    /// Any other loader-specific failure.
    #[error("{message}")]
    Other { message: String },
}

/// Errors surfaced by [`TranslateService::wait_for_translation`].
///
/// [`TranslateService::wait_for_translation`]: crate::TranslateService::wait_for_translation
#[derive(Debug, Clone, Error)]
pub enum TranslateError {
    /// The requested language is not accepted by the configuration.
    #[error("Language not provided")]
    LanguageNotProvided { language: String },

    /// The loader failed for this language.
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// An error that occurred while evaluating an embedded expression.
///
/// These never escape interpolation; a failing expression renders as the
/// empty string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Reference to a variable that is not in the context.
    #[error("'{name}' is not defined")]
    UndefinedVariable { name: String },

    /// Property access or call on null.
    #[error("cannot read property '{property}' of null")]
    NullAccess { property: String },

    /// Call of something that is not a known method.
    #[error("'{name}' is not a function")]
    UnknownFunction { name: String },

    /// Operator applied to unsupported operand types.
    #[error("cannot apply '{op}' to {lhs} and {rhs}")]
    TypeMismatch {
        op: String,
        lhs: &'static str,
        rhs: &'static str,
    },

    /// The expression could not be parsed.
    #[error(transparent)]
    Syntax(#[from] ParseError),

    /// A message nests itself, directly or through other messages.
    #[error("cyclic reference detected: {}", chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    /// Nested translations went deeper than the allowed limit.
    #[error("maximum nesting depth exceeded")]
    MaxDepthExceeded,
}

/// Suggest close matches for `key` among `available`, closest first.
///
/// At most three suggestions are returned. Keys of up to three characters
/// allow one edit, longer keys allow two.
pub fn compute_suggestions(key: &str, available: &[String]) -> Vec<String> {
    let max_distance = if key.len() <= 3 { 1 } else { 2 };
    let mut candidates: Vec<(usize, &String)> = available
        .iter()
        .map(|candidate| (levenshtein(key, candidate), candidate))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    candidates.sort();
    candidates
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}
