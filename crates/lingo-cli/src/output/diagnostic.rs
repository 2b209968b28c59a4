//! Miette diagnostics for dictionary files.

use std::path::Path;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A problem located in a dictionary file or one of its templates.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(lingo::check))]
pub struct LingoDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("{label}")]
    span: SourceSpan,

    label: String,

    message: String,

    #[help]
    help: Option<String>,
}

impl LingoDiagnostic {
    /// A JSON syntax error, pointing at the line and column serde reports.
    pub fn from_json_error(path: &Path, content: &str, err: &serde_json::Error) -> Self {
        let offset = byte_offset(content, err.line(), err.column());
        LingoDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: (offset, 1).into(),
            label: "error here".to_string(),
            message: format!("invalid JSON: {err}"),
            help: None,
        }
    }

    /// An expression inside the template of `key` that does not parse.
    ///
    /// The template itself is shown as the source, since JSON escaping makes
    /// offsets into the file unreliable.
    pub fn from_expression(
        path: &Path,
        key: &str,
        template: &str,
        expression: &str,
        message: &str,
    ) -> Self {
        let offset = template.find(expression).unwrap_or(0);
        LingoDiagnostic {
            src: NamedSource::new(format!("{}: {key}", path.display()), template.to_string()),
            span: (offset, expression.len().max(1)).into(),
            label: message.to_string(),
            message: format!("invalid expression in '{key}'"),
            help: Some("the expression renders as an empty string".to_string()),
        }
    }
}

/// Convert a 1-based line and column to a byte offset, clamped to the content.
fn byte_offset(content: &str, line: usize, column: usize) -> usize {
    let offset = content
        .lines()
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum::<usize>()
        + column.saturating_sub(1);
    offset.min(content.len().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_counts_previous_lines() {
        assert_eq!(byte_offset("ab\ncd", 2, 2), 4);
        assert_eq!(byte_offset("ab", 9, 9), 1);
    }
}
