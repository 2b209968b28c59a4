//! Loaders fetch a language's dictionary.
//!
//! The translation service calls [`Loader::load`] at most once per language
//! and shares the resulting future between all callers, so loaders do not
//! need caching of their own.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use bon::Builder;
use futures::FutureExt;
use futures::future::{self, BoxFuture};
use tokio::fs;
use tracing::debug;

use crate::interpreter::LoadError;
use crate::types::Dictionary;

/// Fetches the dictionary for a language tag.
///
/// The returned future must be `'static`; implementations clone whatever
/// they need out of `self` before building it.
///
/// `load` is called while the cache holds its entry lock. It must not call
/// back into the same [`LanguageCache`] or [`TranslateService`] synchronously;
/// doing so deadlocks. Calls made from inside the returned future are fine.
///
/// [`LanguageCache`]: crate::LanguageCache
/// [`TranslateService`]: crate::TranslateService
pub trait Loader: Send + Sync {
    fn load(&self, language: &str) -> BoxFuture<'static, Result<Dictionary, LoadError>>;
}

impl<F> Loader for F
where
    F: Fn(&str) -> BoxFuture<'static, Result<Dictionary, LoadError>> + Send + Sync,
{
    fn load(&self, language: &str) -> BoxFuture<'static, Result<Dictionary, LoadError>> {
        self(language)
    }
}

/// Serves dictionaries held in memory.
///
/// # Example
///
/// ```
/// use lingo::{Dictionary, StaticLoader};
///
/// let loader = StaticLoader::new()
///     .with("en", [("HELLO", "Hello")].into_iter().collect::<Dictionary>());
/// assert!(loader.contains("en"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    dictionaries: HashMap<String, Arc<Dictionary>>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dictionary for `language`, replacing any previous one.
    pub fn with(mut self, language: impl Into<String>, dictionary: Dictionary) -> Self {
        self.insert(language, dictionary);
        self
    }

    pub fn insert(&mut self, language: impl Into<String>, dictionary: Dictionary) {
        self.dictionaries
            .insert(language.into(), Arc::new(dictionary));
    }

    pub fn contains(&self, language: &str) -> bool {
        self.dictionaries.contains_key(language)
    }
}

impl Loader for StaticLoader {
    fn load(&self, language: &str) -> BoxFuture<'static, Result<Dictionary, LoadError>> {
        let result = self
            .dictionaries
            .get(language)
            .map(|dictionary| Dictionary::clone(dictionary))
            .ok_or_else(|| LoadError::NotFound {
                language: language.to_string(),
            });
        future::ready(result).boxed()
    }
}

/// Reads `<directory>/<language><extension>` JSON files.
///
/// Nested JSON objects are flattened into dotted keys.
///
/// # Example
///
/// ```
/// use lingo::FileLoader;
///
/// let loader = FileLoader::builder().directory("i18n").build();
/// assert_eq!(loader.path_for("de").to_str(), Some("i18n/de.json"));
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct FileLoader {
    /// Directory holding one file per language.
    #[builder(into)]
    directory: PathBuf,

    /// File name suffix, including the dot.
    #[builder(default = ".json".to_string())]
    extension: String,
}

impl FileLoader {
    /// The file read for `language`.
    pub fn path_for(&self, language: &str) -> PathBuf {
        self.directory.join(format!("{language}{}", self.extension))
    }
}

impl Loader for FileLoader {
    fn load(&self, language: &str) -> BoxFuture<'static, Result<Dictionary, LoadError>> {
        let path = self.path_for(language);
        async move {
            debug!(path = %path.display(), "reading dictionary");
            let content = fs::read_to_string(&path)
                .await
                .map_err(|e| LoadError::Io {
                    path: path.clone(),
                    source: Arc::new(e),
                })?;
            Dictionary::from_json(&content).map_err(|e| LoadError::Parse {
                path,
                message: e.to_string(),
            })
        }
        .boxed()
    }
}
