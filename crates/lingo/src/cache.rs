//! Per-language dictionary cache.
//!
//! Each language tag gets exactly one entry, created on first request. The
//! entry holds the loader's future wrapped in [`Shared`], so every caller for
//! that tag observes the same load, before and after it settles. Entries are
//! never evicted or refreshed.
//!
//! When created inside a tokio runtime, a load is spawned onto it and runs to
//! completion even if every caller drops its handle. Outside a runtime the
//! load only advances while some caller polls it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::interpreter::LoadError;
use crate::loader::Loader;
use crate::types::Dictionary;

/// The settled outcome of a load, shared by all observers.
pub type LoadResult = Result<Arc<Dictionary>, LoadError>;

/// A cloneable handle to one language's load.
pub type SharedLoad = Shared<BoxFuture<'static, LoadResult>>;

/// Where a language's load currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Resolved,
    Rejected,
}

/// Caches one shared load per language tag.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use lingo::{Dictionary, LanguageCache, LoadState, StaticLoader};
///
/// let loader = StaticLoader::new().with("en", Dictionary::new());
/// let cache = LanguageCache::new(Arc::new(loader));
///
/// let first = cache.ensure_loaded("en");
/// let second = cache.ensure_loaded("en");
/// assert!(first.ptr_eq(&second));
/// assert_eq!(cache.state("en"), Some(LoadState::Pending));
/// ```
pub struct LanguageCache {
    loader: Arc<dyn Loader>,
    entries: Mutex<HashMap<String, SharedLoad>>,
}

impl LanguageCache {
    pub fn new(loader: Arc<dyn Loader>) -> Self {
        Self {
            loader,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the load for `language`, starting it if this is the first
    /// request.
    ///
    /// The loader is invoked at most once per tag for the lifetime of the
    /// cache. Later calls, including calls after the load failed, get a clone
    /// of the same shared future.
    pub fn ensure_loaded(&self, language: &str) -> SharedLoad {
        let load = {
            let mut entries = self.entries();
            if let Some(existing) = entries.get(language) {
                return existing.clone();
            }
            let load = self.start(language);
            entries.insert(language.to_string(), load.clone());
            load
        };

        if let Ok(runtime) = Handle::try_current() {
            drop(runtime.spawn(load.clone()));
        }
        load
    }

    fn start(&self, language: &str) -> SharedLoad {
        debug!(language, "loading dictionary");
        let tag = language.to_string();
        self.loader
            .load(language)
            .map(move |result| {
                match &result {
                    Ok(dictionary) => {
                        debug!(language = %tag, keys = dictionary.len(), "dictionary loaded");
                    }
                    Err(error) => warn!(language = %tag, %error, "dictionary load failed"),
                }
                result.map(Arc::new)
            })
            .boxed()
            .shared()
    }

    /// The state of the entry for `language`, or `None` if it was never
    /// requested.
    pub fn state(&self, language: &str) -> Option<LoadState> {
        self.entries().get(language).map(|load| match load.peek() {
            None => LoadState::Pending,
            Some(Ok(_)) => LoadState::Resolved,
            Some(Err(_)) => LoadState::Rejected,
        })
    }

    /// The dictionary for `language` if its load has resolved.
    pub fn dictionary(&self, language: &str) -> Option<Arc<Dictionary>> {
        self.entries()
            .get(language)
            .and_then(|load| match load.peek() {
                Some(Ok(dictionary)) => Some(Arc::clone(dictionary)),
                _ => None,
            })
    }

    /// Tags that have an entry, sorted.
    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self.entries().keys().cloned().collect();
        languages.sort();
        languages
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, SharedLoad>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_loader(calls: Arc<AtomicUsize>, fail: bool) -> Arc<dyn Loader> {
        Arc::new(move |language: &str| -> BoxFuture<'static, Result<Dictionary, LoadError>> {
            calls.fetch_add(1, Ordering::SeqCst);
            let result = if fail {
                Err(LoadError::NotFound {
                    language: language.to_string(),
                })
            } else {
                Ok([("TEXT", "This is a text")].into_iter().collect::<Dictionary>())
            };
            future::ready(result).boxed()
        })
    }

    #[tokio::test]
    async fn loads_once_and_resolves() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = LanguageCache::new(counting_loader(calls.clone(), false));

        assert_eq!(cache.state("en"), None);
        let first = cache.ensure_loaded("en");
        let second = cache.ensure_loaded("en");
        assert_eq!(cache.state("en"), Some(LoadState::Pending));

        let a = first.await.unwrap();
        let b = second.await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.state("en"), Some(LoadState::Resolved));
        assert!(cache.dictionary("en").is_some());

        let _ = cache.ensure_loaded("en").await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn load_completes_without_a_waiter() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = LanguageCache::new(counting_loader(calls.clone(), false));

        drop(cache.ensure_loaded("en"));
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert_eq!(cache.state("en"), Some(LoadState::Resolved));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejection_is_cached_too() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = LanguageCache::new(counting_loader(calls.clone(), true));

        assert!(cache.ensure_loaded("de").await.is_err());
        assert!(cache.ensure_loaded("de").await.is_err());
        assert_eq!(cache.state("de"), Some(LoadState::Rejected));
        assert!(cache.dictionary("de").is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn languages_are_independent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = LanguageCache::new(counting_loader(calls.clone(), false));

        let _ = cache.ensure_loaded("en").await;
        let _ = cache.ensure_loaded("de").await;
        assert_eq!(cache.languages(), vec!["de".to_string(), "en".to_string()]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
