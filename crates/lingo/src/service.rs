//! The translation service: current language, detection and lookups.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::cache::LanguageCache;
use crate::config::TranslateConfig;
use crate::interpreter::{CallStack, TranslateError, render_key};
use crate::loader::Loader;
use crate::navigator::Navigator;
use crate::types::{Dictionary, Keys, Translation, Vars};

/// Resolves translation keys against the dictionary of a language.
///
/// Dictionaries are loaded on first use through the [`Loader`] and cached for
/// the lifetime of the service. [`instant`](Self::instant) only sees
/// dictionaries that have already resolved; [`translate`](Self::translate)
/// waits for the load.
///
/// # Example
///
/// ```
/// use lingo::{Dictionary, StaticLoader, TranslateConfig, TranslateService, vars};
///
/// # futures::executor::block_on(async {
/// let loader = StaticLoader::new().with(
///     "en",
///     [("GREETING", "Hello {{name}}")].into_iter().collect::<Dictionary>(),
/// );
/// let service = TranslateService::new(TranslateConfig::default(), loader);
///
/// let text = service.translate("GREETING", &vars! { "name" => "Ada" }, None).await;
/// assert_eq!(text, "Hello Ada");
/// assert_eq!(service.instant("GREETING", &vars! { "name" => "Bob" }, None), "Hello Bob");
/// # });
/// ```
pub struct TranslateService {
    config: TranslateConfig,
    cache: LanguageCache,
    current: watch::Sender<String>,
}

impl TranslateService {
    pub fn new(config: TranslateConfig, loader: impl Loader + 'static) -> Self {
        Self::with_shared_loader(config, Arc::new(loader))
    }

    /// Build a service around a loader that is also used elsewhere.
    pub fn with_shared_loader(config: TranslateConfig, loader: Arc<dyn Loader>) -> Self {
        let (current, _) = watch::channel(config.default_lang().to_string());
        Self {
            config,
            cache: LanguageCache::new(loader),
            current,
        }
    }

    pub fn config(&self) -> &TranslateConfig {
        &self.config
    }

    pub fn cache(&self) -> &LanguageCache {
        &self.cache
    }

    /// The language used when a lookup names none.
    pub fn current_lang(&self) -> String {
        self.current.borrow().clone()
    }

    /// Observe changes of the current language.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }

    /// Pick the first of the navigator's languages that is provided.
    ///
    /// The preferred language is tried before the list. Matching is
    /// non-strict, so `de` accepts a provided `de-DE`.
    pub fn detect_lang(&self, navigator: &Navigator) -> Option<String> {
        navigator
            .candidates()
            .find_map(|language| self.config.lang_provided(language, false))
    }

    /// Make `language` the current language if it is provided.
    ///
    /// Returns the configured tag on success. Subscribers are only notified
    /// when the language actually changes.
    pub fn use_lang(&self, language: &str) -> Option<String> {
        let tag = self.config.lang_provided(language, true)?;
        self.current.send_if_modified(|current| {
            if *current == tag {
                return false;
            }
            debug!(from = %current, to = %tag, "current language changed");
            current.clone_from(&tag);
            true
        });
        Some(tag)
    }

    /// Wait until the dictionary for `language` has loaded.
    ///
    /// An explicit language must be provided (strict match), otherwise the
    /// returned future is already failed and no load starts. Without a
    /// language the current one is used as is.
    pub fn wait_for_translation(
        &self,
        language: Option<&str>,
    ) -> BoxFuture<'static, Result<Arc<Dictionary>, TranslateError>> {
        let tag = match language {
            Some(language) => match self.config.lang_provided(language, true) {
                Some(tag) => tag,
                None => {
                    return future::ready(Err(TranslateError::LanguageNotProvided {
                        language: language.to_string(),
                    }))
                    .boxed();
                }
            },
            None => self.current_lang(),
        };
        self.cache
            .ensure_loaded(&tag)
            .map(|result| result.map_err(TranslateError::from))
            .boxed()
    }

    /// Translate with whatever is loaded right now.
    ///
    /// If the language's dictionary has not resolved, the keys come back
    /// unchanged.
    pub fn instant(&self, keys: impl Into<Keys>, vars: &Vars, language: Option<&str>) -> Translation {
        let keys = keys.into();
        let tag = match language {
            Some(language) => self
                .config
                .lang_provided(language, true)
                .unwrap_or_else(|| language.to_string()),
            None => self.current_lang(),
        };
        match self.cache.dictionary(&tag) {
            Some(dictionary) => render_keys(&dictionary, &keys, vars),
            None => keys.untranslated(),
        }
    }

    /// Translate once the language's dictionary has loaded.
    ///
    /// Never fails: if the language is not provided or its load failed, the
    /// keys come back unchanged.
    pub async fn translate(
        &self,
        keys: impl Into<Keys>,
        vars: &Vars,
        language: Option<&str>,
    ) -> Translation {
        let keys = keys.into();
        match self.wait_for_translation(language).await {
            Ok(dictionary) => render_keys(&dictionary, &keys, vars),
            Err(error) => {
                warn!(%error, "translation fell back to keys");
                keys.untranslated()
            }
        }
    }
}

fn render_keys(dictionary: &Dictionary, keys: &Keys, vars: &Vars) -> Translation {
    keys.map(|key| render_key(dictionary, key, vars, &mut CallStack::new()))
}
