//! The user's language preferences, as a browser or OS reports them.

use std::iter;

/// A preferred language plus an ordered list of acceptable ones.
///
/// # Example
///
/// ```
/// use lingo::Navigator;
///
/// let navigator = Navigator::new("de-CH").with_languages(["de-CH", "de-AT"]);
/// assert_eq!(navigator.languages.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    /// The single preferred language.
    pub language: String,
    /// Acceptable languages, most preferred first.
    pub languages: Vec<String>,
}

impl Navigator {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            languages: Vec::new(),
        }
    }

    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Preferences reported by the operating system.
    pub fn from_system() -> Self {
        let languages: Vec<String> = sys_locale::get_locales().collect();
        let language = sys_locale::get_locale()
            .or_else(|| languages.first().cloned())
            .unwrap_or_default();
        Self {
            language,
            languages,
        }
    }

    /// All candidates in the order they should be tried.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        iter::once(self.language.as_str()).chain(self.languages.iter().map(String::as_str))
    }
}
