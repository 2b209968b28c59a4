//! Translation configuration: default language and language matching.

use bon::Builder;
use icu_locale_core::LanguageIdentifier;
use serde::Deserialize;

/// Which languages are provided and which one is used by default.
///
/// Tags are matched after normalization (lowercase, `_`, `/` and `.` read
/// as `-`), and the configured spelling of the matched tag is returned. That
/// spelling is what the translation service uses as cache key and passes to
/// the loader.
///
/// # Example
///
/// ```
/// use lingo::TranslateConfig;
///
/// let config = TranslateConfig::builder()
///     .provided_langs(vec!["de/de".to_string()])
///     .default_lang("de/de")
///     .build();
///
/// assert_eq!(config.lang_provided("de-DE", true).as_deref(), Some("de/de"));
/// assert_eq!(config.lang_provided("de", true), None);
/// assert_eq!(config.lang_provided("de", false).as_deref(), Some("de/de"));
/// ```
#[derive(Debug, Clone, Builder, Deserialize)]
#[builder(on(String, into))]
#[serde(rename_all = "camelCase")]
pub struct TranslateConfig {
    /// Language used until another one is selected.
    #[builder(default = "en".to_string())]
    #[serde(default = "default_lang", alias = "default_lang")]
    default_lang: String,

    /// Tags that have translations, in preference order.
    #[builder(default = vec!["en".to_string()])]
    #[serde(default = "default_provided_langs", alias = "provided_langs")]
    provided_langs: Vec<String>,
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_provided_langs() -> Vec<String> {
    vec![default_lang()]
}

impl Default for TranslateConfig {
    fn default() -> Self {
        TranslateConfig::builder().build()
    }
}

impl TranslateConfig {
    pub fn default_lang(&self) -> &str {
        &self.default_lang
    }

    pub fn provided_langs(&self) -> &[String] {
        &self.provided_langs
    }

    /// Return the configured tag matching `language`, if any.
    ///
    /// Strict matching only accepts tags equal after normalization. Non-strict
    /// matching additionally folds locale variants: a bare language (`de`)
    /// accepts the first provided tag of that language, and a regional tag
    /// (`de-CH`) accepts a provided bare language (`de`). A regional tag never
    /// matches a different region.
    pub fn lang_provided(&self, language: &str, strict: bool) -> Option<String> {
        let requested = normalize_tag(language);
        if requested.is_empty() {
            return None;
        }

        if let Some(found) = self
            .provided_langs
            .iter()
            .find(|provided| normalize_tag(provided) == requested)
        {
            return Some(found.clone());
        }

        if strict {
            return None;
        }

        let requested = Subtags::of(&requested);
        self.provided_langs
            .iter()
            .find(|provided| {
                let subtags = Subtags::of(&normalize_tag(provided));
                subtags.language == requested.language && (requested.bare || subtags.bare)
            })
            .cloned()
    }
}

/// Normalize a language tag for comparison.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim()
        .chars()
        .map(|c| match c {
            '_' | '/' | '.' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// The parts of a tag that matter for locale folding.
struct Subtags {
    /// Primary language subtag.
    language: String,
    /// No script or region.
    bare: bool,
}

impl Subtags {
    fn of(normalized: &str) -> Self {
        match normalized.parse::<LanguageIdentifier>() {
            Ok(id) => Subtags {
                language: id.language.to_string(),
                bare: id.script.is_none() && id.region.is_none(),
            },
            Err(_) => {
                let (language, rest) = normalized.split_once('-').unwrap_or((normalized, ""));
                Subtags {
                    language: language.to_string(),
                    bare: rest.is_empty(),
                }
            }
        }
    }
}
