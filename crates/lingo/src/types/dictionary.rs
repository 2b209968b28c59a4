use std::collections::BTreeMap;

use serde_json::Value as Json;
use thiserror::Error;

use crate::parser::{Template, parse_template};

/// The key → template mapping for one language.
///
/// Templates are parsed once, when they enter the dictionary. A dictionary is
/// immutable once handed to the translation service.
///
/// # Example
///
/// ```
/// use lingo::Dictionary;
///
/// let dictionary = Dictionary::from_json(r#"{
///     "TEXT": "This is a text",
///     "MENU": { "OPEN": "Open" }
/// }"#).unwrap();
/// assert_eq!(dictionary.source("MENU.OPEN"), Some("Open"));
/// assert_eq!(dictionary.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: BTreeMap<String, Entry>,
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    source: String,
    template: Template,
}

/// An error building a dictionary from JSON.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object of strings at the top level")]
    NotAnObject,

    #[error("entry '{key}' must be a string or an object, found {found}")]
    InvalidEntry { key: String, found: &'static str },
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a dictionary from a JSON object.
    ///
    /// Nested objects are flattened into dotted keys.
    pub fn from_json(content: &str) -> Result<Self, DictionaryError> {
        let json: Json = serde_json::from_str(content)?;
        Self::from_json_value(json)
    }

    /// Build a dictionary from an already-parsed JSON object.
    pub fn from_json_value(json: Json) -> Result<Self, DictionaryError> {
        let Json::Object(map) = json else {
            return Err(DictionaryError::NotAnObject);
        };
        let mut dictionary = Self::new();
        for (key, value) in map {
            dictionary.insert_json(key, value)?;
        }
        Ok(dictionary)
    }

    fn insert_json(&mut self, key: String, value: Json) -> Result<(), DictionaryError> {
        match value {
            Json::String(source) => {
                self.insert(key, source);
                Ok(())
            }
            Json::Object(children) => {
                for (child, value) in children {
                    self.insert_json(format!("{key}.{child}"), value)?;
                }
                Ok(())
            }
            other => Err(DictionaryError::InvalidEntry {
                key,
                found: json_type_name(&other),
            }),
        }
    }

    /// Add or replace a template.
    pub fn insert(&mut self, key: impl Into<String>, source: impl Into<String>) {
        let source = source.into();
        let template = parse_template(&source);
        self.entries.insert(key.into(), Entry { source, template });
    }

    /// The parsed template for `key`.
    pub fn template(&self, key: &str) -> Option<&Template> {
        self.entries.get(key).map(|entry| &entry.template)
    }

    /// The raw template text for `key`.
    pub fn source(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|entry| entry.source.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate `(key, template)` pairs in key order.
    pub fn templates(&self) -> impl Iterator<Item = (&str, &Template)> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.as_str(), &entry.template))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dictionary = Self::new();
        for (key, source) in iter {
            dictionary.insert(key, source);
        }
        dictionary
    }
}

fn json_type_name(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}
