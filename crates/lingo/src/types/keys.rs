use std::fmt::{self, Display, Formatter};
use std::slice;

/// One translation key or an ordered list of keys.
///
/// Lookups return a [`Translation`] of the same shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keys {
    One(String),
    Many(Vec<String>),
}

impl Keys {
    /// The keys themselves, as an untranslated result.
    pub fn untranslated(&self) -> Translation {
        self.map(str::to_string)
    }

    /// Apply `f` to every key, preserving shape and order.
    pub fn map(&self, mut f: impl FnMut(&str) -> String) -> Translation {
        match self {
            Keys::One(key) => Translation::One(f(key)),
            Keys::Many(keys) => Translation::Many(keys.iter().map(|k| f(k)).collect()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let keys: &[String] = match self {
            Keys::One(key) => slice::from_ref(key),
            Keys::Many(keys) => keys,
        };
        keys.iter().map(String::as_str)
    }
}

impl From<&str> for Keys {
    fn from(key: &str) -> Self {
        Keys::One(key.to_string())
    }
}

impl From<String> for Keys {
    fn from(key: String) -> Self {
        Keys::One(key)
    }
}

impl From<&String> for Keys {
    fn from(key: &String) -> Self {
        Keys::One(key.clone())
    }
}

impl From<Vec<String>> for Keys {
    fn from(keys: Vec<String>) -> Self {
        Keys::Many(keys)
    }
}

impl From<Vec<&str>> for Keys {
    fn from(keys: Vec<&str>) -> Self {
        Keys::Many(keys.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Keys {
    fn from(keys: &[&str]) -> Self {
        Keys::Many(keys.iter().map(|k| (*k).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Keys {
    fn from(keys: [&str; N]) -> Self {
        Keys::Many(keys.iter().map(|k| (*k).to_string()).collect())
    }
}

/// The result of a lookup, shaped like the [`Keys`] that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    One(String),
    Many(Vec<String>),
}

impl Translation {
    /// The single translation, if this came from a single key.
    pub fn as_one(&self) -> Option<&str> {
        match self {
            Translation::One(text) => Some(text),
            Translation::Many(_) => None,
        }
    }

    /// The translations, if this came from a list of keys.
    pub fn as_many(&self) -> Option<&[String]> {
        match self {
            Translation::One(_) => None,
            Translation::Many(texts) => Some(texts),
        }
    }

    /// Flatten into a list regardless of shape.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Translation::One(text) => vec![text],
            Translation::Many(texts) => texts,
        }
    }
}

impl PartialEq<&str> for Translation {
    fn eq(&self, other: &&str) -> bool {
        self.as_one() == Some(*other)
    }
}

impl<const N: usize> PartialEq<[&str; N]> for Translation {
    fn eq(&self, other: &[&str; N]) -> bool {
        self.as_many()
            .is_some_and(|texts| texts.iter().map(String::as_str).eq(other.iter().copied()))
    }
}

impl Display for Translation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Translation::One(text) => write!(f, "{text}"),
            Translation::Many(texts) => write!(f, "{}", texts.join("\n")),
        }
    }
}
