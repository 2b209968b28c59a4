//! Core value types for lingo.

mod dictionary;
mod keys;
mod value;

pub use dictionary::{Dictionary, DictionaryError};
pub use keys::{Keys, Translation};
pub use value::{Value, Vars};
