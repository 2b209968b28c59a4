//! Rendering a dictionary key with nested translations.

use tracing::warn;

use crate::interpreter::{CallStack, interpolate};
use crate::types::{Dictionary, Vars};

/// Render `key` from `dictionary` with `vars`.
///
/// A key missing from the dictionary renders as itself. Nested markers
/// re-enter this function against the same dictionary with the narrowed
/// context; a nested key that would recurse into itself, or nest deeper than
/// the stack allows, renders empty.
pub fn render_key(dictionary: &Dictionary, key: &str, vars: &Vars, stack: &mut CallStack) -> String {
    let Some(template) = dictionary.template(key) else {
        return key.to_string();
    };

    if let Err(error) = stack.push(key) {
        warn!(key, %error, "nested translation rendered empty");
        return String::new();
    }
    let output = interpolate(template, vars, |nested, scoped| {
        render_key(dictionary, nested, scoped, stack)
    });
    stack.pop();
    output
}
