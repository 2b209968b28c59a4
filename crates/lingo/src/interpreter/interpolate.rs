//! Template interpolation.
//!
//! Walks a parsed template, evaluating inline expressions against the caller's
//! variables and delegating nested-translation markers to a callback.
//! Interpolation is total: failures become empty substitutions.

use tracing::debug;

use crate::interpreter::{EvalError, evaluate};
use crate::parser::ast::{Segment, Template};
use crate::types::Vars;

/// Interpolate `template` with `vars`.
///
/// `resolve_nested` is called with the nested key and a context holding only
/// the variables the marker names. Names missing from `vars` are left out of
/// that context, so expressions in the nested message that use them fail
/// and render empty.
///
/// # Example
///
/// ```
/// use lingo::{interpolate, parse_template, vars};
///
/// let template = parse_template("{{a + 1}} and [[OTHER:a]]");
/// let out = interpolate(&template, &vars! { "a" => 1, "b" => 2 }, |key, nested| {
///     assert_eq!(nested.len(), 1);
///     format!("<{key}>")
/// });
/// assert_eq!(out, "2 and <OTHER>");
/// ```
pub fn interpolate<F>(template: &Template, vars: &Vars, mut resolve_nested: F) -> String
where
    F: FnMut(&str, &Vars) -> String,
{
    let mut output = String::new();
    for segment in &template.segments {
        match segment {
            Segment::Literal(text) => output.push_str(text),
            Segment::Expression { source, parsed } => {
                let result = parsed
                    .as_ref()
                    .map_err(|e| EvalError::from(e.clone()))
                    .and_then(|expr| evaluate(expr, vars));
                match result {
                    Ok(value) => output.push_str(&value.to_string()),
                    Err(error) => {
                        debug!(expression = %source.trim(), %error, "expression rendered empty");
                    }
                }
            }
            Segment::Nested { key, names } => {
                let scoped = scope_vars(vars, names);
                output.push_str(&resolve_nested(key, &scoped));
            }
        }
    }
    output
}

/// Build the narrowed context for a nested translation.
fn scope_vars(vars: &Vars, names: &[String]) -> Vars {
    names
        .iter()
        .filter_map(|name| vars.get(name).map(|value| (name.clone(), value.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_template;
    use crate::vars;

    fn render(template: &str, vars: &Vars) -> String {
        interpolate(&parse_template(template), vars, |key, _| key.to_string())
    }

    #[test]
    fn failed_expression_is_empty() {
        assert_eq!(
            render(r#"This "{{notExisting.func()}}" is empty string"#, &Vars::new()),
            r#"This "" is empty string"#
        );
    }

    #[test]
    fn syntax_error_is_empty_and_rest_renders() {
        assert_eq!(render("a{{ 1 + }}b{{ 2 }}", &Vars::new()), "ab2");
    }

    #[test]
    fn nested_context_only_has_named_vars() {
        let template = parse_template("[[HACK:givenVar]]");
        let v = vars! { "privateVar" => "private", "givenVar" => "given" };
        let mut seen = Vec::new();
        interpolate(&template, &v, |key, nested| {
            seen.push((key.to_string(), nested.clone()));
            String::new()
        });
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "HACK");
        assert_eq!(seen[0].1, vars! { "givenVar" => "given" });
    }

    #[test]
    fn missing_named_var_is_absent() {
        let template = parse_template("[[K:missing]]");
        interpolate(&template, &Vars::new(), |_, nested| {
            assert!(nested.is_empty());
            String::new()
        });
    }
}
