//! Template string parser using winnow.
//!
//! Scans a template once, left to right. Handles:
//! - Literal text segments
//! - Inline expressions: `{{ expr }}`, ending at the first `}}`
//! - Nested translations: `[[ KEY ]]`, `[[ KEY : name ]]`, `[[ KEY : a, b ]]`
//!
//! Markers do not nest. An opening delimiter without a matching close, or a
//! nested marker whose body is not a key and name list, stays literal text.

use super::ast::*;
use super::expression::parse_expression;
use winnow::combinator::{alt, delimited, repeat};
use winnow::prelude::*;
use winnow::token::{any, take_till, take_until};

/// Parse a template string into an AST.
///
/// Template parsing is total: anything that is not a well-formed marker is
/// literal text. Expression syntax errors are recorded in the segment.
pub fn parse_template(input: &str) -> Template {
    let mut remaining = input;
    match template(&mut remaining) {
        Ok(t) if remaining.is_empty() => t,
        Ok(mut t) => {
            t.segments.push(Segment::Literal(remaining.to_string()));
            Template {
                segments: merge_literals(t.segments),
            }
        }
        Err(_) => Template {
            segments: vec![Segment::Literal(input.to_string())],
        },
    }
}

/// Parse a complete template into segments.
fn template(input: &mut &str) -> ModalResult<Template> {
    let segments: Vec<Segment> = repeat(0.., segment).parse_next(input)?;

    Ok(Template {
        segments: merge_literals(segments),
    })
}

/// Merge adjacent Literal segments into single segments.
fn merge_literals(segments: Vec<Segment>) -> Vec<Segment> {
    let mut result = Vec::with_capacity(segments.len());

    for segment in segments {
        match segment {
            Segment::Literal(text) => {
                if let Some(Segment::Literal(prev)) = result.last_mut() {
                    prev.push_str(&text);
                } else {
                    result.push(Segment::Literal(text));
                }
            }
            other => result.push(other),
        }
    }

    result
}

/// Parse a single segment (marker, literal run, or a lone delimiter char).
fn segment(input: &mut &str) -> ModalResult<Segment> {
    alt((expression_marker, nested_marker, literal_run, literal_char)).parse_next(input)
}

/// Parse `{{ expr }}`.
fn expression_marker(input: &mut &str) -> ModalResult<Segment> {
    delimited("{{", take_until(0.., "}}"), "}}")
        .map(|source: &str| Segment::Expression {
            source: source.to_string(),
            parsed: parse_expression(source),
        })
        .parse_next(input)
}

/// Parse `[[ key : names ]]`.
fn nested_marker(input: &mut &str) -> ModalResult<Segment> {
    delimited("[[", take_until(0.., "]]"), "]]")
        .verify_map(nested_body)
        .parse_next(input)
}

/// Parse a run of text that cannot start a marker.
fn literal_run(input: &mut &str) -> ModalResult<Segment> {
    take_till(1.., ['{', '['])
        .map(|text: &str| Segment::Literal(text.to_string()))
        .parse_next(input)
}

/// Parse a single `{` or `[` that did not open a marker.
fn literal_char(input: &mut &str) -> ModalResult<Segment> {
    any.map(|c: char| Segment::Literal(c.to_string()))
        .parse_next(input)
}

/// Split a nested marker body into its key and variable names.
fn nested_body(body: &str) -> Option<Segment> {
    let (key, names) = match body.split_once(':') {
        Some((key, names)) => (key.trim(), names.trim()),
        None => (body.trim(), ""),
    };

    if key.is_empty() || !key.chars().all(is_key_char) {
        return None;
    }

    let names = if names.is_empty() {
        Vec::new()
    } else {
        names
            .split(',')
            .map(str::trim)
            .map(|name| is_identifier(name).then(|| name.to_string()))
            .collect::<Option<Vec<_>>>()?
    };

    Some(Segment::Nested {
        key: key.to_string(),
        names,
    })
}

/// Check if a character can appear in a translation key.
fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// Check if a string is a valid variable name.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
