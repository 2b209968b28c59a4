//! Static lint rules for dictionaries.
//!
//! Works on parsed templates only; nothing is evaluated. Finds expressions
//! that will always render empty because they do not parse, nested markers
//! pointing at keys the dictionary lacks, and nesting cycles.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::interpreter::compute_suggestions;
use crate::parser::Segment;
use crate::types::Dictionary;

/// A problem found by [`lint_dictionary`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LintWarning {
    /// An embedded expression does not parse and will render empty.
    #[error("{language}: '{key}' has an invalid expression '{expression}': {message}")]
    ExpressionSyntax {
        language: String,
        key: String,
        expression: String,
        message: String,
    },

    /// A nested marker names a key that is not in the dictionary.
    #[error(
        "{language}: '{key}' nests unknown key '{nested}'{}",
        did_you_mean(suggestions)
    )]
    UnknownNestedKey {
        language: String,
        key: String,
        nested: String,
        suggestions: Vec<String>,
    },

    /// Keys that nest themselves, directly or transitively.
    #[error("{language}: nesting cycle {}", chain.join(" -> "))]
    SelfNesting { language: String, chain: Vec<String> },
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

/// Run every lint rule over `dictionary`.
///
/// `language` is only used to label the warnings. Warnings come out in key
/// order, cycles last.
///
/// # Example
///
/// ```
/// use lingo::{Dictionary, LintWarning, lint_dictionary};
///
/// let dictionary: Dictionary = [("GREETING", "Hi [[NAM:n]]"), ("NAME", "{{n}}")]
///     .into_iter()
///     .collect();
/// let warnings = lint_dictionary(&dictionary, "en");
/// assert!(matches!(
///     &warnings[..],
///     [LintWarning::UnknownNestedKey { suggestions, .. }] if suggestions == &["NAME"]
/// ));
/// ```
pub fn lint_dictionary(dictionary: &Dictionary, language: &str) -> Vec<LintWarning> {
    let available: Vec<String> = dictionary.keys().map(str::to_string).collect();
    let mut warnings = Vec::new();
    let mut graph: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for (key, template) in dictionary.templates() {
        let edges = graph.entry(key).or_default();
        for segment in &template.segments {
            match segment {
                Segment::Expression {
                    source,
                    parsed: Err(error),
                } => warnings.push(LintWarning::ExpressionSyntax {
                    language: language.to_string(),
                    key: key.to_string(),
                    expression: source.trim().to_string(),
                    message: error.to_string(),
                }),
                Segment::Nested { key: nested, .. } if dictionary.contains_key(nested) => {
                    edges.push(nested.as_str());
                }
                Segment::Nested { key: nested, .. } => {
                    warnings.push(LintWarning::UnknownNestedKey {
                        language: language.to_string(),
                        key: key.to_string(),
                        nested: nested.clone(),
                        suggestions: compute_suggestions(nested, &available),
                    });
                }
                Segment::Literal(_) | Segment::Expression { .. } => {}
            }
        }
    }

    warnings.extend(
        find_cycles(&graph)
            .into_iter()
            .map(|chain| LintWarning::SelfNesting {
                language: language.to_string(),
                chain,
            }),
    );
    warnings
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first search reporting one chain per back edge.
///
/// Each chain starts and ends with the same key.
fn find_cycles(graph: &BTreeMap<&str, Vec<&str>>) -> Vec<Vec<String>> {
    let mut marks = BTreeMap::new();
    let mut path = Vec::new();
    let mut cycles = Vec::new();
    for &key in graph.keys() {
        visit(key, graph, &mut marks, &mut path, &mut cycles);
    }
    cycles
}

fn visit<'a>(
    key: &'a str,
    graph: &BTreeMap<&'a str, Vec<&'a str>>,
    marks: &mut BTreeMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
    cycles: &mut Vec<Vec<String>>,
) {
    match marks.get(key) {
        Some(Mark::Done) => return,
        Some(Mark::Visiting) => {
            if let Some(start) = path.iter().position(|k| *k == key) {
                let mut chain: Vec<String> = path[start..].iter().map(|k| (*k).to_string()).collect();
                chain.push(key.to_string());
                cycles.push(chain);
            }
            return;
        }
        None => {}
    }

    marks.insert(key, Mark::Visiting);
    path.push(key);
    for &next in graph.get(key).into_iter().flatten() {
        visit(next, graph, marks, path, cycles);
    }
    path.pop();
    marks.insert(key, Mark::Done);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary(entries: &[(&str, &str)]) -> Dictionary {
        entries.iter().copied().collect()
    }

    #[test]
    fn clean_dictionary_has_no_warnings() {
        let dictionary = dictionary(&[("A", "x {{ n + 1 }} [[B:n]]"), ("B", "{{ n }}")]);
        assert!(lint_dictionary(&dictionary, "en").is_empty());
    }

    #[test]
    fn direct_self_nesting() {
        let cycles = lint_dictionary(&dictionary(&[("LOOP", "[[LOOP]]")]), "en");
        assert_eq!(
            cycles,
            vec![LintWarning::SelfNesting {
                language: "en".to_string(),
                chain: vec!["LOOP".to_string(), "LOOP".to_string()],
            }]
        );
    }

    #[test]
    fn transitive_cycle_reported_once() {
        let dictionary = dictionary(&[("A", "[[B]]"), ("B", "[[C]]"), ("C", "[[A]]"), ("D", "[[A]]")]);
        let warnings = lint_dictionary(&dictionary, "en");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].to_string(), "en: nesting cycle A -> B -> C -> A");
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let dictionary = dictionary(&[("A", "[[B]][[C]]"), ("B", "[[D]]"), ("C", "[[D]]"), ("D", "d")]);
        assert!(lint_dictionary(&dictionary, "en").is_empty());
    }

    #[test]
    fn unknown_nested_key_display() {
        let warnings = lint_dictionary(&dictionary(&[("A", "[[TITEL]]"), ("TITLE", "t")]), "de");
        assert_eq!(
            warnings[0].to_string(),
            "de: 'A' nests unknown key 'TITEL' (did you mean: TITLE?)"
        );
    }
}
