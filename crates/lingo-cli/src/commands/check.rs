//! Implementation of the `lingo check` command.

use std::ffi::OsStr;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use clap::Args;
use lingo::{Dictionary, LintWarning, lint_dictionary};
use miette::{IntoDiagnostic, Report, Result, miette};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use serde_json::Value as Json;

use crate::output::LingoDiagnostic;

/// Arguments for the check command.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Dictionary files to check (.json)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one checked file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    keys: usize,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Result of checking one file: either it could not be loaded at all, or it
/// loaded and may carry lint warnings.
enum Outcome {
    Invalid(Report),
    Loaded {
        dictionary: Dictionary,
        warnings: Vec<LintWarning>,
    },
}

fn language_of(path: &Path) -> String {
    path.file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("?")
        .to_string()
}

fn check_file(path: &Path) -> Result<Outcome> {
    let content = read_to_string(path)
        .into_diagnostic()
        .map_err(|e| miette!("Failed to read {}: {e}", path.display()))?;

    let json = match serde_json::from_str::<Json>(&content) {
        Ok(json) => json,
        Err(e) => {
            let diagnostic = LingoDiagnostic::from_json_error(path, &content, &e);
            return Ok(Outcome::Invalid(diagnostic.into()));
        }
    };
    let dictionary = match Dictionary::from_json_value(json) {
        Ok(dictionary) => dictionary,
        Err(e) => {
            return Ok(Outcome::Invalid(miette!("{}: {e}", path.display())));
        }
    };

    let warnings = lint_dictionary(&dictionary, &language_of(path));
    Ok(Outcome::Loaded {
        dictionary,
        warnings,
    })
}

/// Render a lint warning, with the template as source where it helps.
fn warning_report(path: &Path, dictionary: &Dictionary, warning: &LintWarning) -> Report {
    match warning {
        LintWarning::ExpressionSyntax {
            key,
            expression,
            message,
            ..
        } => {
            let template = dictionary.source(key).unwrap_or_default();
            LingoDiagnostic::from_expression(path, key, template, expression, message).into()
        }
        other => miette!("{other}"),
    }
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<i32> {
    let mut reports = Vec::new();
    let mut failed = false;

    for path in &args.files {
        let file = path.display().to_string();
        match check_file(path)? {
            Outcome::Invalid(report) => {
                failed = true;
                if !args.json {
                    eprintln!("{report:?}");
                }
                reports.push(FileReport {
                    file,
                    keys: 0,
                    errors: vec![report.to_string()],
                    warnings: Vec::new(),
                });
            }
            Outcome::Loaded {
                dictionary,
                warnings,
            } => {
                failed |= !warnings.is_empty();
                if !args.json {
                    for warning in &warnings {
                        eprintln!("{:?}", warning_report(path, &dictionary, warning));
                    }
                    if warnings.is_empty() {
                        println!(
                            "{} {file}: {} keys",
                            "✓".if_supports_color(Stream::Stdout, |t| t.green()),
                            dictionary.len()
                        );
                    } else {
                        println!(
                            "{} {file}: {} keys, {} warning(s)",
                            "✗".if_supports_color(Stream::Stdout, |t| t.red()),
                            dictionary.len(),
                            warnings.len()
                        );
                    }
                }
                reports.push(FileReport {
                    file,
                    keys: dictionary.len(),
                    errors: Vec::new(),
                    warnings: warnings.iter().map(ToString::to_string).collect(),
                });
            }
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(&reports).into_diagnostic()?;
        println!("{json}");
    }

    if failed {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}
