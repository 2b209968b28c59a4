//! Coverage command implementation.

use std::collections::BTreeSet;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use clap::Args;
use lingo::Dictionary;
use miette::{IntoDiagnostic, Result, miette};
use serde::Serialize;
use serde_json::Value as Json;

use crate::output::LingoDiagnostic;
use crate::output::table::{LanguageCoverage, format_coverage_table};

/// Arguments for the coverage command.
#[derive(Debug, Args)]
pub struct CoverageArgs {
    /// Source language dictionary (e.g., en.json).
    #[arg(long)]
    pub source: PathBuf,

    /// Languages to check coverage for (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub lang: Vec<String>,

    /// Directory containing translation files. Defaults to source file directory.
    #[arg(long)]
    pub translations: Option<PathBuf>,

    /// Exit with non-zero code if any translation is incomplete.
    #[arg(long)]
    pub strict: bool,

    /// Output results as JSON.
    #[arg(long)]
    pub json: bool,
}

/// JSON output format for coverage data.
#[derive(Debug, Serialize)]
struct CoverageJson {
    language: String,
    translated: usize,
    total: usize,
    missing: Vec<String>,
    extra: Vec<String>,
}

/// Read and parse a dictionary file, reporting JSON errors with context.
fn load_keys(path: &Path) -> Result<BTreeSet<String>> {
    let content = read_to_string(path)
        .into_diagnostic()
        .map_err(|e| miette!("Failed to read {}: {e}", path.display()))?;
    let json = serde_json::from_str::<Json>(&content)
        .map_err(|e| LingoDiagnostic::from_json_error(path, &content, &e))?;
    let dictionary = Dictionary::from_json_value(json)
        .map_err(|e| miette!("{}: {e}", path.display()))?;
    Ok(dictionary.keys().map(str::to_string).collect())
}

/// Run the coverage command.
pub fn run_coverage(args: CoverageArgs) -> Result<i32> {
    let source_keys = load_keys(&args.source)?;
    let source_count = source_keys.len();

    // Determine base directory for translation files
    let base_dir = args
        .translations
        .clone()
        .or_else(|| args.source.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let mut coverage_data: Vec<LanguageCoverage> = Vec::new();

    for lang in &args.lang {
        let lang_file = base_dir.join(format!("{lang}.json"));

        // A missing file means nothing is translated yet.
        let translated_keys = if lang_file.exists() {
            load_keys(&lang_file)?
        } else {
            BTreeSet::new()
        };

        coverage_data.push(LanguageCoverage {
            language: lang.clone(),
            translated: source_keys.intersection(&translated_keys).count(),
            missing: source_keys.difference(&translated_keys).cloned().collect(),
            extra: translated_keys.difference(&source_keys).cloned().collect(),
        });
    }

    let any_incomplete = coverage_data.iter().any(|c| !c.missing.is_empty());

    if args.json {
        let json_data: Vec<CoverageJson> = coverage_data
            .iter()
            .map(|c| CoverageJson {
                language: c.language.clone(),
                translated: c.translated,
                total: source_count,
                missing: c.missing.clone(),
                extra: c.extra.clone(),
            })
            .collect();

        let json_output = serde_json::to_string_pretty(&json_data).into_diagnostic()?;
        println!("{json_output}");
    } else {
        let table = format_coverage_table(source_count, &coverage_data);
        println!("{table}");

        for lang_coverage in &coverage_data {
            if !lang_coverage.missing.is_empty() {
                println!("\nMissing in {}:", lang_coverage.language);
                for key in &lang_coverage.missing {
                    println!("  - {key}");
                }
            }
        }
    }

    if args.strict && any_incomplete {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}
