//! Implementation of the `lingo translate` command.

use std::fs::read_dir;
use std::path::{Path, PathBuf};

use clap::Args;
use lingo::{FileLoader, Navigator, TranslateConfig, TranslateService, Value, Vars};
use miette::{IntoDiagnostic, Result, miette};
use serde_json::{Map, Value as Json};
use tokio::runtime::Builder;
use tracing::debug;

/// Arguments for the translate command.
#[derive(Debug, Args)]
pub struct TranslateArgs {
    /// Directory containing one `<lang>.json` dictionary per language
    #[arg(short, long, default_value = ".", env = "LINGO_DIR")]
    pub dir: PathBuf,

    /// Language to translate into. Detected from the system locale if omitted.
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Provided languages (comma-separated). Defaults to the dictionaries found in --dir.
    #[arg(long, value_delimiter = ',')]
    pub provided: Vec<String>,

    /// Variables in name=value format (repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Variables as a JSON object, merged before --param values
    #[arg(long)]
    pub vars: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Keys to translate
    #[arg(required = true)]
    pub keys: Vec<String>,
}

/// Parse a key=value parameter string.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid parameter format '{s}': expected name=value"))?;
    Ok((key.to_string(), value.to_string()))
}

/// Interpret a command-line value: numbers and booleans keep their type.
fn param_value(raw: String) -> Value {
    match raw.as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => match raw.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::String(raw),
        },
    }
}

/// Language tags of the `.json` files in `dir`, sorted.
fn discover_languages(dir: &Path) -> Result<Vec<String>> {
    let entries = read_dir(dir)
        .into_diagnostic()
        .map_err(|e| miette!("Cannot read dictionary directory {}: {e}", dir.display()))?;
    let mut languages: Vec<String> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
        .collect();
    languages.sort();
    Ok(languages)
}

fn build_vars(args: &TranslateArgs) -> Result<Vars> {
    let mut vars = match &args.vars {
        Some(json) => serde_json::from_str::<Vars>(json)
            .into_diagnostic()
            .map_err(|e| miette!("--vars must be a JSON object: {e}"))?,
        None => Vars::new(),
    };
    for (key, value) in &args.params {
        vars.insert(key.clone(), param_value(value.clone()));
    }
    Ok(vars)
}

/// Run the translate command.
pub fn run_translate(args: TranslateArgs) -> Result<i32> {
    let provided = if args.provided.is_empty() {
        discover_languages(&args.dir)?
    } else {
        args.provided.clone()
    };
    let Some(default_lang) = provided.first().cloned() else {
        return Err(miette!("No dictionaries found in {}", args.dir.display()));
    };
    debug!(?provided, "provided languages");

    let config = TranslateConfig::builder()
        .default_lang(default_lang)
        .provided_langs(provided)
        .build();
    let loader = FileLoader::builder().directory(args.dir.clone()).build();
    let service = TranslateService::new(config, loader);

    match &args.lang {
        Some(lang) => {
            if service.use_lang(lang).is_none() {
                return Err(miette!(
                    "Language '{lang}' is not provided (available: {})",
                    service.config().provided_langs().join(", ")
                ));
            }
        }
        None => {
            if let Some(detected) = service.detect_lang(&Navigator::from_system()) {
                service.use_lang(&detected);
            }
        }
    }

    let vars = build_vars(&args)?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;
    runtime
        .block_on(service.wait_for_translation(None))
        .map_err(|e| miette!("Cannot load '{}': {e}", service.current_lang()))?;

    let translation = service.instant(args.keys.clone(), &vars, None);
    let texts = translation.into_vec();

    if args.json {
        let output: Map<String, Json> = args
            .keys
            .iter()
            .cloned()
            .zip(texts.into_iter().map(Json::String))
            .collect();
        let json = serde_json::to_string_pretty(&output).into_diagnostic()?;
        println!("{json}");
    } else {
        for text in texts {
            println!("{text}");
        }
    }

    Ok(exitcode::OK)
}
