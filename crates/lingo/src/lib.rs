pub mod cache;
pub mod config;
pub mod interpreter;
pub mod lint;
pub mod loader;
pub mod navigator;
pub mod parser;
pub mod service;
pub mod types;

pub use cache::{LanguageCache, LoadResult, LoadState, SharedLoad};
pub use config::{TranslateConfig, normalize_tag};
pub use interpreter::{
    CallStack, EvalError, LoadError, TranslateError, compute_suggestions, evaluate, evaluate_str,
    interpolate, render_key,
};
pub use lint::{LintWarning, lint_dictionary};
pub use loader::{FileLoader, Loader, StaticLoader};
pub use navigator::Navigator;
pub use parser::{ParseError, parse_expression, parse_template};
pub use service::TranslateService;
pub use types::{Dictionary, DictionaryError, Keys, Translation, Value, Vars};

/// Creates a [`Vars`] map from key-value pairs.
///
/// Values are converted via `Into<Value>`, so numbers, strings, booleans,
/// vectors and nested `vars!` maps can be passed directly.
///
/// # Example
///
/// ```
/// use lingo::{Value, vars};
///
/// let v = vars! { "count" => 3, "name" => "Alice", "user" => vars! { "admin" => true } };
/// assert_eq!(v.len(), 3);
/// assert_eq!(v["count"].as_number(), Some(3.0));
/// assert_eq!(v["name"].as_str(), Some("Alice"));
/// assert_eq!(v["user"].get("admin"), Some(&Value::Bool(true)));
/// ```
#[macro_export]
macro_rules! vars {
    {} => {
        $crate::Vars::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = $crate::Vars::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
