//! CLI command implementations.

mod check;
mod coverage;
mod translate;

pub use check::{CheckArgs, run_check};
pub use coverage::{CoverageArgs, run_coverage};
pub use translate::{TranslateArgs, run_translate};
