//! lingo interpreter for rendering templates.
//!
//! This module provides the evaluation engine that takes parsed templates
//! and produces strings. It evaluates embedded expressions against a variable
//! context and resolves nested translations through a caller-supplied lookup.

mod context;
mod error;
mod evaluator;
mod interpolate;
mod render;

pub use context::CallStack;
pub use error::{EvalError, LoadError, TranslateError, compute_suggestions};
pub use evaluator::{evaluate, evaluate_str};
pub use interpolate::interpolate;
pub use render::render_key;
