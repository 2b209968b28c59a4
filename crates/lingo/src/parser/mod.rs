//! Template and expression parsers.
//!
//! Templates are scanned into literal text, `{{ expression }}` markers and
//! `[[ key : name ]]` nested-translation markers. Expressions are parsed into
//! an AST the interpreter can evaluate against a variable context.

pub mod ast;
pub mod error;
mod expression;
mod template;

pub use ast::*;
pub use error::ParseError;
pub use expression::parse_expression;
pub use template::parse_template;
