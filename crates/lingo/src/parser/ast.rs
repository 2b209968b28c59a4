//! Public AST types for lingo templates and expressions.
//!
//! These types are public to enable external tooling (linters, editors, etc.).

use std::fmt::{self, Display, Formatter};

use crate::parser::ParseError;
use crate::types::Value;

/// A parsed template string containing segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub segments: Vec<Segment>,
}

/// A segment within a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text, copied to the output unchanged.
    Literal(String),
    /// An inline expression: `{{ source }}`.
    ///
    /// The expression is parsed together with the template. A syntax error is
    /// kept rather than raised so the rest of the template still renders.
    Expression {
        source: String,
        parsed: Result<Expr, ParseError>,
    },
    /// A nested translation: `[[ key : name, ... ]]`.
    ///
    /// Only the listed variable names are passed to the nested message.
    Nested { key: String, names: Vec<String> },
}

/// An expression inside a `{{ }}` marker.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal number, string, boolean or null.
    Literal(Value),
    /// A variable from the caller's context.
    Variable(String),
    /// Property access: `object.property`
    Member {
        object: Box<Expr>,
        property: String,
    },
    /// Index access: `object[index]`
    Index { object: Box<Expr>, index: Box<Expr> },
    /// A call: `callee(args...)`. Only methods on values are callable.
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `condition ? then : otherwise`
    Conditional {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    StrictEq,
    StrictNe,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNe => "!==",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        };
        f.write_str(symbol)
    }
}
