//! Expression parser using winnow.
//!
//! Parses the contents of a `{{ }}` marker. Precedence, lowest first:
//! ternary, `||`, `&&`, equality, relational, additive, multiplicative,
//! unary, then postfix member/index/call chains on a primary.
//!
//! Nesting through parentheses, brackets, call arguments, unary operators and
//! ternary branches is capped at [`MAX_NESTING`] levels.

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::error::ParseError;
use crate::types::Value;
use winnow::ascii::digit1;
use winnow::combinator::{alt, opt, preceded, separated};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::stream::Stateful;
use winnow::token::{any, one_of, take_while};

/// Maximum nesting depth of a single expression.
pub const MAX_NESTING: usize = 64;

/// Nesting bookkeeping carried alongside the input.
#[derive(Debug, Clone, Copy, Default)]
struct Nesting {
    depth: usize,
    exceeded: bool,
}

type Input<'i> = Stateful<&'i str, Nesting>;

/// Parse an expression string into an AST.
pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
    let mut stream = Input {
        input,
        state: Nesting::default(),
    };
    let result = ternary(&mut stream).and_then(|expr| ws(&mut stream).map(|()| expr));
    let remaining = stream.input;
    let (line, column) = calculate_position(input, remaining);
    match result {
        Ok(expr) if remaining.is_empty() => Ok(expr),
        Ok(_) => Err(ParseError::Syntax {
            line,
            column,
            message: format!(
                "unexpected character: '{}'",
                remaining.chars().next().unwrap_or('?')
            ),
        }),
        Err(_) if stream.state.exceeded => Err(ParseError::Syntax {
            line,
            column,
            message: format!("expression nested deeper than {MAX_NESTING} levels"),
        }),
        Err(e) => {
            if remaining.trim().is_empty() {
                Err(ParseError::UnexpectedEof { line, column })
            } else {
                Err(ParseError::Syntax {
                    line,
                    column,
                    message: format!("parse error: {e}"),
                })
            }
        }
    }
}

/// Calculate line and column (in characters) from original input and
/// remaining input.
fn calculate_position(original: &str, remaining: &str) -> (usize, usize) {
    let consumed = original.len() - remaining.len();
    let consumed_str = &original[..consumed];
    let line = consumed_str.chars().filter(|&c| c == '\n').count() + 1;
    let line_start = consumed_str.rfind('\n').map_or(0, |pos| pos + 1);
    let column = consumed_str[line_start..].chars().count() + 1;
    (line, column)
}

/// Run `parser` one nesting level deeper, failing past [`MAX_NESTING`].
fn nested(
    input: &mut Input<'_>,
    parser: fn(&mut Input<'_>) -> ModalResult<Expr>,
) -> ModalResult<Expr> {
    if input.state.depth >= MAX_NESTING {
        input.state.exceeded = true;
        return Err(ErrMode::Cut(ContextError::new()));
    }
    input.state.depth += 1;
    let result = parser(input);
    input.state.depth -= 1;
    result
}

/// Parse optional whitespace.
fn ws(input: &mut Input<'_>) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

/// Consume `c` after optional whitespace if it is next.
fn eat(input: &mut Input<'_>, c: char) -> ModalResult<bool> {
    preceded(ws, opt(c))
        .map(|found: Option<char>| found.is_some())
        .parse_next(input)
}

/// Require `c` after optional whitespace.
fn expect(input: &mut Input<'_>, c: char) -> ModalResult<()> {
    preceded(ws, c).void().parse_next(input)
}

/// `condition ? then : otherwise`, right associative.
fn ternary(input: &mut Input<'_>) -> ModalResult<Expr> {
    nested(input, conditional)
}

fn conditional(input: &mut Input<'_>) -> ModalResult<Expr> {
    let condition = or_expr(input)?;
    if !eat(input, '?')? {
        return Ok(condition);
    }
    let then = ternary(input)?;
    expect(input, ':')?;
    let otherwise = ternary(input)?;
    Ok(Expr::Conditional {
        condition: Box::new(condition),
        then: Box::new(then),
        otherwise: Box::new(otherwise),
    })
}

/// Parse a left-associative chain of `operand (operator operand)*`.
fn binary_chain(
    input: &mut Input<'_>,
    operand: fn(&mut Input<'_>) -> ModalResult<Expr>,
    operator: fn(&mut Input<'_>) -> ModalResult<BinaryOp>,
) -> ModalResult<Expr> {
    let mut lhs = operand(input)?;
    while let Some(op) = opt(operator).parse_next(input)? {
        let rhs = operand(input)?;
        lhs = Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        };
    }
    Ok(lhs)
}

fn or_expr(input: &mut Input<'_>) -> ModalResult<Expr> {
    binary_chain(input, and_expr, or_op)
}

fn and_expr(input: &mut Input<'_>) -> ModalResult<Expr> {
    binary_chain(input, equality, and_op)
}

fn equality(input: &mut Input<'_>) -> ModalResult<Expr> {
    binary_chain(input, relation, equality_op)
}

fn relation(input: &mut Input<'_>) -> ModalResult<Expr> {
    binary_chain(input, additive, relation_op)
}

fn additive(input: &mut Input<'_>) -> ModalResult<Expr> {
    binary_chain(input, term, additive_op)
}

fn term(input: &mut Input<'_>) -> ModalResult<Expr> {
    binary_chain(input, unary, term_op)
}

fn or_op(input: &mut Input<'_>) -> ModalResult<BinaryOp> {
    preceded(ws, "||".value(BinaryOp::Or)).parse_next(input)
}

fn and_op(input: &mut Input<'_>) -> ModalResult<BinaryOp> {
    preceded(ws, "&&".value(BinaryOp::And)).parse_next(input)
}

fn equality_op(input: &mut Input<'_>) -> ModalResult<BinaryOp> {
    preceded(
        ws,
        alt((
            "===".value(BinaryOp::StrictEq),
            "!==".value(BinaryOp::StrictNe),
            "==".value(BinaryOp::Eq),
            "!=".value(BinaryOp::Ne),
        )),
    )
    .parse_next(input)
}

fn relation_op(input: &mut Input<'_>) -> ModalResult<BinaryOp> {
    preceded(
        ws,
        alt((
            "<=".value(BinaryOp::Le),
            ">=".value(BinaryOp::Ge),
            "<".value(BinaryOp::Lt),
            ">".value(BinaryOp::Gt),
        )),
    )
    .parse_next(input)
}

fn additive_op(input: &mut Input<'_>) -> ModalResult<BinaryOp> {
    preceded(
        ws,
        alt(("+".value(BinaryOp::Add), "-".value(BinaryOp::Sub))),
    )
    .parse_next(input)
}

fn term_op(input: &mut Input<'_>) -> ModalResult<BinaryOp> {
    preceded(
        ws,
        alt((
            "*".value(BinaryOp::Mul),
            "/".value(BinaryOp::Div),
            "%".value(BinaryOp::Rem),
        )),
    )
    .parse_next(input)
}

fn unary(input: &mut Input<'_>) -> ModalResult<Expr> {
    nested(input, prefixed)
}

/// `!operand`, `-operand`, or a postfix chain.
fn prefixed(input: &mut Input<'_>) -> ModalResult<Expr> {
    let op = if eat(input, '!')? {
        UnaryOp::Not
    } else if eat(input, '-')? {
        UnaryOp::Negate
    } else {
        return postfix(input);
    };
    let operand = unary(input)?;
    Ok(Expr::Unary {
        op,
        operand: Box::new(operand),
    })
}

/// A primary followed by any number of `.name`, `[index]` and `(args)`.
fn postfix(input: &mut Input<'_>) -> ModalResult<Expr> {
    let mut expr = primary(input)?;
    loop {
        if eat(input, '.')? {
            ws(input)?;
            let property = identifier(input)?;
            expr = Expr::Member {
                object: Box::new(expr),
                property: property.to_string(),
            };
        } else if eat(input, '[')? {
            let index = ternary(input)?;
            expect(input, ']')?;
            expr = Expr::Index {
                object: Box::new(expr),
                index: Box::new(index),
            };
        } else if eat(input, '(')? {
            let args = call_args(input)?;
            expect(input, ')')?;
            expr = Expr::Call {
                callee: Box::new(expr),
                args,
            };
        } else {
            return Ok(expr);
        }
    }
}

/// Comma separated call arguments (possibly none).
fn call_args(input: &mut Input<'_>) -> ModalResult<Vec<Expr>> {
    separated(0.., ternary, (ws, ',')).parse_next(input)
}

/// A literal, a parenthesized expression, or a variable.
fn primary(input: &mut Input<'_>) -> ModalResult<Expr> {
    ws(input)?;
    alt((
        number.map(|n| Expr::Literal(Value::Number(n))),
        string_literal.map(|s| Expr::Literal(Value::String(s))),
        parenthesized,
        identifier.map(keyword_or_variable),
    ))
    .parse_next(input)
}

fn parenthesized(input: &mut Input<'_>) -> ModalResult<Expr> {
    expect(input, '(')?;
    let expr = ternary(input)?;
    expect(input, ')')?;
    Ok(expr)
}

/// Map reserved words to literals, everything else is a variable.
fn keyword_or_variable(name: &str) -> Expr {
    match name {
        "true" => Expr::Literal(Value::Bool(true)),
        "false" => Expr::Literal(Value::Bool(false)),
        "null" | "undefined" => Expr::Literal(Value::Null),
        _ => Expr::Variable(name.to_string()),
    }
}

/// Parse a decimal number: digits with an optional fraction.
fn number(input: &mut Input<'_>) -> ModalResult<f64> {
    (digit1, opt(('.', digit1)))
        .take()
        .try_map(str::parse::<f64>)
        .parse_next(input)
}

/// Parse a single or double quoted string with backslash escapes.
fn string_literal(input: &mut Input<'_>) -> ModalResult<String> {
    let quote = quote_char(input)?;
    let mut text = String::new();
    loop {
        match next_char(input)? {
            c if c == quote => return Ok(text),
            '\\' => {
                let escaped = match next_char(input)? {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                };
                text.push(escaped);
            }
            c => text.push(c),
        }
    }
}

fn quote_char(input: &mut Input<'_>) -> ModalResult<char> {
    one_of(['"', '\'']).parse_next(input)
}

fn next_char(input: &mut Input<'_>) -> ModalResult<char> {
    any.parse_next(input)
}

/// Parse an identifier.
fn identifier<'i>(input: &mut Input<'i>) -> ModalResult<&'i str> {
    (one_of(is_ident_start), take_while(0.., is_ident_cont))
        .take()
        .parse_next(input)
}

/// Check if a character can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

/// Check if a character can continue an identifier.
fn is_ident_cont(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
