//! Expression evaluation against a variable context.
//!
//! Only names present in the supplied [`Vars`] are resolvable. Missing object
//! properties evaluate to null, while a missing variable, access on null, an
//! unknown method or an operand type mismatch is an [`EvalError`].

use crate::interpreter::EvalError;
use crate::parser::ast::{BinaryOp, Expr, UnaryOp};
use crate::parser::parse_expression;
use crate::types::{Value, Vars};

/// Parse and evaluate an expression string.
///
/// # Example
///
/// ```
/// use lingo::{evaluate_str, vars, Value};
///
/// let v = vars! { "count" => 6 };
/// let result = evaluate_str(r#"count > 5 ? "many" : "few""#, &v).unwrap();
/// assert_eq!(result, Value::from("many"));
/// ```
pub fn evaluate_str(source: &str, vars: &Vars) -> Result<Value, EvalError> {
    let expr = parse_expression(source)?;
    evaluate(&expr, vars)
}

/// Evaluate a parsed expression.
pub fn evaluate(expr: &Expr, vars: &Vars) -> Result<Value, EvalError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Variable(name) => vars
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable { name: name.clone() }),
        Expr::Member { object, property } => {
            let object = evaluate(object, vars)?;
            member(&object, property)
        }
        Expr::Index { object, index } => {
            let object = evaluate(object, vars)?;
            let index = evaluate(index, vars)?;
            index_value(&object, &index)
        }
        Expr::Call { callee, args } => call(callee, args, vars),
        Expr::Unary { op, operand } => {
            let operand = evaluate(operand, vars)?;
            match op {
                UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
                UnaryOp::Negate => match operand {
                    Value::Number(n) => Ok(Value::Number(-n)),
                    other => Err(EvalError::TypeMismatch {
                        op: "-".to_string(),
                        lhs: "nothing",
                        rhs: other.type_name(),
                    }),
                },
            }
        }
        Expr::Binary { op, lhs, rhs } => binary(*op, lhs, rhs, vars),
        Expr::Conditional {
            condition,
            then,
            otherwise,
        } => {
            if evaluate(condition, vars)?.is_truthy() {
                evaluate(then, vars)
            } else {
                evaluate(otherwise, vars)
            }
        }
    }
}

/// Read a property of a value.
fn member(object: &Value, property: &str) -> Result<Value, EvalError> {
    match object {
        Value::Null => Err(EvalError::NullAccess {
            property: property.to_string(),
        }),
        Value::Object(map) => Ok(map.get(property).cloned().unwrap_or_default()),
        Value::String(s) if property == "length" => Ok(Value::from(s.chars().count())),
        Value::List(items) if property == "length" => Ok(Value::from(items.len())),
        _ => Ok(Value::Null),
    }
}

/// Read `object[index]`.
fn index_value(object: &Value, index: &Value) -> Result<Value, EvalError> {
    match (object, index) {
        (Value::Null, _) => Err(EvalError::NullAccess {
            property: index.to_string(),
        }),
        (Value::List(items), Value::Number(n)) => {
            if *n >= 0.0 && n.fract() == 0.0 {
                Ok(items.get(*n as usize).cloned().unwrap_or_default())
            } else {
                Ok(Value::Null)
            }
        }
        (_, Value::String(property)) => member(object, property),
        (object, index) => Err(EvalError::TypeMismatch {
            op: "[]".to_string(),
            lhs: object.type_name(),
            rhs: index.type_name(),
        }),
    }
}

/// Call a method. Only a small fixed set of methods on strings and numbers
/// exists; calling anything else fails.
fn call(callee: &Expr, args: &[Expr], vars: &Vars) -> Result<Value, EvalError> {
    let Expr::Member { object, property } = callee else {
        let name = match callee {
            Expr::Variable(name) => name.clone(),
            _ => "expression".to_string(),
        };
        return Err(EvalError::UnknownFunction { name });
    };

    let receiver = evaluate(object, vars)?;
    let args = args
        .iter()
        .map(|arg| evaluate(arg, vars))
        .collect::<Result<Vec<_>, _>>()?;

    match (&receiver, property.as_str(), args.as_slice()) {
        (Value::Null, _, _) => Err(EvalError::NullAccess {
            property: property.clone(),
        }),
        (Value::String(s), "toUpperCase", []) => Ok(Value::String(s.to_uppercase())),
        (Value::String(s), "toLowerCase", []) => Ok(Value::String(s.to_lowercase())),
        (Value::String(s), "trim", []) => Ok(Value::String(s.trim().to_string())),
        (Value::Number(n), "toFixed", []) => Ok(Value::String(format!("{n:.0}"))),
        (Value::Number(n), "toFixed", [Value::Number(digits)]) => {
            let digits = digits.clamp(0.0, 20.0) as usize;
            Ok(Value::String(format!("{n:.digits$}")))
        }
        _ => Err(EvalError::UnknownFunction {
            name: property.clone(),
        }),
    }
}

fn binary(op: BinaryOp, lhs: &Expr, rhs: &Expr, vars: &Vars) -> Result<Value, EvalError> {
    let left = evaluate(lhs, vars)?;

    // Logical operators short-circuit and yield the deciding operand.
    match op {
        BinaryOp::And if !left.is_truthy() => return Ok(left),
        BinaryOp::Or if left.is_truthy() => return Ok(left),
        _ => {}
    }

    let right = evaluate(rhs, vars)?;
    let mismatch = || EvalError::TypeMismatch {
        op: op.to_string(),
        lhs: left.type_name(),
        rhs: right.type_name(),
    };

    match op {
        BinaryOp::Add => match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(_), _) | (_, Value::String(_)) => {
                Ok(Value::String(format!("{left}{right}")))
            }
            _ => Err(mismatch()),
        },
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            let (Value::Number(a), Value::Number(b)) = (&left, &right) else {
                return Err(mismatch());
            };
            let result = match op {
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                _ => a % b,
            };
            Ok(Value::Number(result))
        }
        BinaryOp::StrictEq | BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::StrictNe | BinaryOp::Ne => Ok(Value::Bool(left != right)),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
                _ => return Err(mismatch()),
            };
            let Some(ordering) = ordering else {
                // NaN compares false with everything.
                return Ok(Value::Bool(false));
            };
            let result = match op {
                BinaryOp::Lt => ordering.is_lt(),
                BinaryOp::Le => ordering.is_le(),
                BinaryOp::Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            };
            Ok(Value::Bool(result))
        }
        BinaryOp::And | BinaryOp::Or => Ok(right),
    }
}
