//! Tree-walking evaluator.
//!
//! Unresolved references (unknown variable, missing key, index out of range, access on null)
//! fail with `UNDEFINED_VARIABLE` in [`RenderMode::Strict`] and evaluate to null in
//! [`RenderMode::Lenient`]. Function failures and operator type mismatches always fail.

use std::cmp::Ordering;

use serde_json::Value;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::scope::Scope;
use crate::clock::Clock;
use crate::error::ErrorType;
use crate::functions;
use crate::value::{self, is_blank, is_truthy, loose_eq, to_text, type_name};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    Strict,
    #[default]
    Lenient,
}

impl RenderMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            RenderMode::Strict
        } else {
            RenderMode::Lenient
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, RenderMode::Strict)
    }
}

/// Evaluation failure, without template position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub error_type: ErrorType,
    pub message: String,
}

impl EvalError {
    fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
        }
    }

    fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorType::TypeError, message)
    }
}

pub struct Evaluator<'s, 'b> {
    scope: &'s Scope<'b>,
    mode: RenderMode,
    clock: &'s dyn Clock,
}

impl<'s, 'b> Evaluator<'s, 'b> {
    pub fn new(scope: &'s Scope<'b>, mode: RenderMode, clock: &'s dyn Clock) -> Self {
        Self { scope, mode, clock }
    }

    pub fn eval(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(v) => Ok(v.clone()),
            Expr::List(items) => items
                .iter()
                .map(|e| self.eval(e))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Expr::Var(name) => match self.scope.lookup(name) {
                Some(v) => Ok(v.clone()),
                None => self.unresolved(format!("variable `{}` is not defined", name)),
            },
            Expr::Member { target, name } => {
                let target = self.eval(target)?;
                match target.get(name.as_str()) {
                    Some(v) => Ok(v.clone()),
                    _ => self.unresolved(format!(
                        "property `{}` not found on {}",
                        name,
                        type_name(&target)
                    )),
                }
            }
            Expr::Index { target, index } => {
                let target = self.eval(target)?;
                let index = self.eval(index)?;
                self.index(&target, &index)
            }
            Expr::Call { name, args } => {
                let args = args
                    .iter()
                    .map(|e| self.eval(e))
                    .collect::<Result<Vec<_>, _>>()?;
                functions::call(name, args, self.clock)
                    .map_err(|e| EvalError::new(ErrorType::FunctionError, e.to_string()))
            }
            Expr::Unary { op, operand } => {
                let value = self.eval(operand)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!is_truthy(&value))),
                    UnaryOp::Neg => negate(&value),
                }
            }
            Expr::Binary { op, left, right } => self.binary(*op, left, right),
            Expr::Ternary {
                condition,
                then,
                otherwise,
            } => {
                if is_truthy(&self.eval(condition)?) {
                    self.eval(then)
                } else {
                    self.eval(otherwise)
                }
            }
            Expr::Elvis { value, fallback } => {
                let value = self.eval(value)?;
                if is_blank(&value) {
                    self.eval(fallback)
                } else {
                    Ok(value)
                }
            }
        }
    }

    fn unresolved(&self, message: String) -> Result<Value, EvalError> {
        if self.mode.is_strict() {
            Err(EvalError::new(ErrorType::UndefinedVariable, message))
        } else {
            tracing::trace!(%message, "unresolved reference rendered as null");
            Ok(Value::Null)
        }
    }

    fn index(&self, target: &Value, index: &Value) -> Result<Value, EvalError> {
        let found = match (target, index) {
            (Value::Array(items), Value::Number(n)) => n
                .as_i64()
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| items.get(i)),
            (Value::Object(map), Value::String(key)) => map.get(key),
            (Value::Object(map), Value::Number(n)) => map.get(&n.to_string()),
            _ => None,
        };
        match found {
            Some(v) => Ok(v.clone()),
            None => self.unresolved(format!(
                "index [{}] not found on {}",
                to_text(index),
                type_name(target)
            )),
        }
    }

    fn binary(&self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Value, EvalError> {
        let l = self.eval(left)?;
        match op {
            BinaryOp::And if !is_truthy(&l) => return Ok(Value::Bool(false)),
            BinaryOp::Or if is_truthy(&l) => return Ok(Value::Bool(true)),
            _ => {}
        }
        let r = self.eval(right)?;
        match op {
            BinaryOp::And | BinaryOp::Or => Ok(Value::Bool(is_truthy(&r))),
            BinaryOp::Eq => Ok(Value::Bool(loose_eq(&l, &r))),
            BinaryOp::Ne => Ok(Value::Bool(!loose_eq(&l, &r))),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let ord = compare(op, &l, &r)?;
                Ok(Value::Bool(match op {
                    BinaryOp::Lt => ord == Ordering::Less,
                    BinaryOp::Le => ord != Ordering::Greater,
                    BinaryOp::Gt => ord == Ordering::Greater,
                    _ => ord != Ordering::Less,
                }))
            }
            BinaryOp::Add if l.is_string() || r.is_string() => {
                Ok(Value::String(to_text(&l) + &to_text(&r)))
            }
            _ => arithmetic(op, &l, &r),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(value: &Value) -> Option<Num> {
        let Value::Number(n) = value else {
            return None;
        };
        Some(match n.as_i64() {
            Some(i) => Num::Int(i),
            None => Num::Float(n.as_f64()?),
        })
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }
}

fn mismatch(op: BinaryOp, l: &Value, r: &Value) -> EvalError {
    EvalError::type_error(format!(
        "operator `{}` cannot be applied to {} and {}",
        op.symbol(),
        type_name(l),
        type_name(r)
    ))
}

fn float_value(f: f64) -> Result<Value, EvalError> {
    value::float_value(f)
        .ok_or_else(|| EvalError::type_error("arithmetic result is not a finite number"))
}

fn arithmetic(op: BinaryOp, l: &Value, r: &Value) -> Result<Value, EvalError> {
    let (Some(a), Some(b)) = (Num::of(l), Num::of(r)) else {
        return Err(mismatch(op, l, r));
    };
    let zero_divisor = matches!(op, BinaryOp::Div | BinaryOp::Rem) && b.as_f64() == 0.0;
    if zero_divisor {
        return Err(EvalError::type_error("division by zero"));
    }

    if let (Num::Int(x), Num::Int(y)) = (a, b) {
        let exact = match op {
            BinaryOp::Add => x.checked_add(y),
            BinaryOp::Sub => x.checked_sub(y),
            BinaryOp::Mul => x.checked_mul(y),
            BinaryOp::Div => x.checked_div(y),
            BinaryOp::Rem => x.checked_rem(y),
            _ => return Err(mismatch(op, l, r)),
        };
        if let Some(n) = exact {
            return Ok(Value::from(n));
        }
    }

    let (x, y) = (a.as_f64(), b.as_f64());
    let result = match op {
        BinaryOp::Add => x + y,
        BinaryOp::Sub => x - y,
        BinaryOp::Mul => x * y,
        BinaryOp::Div => x / y,
        BinaryOp::Rem => x % y,
        _ => return Err(mismatch(op, l, r)),
    };
    float_value(result)
}

fn compare(op: BinaryOp, l: &Value, r: &Value) -> Result<Ordering, EvalError> {
    match (l, r) {
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        _ => match (Num::of(l), Num::of(r)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => Ok(a.cmp(&b)),
            (Some(a), Some(b)) => a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .ok_or_else(|| mismatch(op, l, r)),
            _ => Err(mismatch(op, l, r)),
        },
    }
}

fn negate(value: &Value) -> Result<Value, EvalError> {
    match Num::of(value) {
        Some(Num::Int(i)) => match i.checked_neg() {
            Some(n) => Ok(Value::from(n)),
            None => float_value(-(i as f64)),
        },
        Some(Num::Float(f)) => float_value(-f),
        None => Err(EvalError::type_error(format!(
            "unary `-` cannot be applied to {}",
            type_name(value)
        ))),
    }
}
