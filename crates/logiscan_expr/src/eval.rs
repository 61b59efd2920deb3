//! Evaluation of parsed expressions against variable bindings.
//!
//! Numbers are `f64`. Arithmetic fails with a typed [`EvalError`] instead of
//! producing NaN or infinities, so callers can treat any error as "undefined
//! at this point".

use std::collections::BTreeMap;
use std::fmt;

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::builtin::BuiltinFn;
use crate::error::EvalError;
use crate::parser::MAX_TREE_DEPTH;

// Every tree `parse` accepts fits; only hand-built trees can exceed it.
const MAX_DEPTH: usize = MAX_TREE_DEPTH;

/// Result of evaluating an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Number(f64),
}

impl Value {
    pub fn type_name(self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(b),
            Value::Number(_) => None,
        }
    }

    pub fn as_number(self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n),
            Value::Bool(_) => None,
        }
    }

    fn expect_number(self, op: &'static str) -> Result<f64, EvalError> {
        self.as_number().ok_or(EvalError::TypeMismatch {
            op,
            expected: "number",
            found: self.type_name(),
        })
    }

    fn expect_bool(self, op: &'static str) -> Result<bool, EvalError> {
        self.as_bool().ok_or(EvalError::TypeMismatch {
            op,
            expected: "boolean",
            found: self.type_name(),
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Named numeric bindings. Binding an existing name replaces its value, so a
/// single instance can be reused across every sample of a scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    values: BTreeMap<String, f64>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: &str, value: f64) {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
        } else {
            self.values.insert(name.to_string(), value);
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Variables {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Evaluate `expr` with the given bindings.
pub fn evaluate(expr: &Expr, vars: &Variables) -> Result<Value, EvalError> {
    eval_depth(expr, vars, MAX_DEPTH)
}

fn finite(n: f64) -> Result<Value, EvalError> {
    if n.is_finite() {
        Ok(Value::Number(n))
    } else {
        Err(EvalError::NonFinite)
    }
}

fn eval_depth(expr: &Expr, vars: &Variables, depth: usize) -> Result<Value, EvalError> {
    if depth == 0 {
        return Err(EvalError::DepthExceeded);
    }

    match expr {
        Expr::Number(n) => finite(*n),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Constant(c) => Ok(Value::Number(c.value())),
        Expr::Variable(name) => vars
            .get(name)
            .map(Value::Number)
            .ok_or_else(|| EvalError::UnboundVariable { name: name.clone() }),

        Expr::Unary(UnaryOp::Neg, e) => {
            let v = eval_depth(e, vars, depth - 1)?.expect_number("-")?;
            Ok(Value::Number(-v))
        }
        Expr::Unary(UnaryOp::Not, e) => {
            let v = eval_depth(e, vars, depth - 1)?.expect_bool("not")?;
            Ok(Value::Bool(!v))
        }

        Expr::Binary(op, l, r) if op.is_logical() => eval_logical(*op, l, r, vars, depth),
        Expr::Binary(op, l, r) => {
            let lhs = eval_depth(l, vars, depth - 1)?;
            let rhs = eval_depth(r, vars, depth - 1)?;
            eval_binary(*op, lhs, rhs)
        }

        Expr::Call(func, args) => {
            let arg_vals = args
                .iter()
                .map(|a| eval_depth(a, vars, depth - 1)?.expect_number(func.name()))
                .collect::<Result<Vec<_>, _>>()?;
            eval_function(*func, &arg_vals)
        }
    }
}

// `and`, `or` and `=>` short-circuit: the right side is only evaluated (and can
// only fail) when the left side does not already decide the result.
fn eval_logical(
    op: BinaryOp,
    l: &Expr,
    r: &Expr,
    vars: &Variables,
    depth: usize,
) -> Result<Value, EvalError> {
    let sym = op.symbol();
    let lhs = eval_depth(l, vars, depth - 1)?.expect_bool(sym)?;
    let decided = match op {
        BinaryOp::And if !lhs => Some(false),
        BinaryOp::Or if lhs => Some(true),
        BinaryOp::Implies if !lhs => Some(true),
        _ => None,
    };
    if let Some(b) = decided {
        return Ok(Value::Bool(b));
    }

    let rhs = eval_depth(r, vars, depth - 1)?.expect_bool(sym)?;
    Ok(Value::Bool(match op {
        BinaryOp::Iff => lhs == rhs,
        _ => rhs,
    }))
}

fn eval_binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    let sym = op.symbol();

    // Equality is defined for two values of the same type
    if let (BinaryOp::Eq | BinaryOp::Ne, Value::Bool(a), Value::Bool(b)) = (op, lhs, rhs) {
        return Ok(Value::Bool((a == b) == (op == BinaryOp::Eq)));
    }

    let a = lhs.expect_number(sym)?;
    let b = rhs.expect_number(sym)?;

    match op {
        BinaryOp::Add => finite(a + b),
        BinaryOp::Sub => finite(a - b),
        BinaryOp::Mul => finite(a * b),
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero { op: sym });
            }
            finite(a / b)
        }
        BinaryOp::Rem => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero { op: sym });
            }
            finite(a % b)
        }
        BinaryOp::Pow => checked_pow(a, b),
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::Le => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::Ge => Ok(Value::Bool(a >= b)),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::Ne => Ok(Value::Bool(a != b)),
        BinaryOp::And | BinaryOp::Or | BinaryOp::Implies | BinaryOp::Iff => {
            unreachable!("logical operators are evaluated by eval_logical")
        }
    }
}

fn checked_pow(base: f64, exp: f64) -> Result<Value, EvalError> {
    // Domain check: base < 0 and non-integer exponent -> complex result
    if base < 0.0 && exp.fract() != 0.0 {
        return Err(EvalError::Domain {
            function: "pow".to_string(),
            arg: base,
        });
    }
    finite(base.powf(exp))
}

fn domain(function: &str, arg: f64) -> EvalError {
    EvalError::Domain {
        function: function.to_string(),
        arg,
    }
}

/// Evaluate a builtin on already-evaluated arguments. Arity was checked when
/// the call was lowered.
fn eval_function(func: BuiltinFn, args: &[f64]) -> Result<Value, EvalError> {
    let x = args.first().copied().unwrap_or(0.0);
    let y = args.get(1).copied().unwrap_or(0.0);

    let result = match func {
        BuiltinFn::Sin => x.sin(),
        BuiltinFn::Cos => x.cos(),
        BuiltinFn::Tan => x.tan(),
        BuiltinFn::Asin | BuiltinFn::Acos => {
            if !(-1.0..=1.0).contains(&x) {
                return Err(domain(func.name(), x));
            }
            if func == BuiltinFn::Asin {
                x.asin()
            } else {
                x.acos()
            }
        }
        BuiltinFn::Atan => x.atan(),
        BuiltinFn::Sinh => x.sinh(),
        BuiltinFn::Cosh => x.cosh(),
        BuiltinFn::Tanh => x.tanh(),
        BuiltinFn::Exp => x.exp(),
        BuiltinFn::Ln => {
            if x <= 0.0 {
                return Err(domain("ln", x));
            }
            x.ln()
        }
        BuiltinFn::Log => {
            if args.len() == 2 {
                // log(base, x)
                if x <= 0.0 || x == 1.0 {
                    return Err(domain("log_base", x));
                }
                if y <= 0.0 {
                    return Err(domain("log_arg", y));
                }
                y.ln() / x.ln()
            } else {
                if x <= 0.0 {
                    return Err(domain("log", x));
                }
                x.log10()
            }
        }
        BuiltinFn::Sqrt => {
            if x < 0.0 {
                return Err(domain("sqrt", x));
            }
            x.sqrt()
        }
        BuiltinFn::Abs => x.abs(),
        BuiltinFn::Floor => x.floor(),
        BuiltinFn::Ceil => x.ceil(),
        BuiltinFn::Round => x.round(),
        BuiltinFn::Sign => {
            if x == 0.0 {
                0.0
            } else {
                x.signum()
            }
        }
        BuiltinFn::Min => x.min(y),
        BuiltinFn::Max => x.max(y),
        BuiltinFn::Pow => return checked_pow(x, y),
        BuiltinFn::Mod => {
            if y == 0.0 {
                return Err(EvalError::DivisionByZero { op: "mod" });
            }
            x % y
        }
    };

    finite(result)
}
