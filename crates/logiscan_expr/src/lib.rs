//! Parsing and evaluation of real-valued formulas with comparisons and
//! boolean connectives.
//!
//! ```
//! use logiscan_expr::{Expression, Value, Variables};
//!
//! let expr = Expression::parse("x > 0 and x < 5").unwrap();
//! let vars: Variables = [("x", 2.0)].into_iter().collect();
//! assert_eq!(expr.evaluate(&vars), Ok(Value::Bool(true)));
//! ```

pub mod ast;
pub mod builtin;
pub mod error;
pub mod eval;
pub mod expression;
pub mod parser;

pub use ast::{BinaryOp, Constant, Expr, UnaryOp};
pub use builtin::{is_reserved_word, BuiltinFn};
pub use error::{EvalError, ParseError};
pub use eval::{evaluate, Value, Variables};
pub use expression::Expression;
pub use parser::parse;
