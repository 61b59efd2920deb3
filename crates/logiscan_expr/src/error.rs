use thiserror::Error;

/// Errors raised while turning formula text into an [`Expr`](crate::Expr).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,

    /// The grammar could not make progress at byte `position`.
    #[error("syntax error at position {position}: unexpected `{found}`")]
    Syntax { position: usize, found: String },

    #[error("unconsumed input: {0}")]
    UnconsumedInput(String),

    #[error("unknown function `{name}`")]
    UnknownFunction { name: String },

    #[error("function `{name}` expects {expected} argument(s), got {found}")]
    Arity {
        name: String,
        expected: String,
        found: usize,
    },

    /// Parentheses, prefix operators or right-associative chains nest past
    /// [`MAX_NESTING`](crate::parser::MAX_NESTING).
    #[error("formula nests deeper than {limit} levels")]
    TooDeep { limit: usize },

    /// The expression tree is deeper than
    /// [`MAX_TREE_DEPTH`](crate::parser::MAX_TREE_DEPTH).
    #[error("formula has more than {limit} chained operations")]
    TooLong { limit: usize },
}

/// Errors raised while evaluating a parsed expression against bindings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("division by zero in `{op}`")]
    DivisionByZero { op: &'static str },

    #[error("unbound variable `{name}`")]
    UnboundVariable { name: String },

    /// Argument outside the real domain of a function (sqrt of a negative, ...)
    #[error("domain error: {function}({arg})")]
    Domain { function: String, arg: f64 },

    #[error("type mismatch in `{op}`: expected {expected}, found {found}")]
    TypeMismatch {
        op: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("result is not finite")]
    NonFinite,

    #[error("expression nesting exceeds the evaluation depth limit")]
    DepthExceeded,
}
