//! Built-in functions and reserved words of the formula grammar.
//!
//! Function names are resolved to a [`BuiltinFn`] once, when the parse tree is
//! lowered, so evaluation never compares strings. The reserved-word list is
//! shared with the notation layer, which must not mistake `sin` or `and` for a
//! free variable.

/// Known built-in functions.
///
/// Variants are grouped by family:
/// - Trig: sin, cos, tan and their inverses
/// - Hyperbolic: sinh, cosh, tanh
/// - Logarithmic / exponential: exp, ln, log
/// - Other: sqrt, abs, floor, ceil, round, sign, min, max, pow, mod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFn {
    // Trigonometric
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,

    // Hyperbolic
    Sinh,
    Cosh,
    Tanh,

    // Logarithmic / Exponential
    Exp,
    Ln,
    Log,

    // Other
    Sqrt,
    Abs,
    Floor,
    Ceil,
    Round,
    Sign,
    Min,
    Max,
    Pow,
    Mod,
}

/// Accepted argument counts for a builtin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
}

impl Arity {
    pub fn accepts(self, n: usize) -> bool {
        match self {
            Arity::Exact(k) => n == k,
            Arity::Range(lo, hi) => (lo..=hi).contains(&n),
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Exact(k) => write!(f, "{k}"),
            Arity::Range(lo, hi) => write!(f, "{lo}..={hi}"),
        }
    }
}

impl BuiltinFn {
    pub const ALL: [BuiltinFn; 22] = [
        BuiltinFn::Sin,
        BuiltinFn::Cos,
        BuiltinFn::Tan,
        BuiltinFn::Asin,
        BuiltinFn::Acos,
        BuiltinFn::Atan,
        BuiltinFn::Sinh,
        BuiltinFn::Cosh,
        BuiltinFn::Tanh,
        BuiltinFn::Exp,
        BuiltinFn::Ln,
        BuiltinFn::Log,
        BuiltinFn::Sqrt,
        BuiltinFn::Abs,
        BuiltinFn::Floor,
        BuiltinFn::Ceil,
        BuiltinFn::Round,
        BuiltinFn::Sign,
        BuiltinFn::Min,
        BuiltinFn::Max,
        BuiltinFn::Pow,
        BuiltinFn::Mod,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinFn::Sin => "sin",
            BuiltinFn::Cos => "cos",
            BuiltinFn::Tan => "tan",
            BuiltinFn::Asin => "asin",
            BuiltinFn::Acos => "acos",
            BuiltinFn::Atan => "atan",
            BuiltinFn::Sinh => "sinh",
            BuiltinFn::Cosh => "cosh",
            BuiltinFn::Tanh => "tanh",
            BuiltinFn::Exp => "exp",
            BuiltinFn::Ln => "ln",
            BuiltinFn::Log => "log",
            BuiltinFn::Sqrt => "sqrt",
            BuiltinFn::Abs => "abs",
            BuiltinFn::Floor => "floor",
            BuiltinFn::Ceil => "ceil",
            BuiltinFn::Round => "round",
            BuiltinFn::Sign => "sign",
            BuiltinFn::Min => "min",
            BuiltinFn::Max => "max",
            BuiltinFn::Pow => "pow",
            BuiltinFn::Mod => "mod",
        }
    }

    /// Resolve a function name. `arcsin`-style long forms and `sgn` are aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        let canonical = match name {
            "arcsin" => "asin",
            "arccos" => "acos",
            "arctan" => "atan",
            "sgn" => "sign",
            other => other,
        };
        Self::ALL.iter().copied().find(|f| f.name() == canonical)
    }

    pub fn arity(self) -> Arity {
        match self {
            BuiltinFn::Log => Arity::Range(1, 2),
            BuiltinFn::Min | BuiltinFn::Max | BuiltinFn::Pow | BuiltinFn::Mod => Arity::Exact(2),
            _ => Arity::Exact(1),
        }
    }
}

/// Words of the grammar that can never name a free variable.
pub const KEYWORDS: &[&str] = &["and", "or", "not", "true", "false"];

/// Named constants recognised by the parser.
pub const CONSTANTS: &[&str] = &["pi", "e"];

/// Aliases accepted by [`BuiltinFn::from_name`] on top of the canonical names.
const FUNCTION_ALIASES: &[&str] = &["arcsin", "arccos", "arctan", "sgn"];

/// True for keywords, constants and function names (case-sensitive, like the grammar).
pub fn is_reserved_word(word: &str) -> bool {
    KEYWORDS.contains(&word)
        || CONSTANTS.contains(&word)
        || FUNCTION_ALIASES.contains(&word)
        || BuiltinFn::from_name(word).is_some()
}
