use logiscan_expr::ParseError;
use thiserror::Error;

/// Input rejected before any evaluation takes place.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("formula is empty")]
    EmptyFormula,

    #[error("`{0}` is not a predicate: it needs a comparison operator and a variable")]
    NotAPredicate(String),

    #[error("found {count} quantifiers; at most one is supported")]
    MultipleQuantifiers { count: usize },

    #[error("step must be positive, got {step}")]
    NonPositiveStep { step: f64 },

    #[error("domain is empty or inverted: min {min} must be less than max {max}")]
    InvertedDomain { min: f64, max: f64 },

    #[error("domain bound `{name}` is not a finite number")]
    NonFiniteBound { name: &'static str },

    #[error("domain needs about {samples} samples, over the limit of {limit}")]
    TooManySamples { samples: f64, limit: usize },
}

/// Failures of a full analysis run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error(transparent)]
    InputValidation(#[from] ValidationError),

    #[error("cannot parse normalized formula `{normalized}`: {source}")]
    ExpressionSyntax {
        normalized: String,
        #[source]
        source: ParseError,
    },
}

impl AnalysisError {
    /// Stable machine-readable name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::InputValidation(_) => "input_validation",
            AnalysisError::ExpressionSyntax { .. } => "expression_syntax",
        }
    }
}
