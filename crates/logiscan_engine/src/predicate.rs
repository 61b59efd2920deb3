use logiscan_expr::{Expression, ParseError};

use crate::error::AnalysisError;

/// A compiled one-variable formula, ready to be sampled.
#[derive(Debug, Clone)]
pub struct Predicate {
    expression: Expression,
    has_quantifier: bool,
    bound_variable: String,
}

impl Predicate {
    pub fn new(expression: Expression, has_quantifier: bool, bound_variable: impl Into<String>) -> Self {
        Self {
            expression,
            has_quantifier,
            bound_variable: bound_variable.into(),
        }
    }

    /// Parse already-normalized text.
    pub fn compile(
        normalized: &str,
        has_quantifier: bool,
        bound_variable: &str,
    ) -> Result<Self, AnalysisError> {
        let expression = Expression::parse(normalized).map_err(|source: ParseError| {
            AnalysisError::ExpressionSyntax {
                normalized: normalized.to_string(),
                source,
            }
        })?;
        Ok(Self::new(expression, has_quantifier, bound_variable))
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn has_quantifier(&self) -> bool {
        self.has_quantifier
    }

    pub fn bound_variable(&self) -> &str {
        &self.bound_variable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_keeps_metadata() {
        let p = Predicate::compile("x > 0", true, "x").unwrap();
        assert!(p.has_quantifier());
        assert_eq!(p.bound_variable(), "x");
        assert_eq!(p.expression().source(), "x > 0");
    }

    #[test]
    fn test_compile_reports_normalized_text() {
        let err = Predicate::compile("x > > 0", false, "x").unwrap_err();
        match err {
            AnalysisError::ExpressionSyntax { normalized, .. } => assert_eq!(normalized, "x > > 0"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
