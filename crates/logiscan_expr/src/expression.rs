use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::ast::Expr;
use crate::error::{EvalError, ParseError};
use crate::eval::{evaluate, Value, Variables};
use crate::parser::parse;

/// A parsed formula together with the text it was parsed from.
///
/// Parse once, evaluate many times: the tree is immutable and evaluation only
/// borrows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Expr,
}

impl Expression {
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let root = parse(source)?;
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Expr {
        &self.root
    }

    pub fn evaluate(&self, vars: &Variables) -> Result<Value, EvalError> {
        evaluate(&self.root, vars)
    }

    pub fn variables(&self) -> BTreeSet<String> {
        self.root.variables()
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_keeps_source_and_variables() {
        let e: Expression = "x^2 + y > 1".parse().unwrap();
        assert_eq!(e.source(), "x^2 + y > 1");
        let vars: Vec<_> = e.variables().into_iter().collect();
        assert_eq!(vars, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_expression_evaluates_repeatedly() {
        let e = Expression::parse("x * x >= 4").unwrap();
        let mut vars = Variables::new();
        let mut hits = Vec::new();
        for x in [-3.0, -1.0, 0.0, 2.0] {
            vars.bind("x", x);
            hits.push(e.evaluate(&vars).unwrap());
        }
        assert_eq!(
            hits,
            vec![
                Value::Bool(true),
                Value::Bool(false),
                Value::Bool(false),
                Value::Bool(true)
            ]
        );
    }
}
