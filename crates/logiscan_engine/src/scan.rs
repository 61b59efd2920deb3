//! Sampling a predicate over a [`Domain`].
//!
//! Every scan goes through one point primitive, [`DomainEvaluator::evaluate_at`],
//! which keeps the outcome tri-state. The public scans project
//! [`PointValue::Undefined`] to false.

use logiscan_expr::{Expression, Value, Variables};

use crate::classifier::QuantifierKind;
use crate::domain::{Domain, PredicateType, TruthSegment};
use crate::predicate::Predicate;

/// Magnitude above which a numeric result counts as true.
pub const DEFAULT_TRUTHY_EPSILON: f64 = 1e-4;

/// Result of evaluating a predicate at one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointValue {
    True,
    False,
    /// Evaluation failed (division by zero, domain error, unbound name, ...)
    Undefined,
}

impl PointValue {
    pub fn is_true(self) -> bool {
        self == PointValue::True
    }

    pub fn name(self) -> &'static str {
        match self {
            PointValue::True => "true",
            PointValue::False => "false",
            PointValue::Undefined => "undefined",
        }
    }
}

impl From<bool> for PointValue {
    fn from(b: bool) -> Self {
        if b {
            PointValue::True
        } else {
            PointValue::False
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub value: PointValue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainEvaluator {
    epsilon: f64,
}

impl Default for DomainEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_TRUTHY_EPSILON)
    }
}

impl DomainEvaluator {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Evaluate `expression` with `variable = x`.
    pub fn evaluate_at(&self, expression: &Expression, variable: &str, x: f64) -> PointValue {
        let mut vars = Variables::new();
        self.point(expression, &mut vars, variable, x)
    }

    fn point(&self, expression: &Expression, vars: &mut Variables, variable: &str, x: f64) -> PointValue {
        vars.bind(variable, x);
        match expression.evaluate(vars) {
            Ok(Value::Bool(b)) => b.into(),
            Ok(Value::Number(n)) => (n.abs() > self.epsilon).into(),
            Err(err) => {
                tracing::trace!(target: "scan", x, error = %err, "point_undefined");
                PointValue::Undefined
            }
        }
    }

    // Yields the projected truth of each point of `grid`, reusing one binding map.
    fn truths<'a>(
        &'a self,
        predicate: &'a Predicate,
        grid: impl Iterator<Item = f64> + 'a,
    ) -> impl Iterator<Item = (f64, bool)> + 'a {
        let mut vars = Variables::new();
        grid.map(move |x| {
            let value = self.point(predicate.expression(), &mut vars, predicate.bound_variable(), x);
            (x, value.is_true())
        })
    }

    /// Three-way classification over the strict grid.
    pub fn classify(&self, predicate: &Predicate, domain: &Domain) -> PredicateType {
        let mut found_true = false;
        let mut found_false = false;

        for (_, truth) in self.truths(predicate, domain.strict_grid()) {
            if truth {
                found_true = true;
            } else {
                found_false = true;
            }
            if found_true && found_false {
                tracing::debug!(target: "scan", %domain, "classify_short_circuit");
                return PredicateType::Satisfiable;
            }
        }

        // Empty grid or only false samples
        if found_true {
            PredicateType::AlwaysTrue
        } else {
            PredicateType::AlwaysFalse
        }
    }

    /// Maximal true runs over the tolerant grid.
    ///
    /// A segment opens at the first true sample and closes at the last true
    /// sample before a false one; a segment still open at the end closes at
    /// `domain.max`.
    pub fn truth_segments(&self, predicate: &Predicate, domain: &Domain) -> Vec<TruthSegment> {
        let mut segments = Vec::new();
        let mut open: Option<f64> = None;
        let mut samples = 0usize;

        for (x, truth) in self.truths(predicate, domain.tolerant_grid()) {
            samples += 1;
            match (truth, open) {
                (true, None) => open = Some(x),
                (false, Some(start)) => {
                    segments.push(TruthSegment {
                        start,
                        end: x - domain.step,
                    });
                    open = None;
                }
                _ => {}
            }
        }

        if let Some(start) = open {
            segments.push(TruthSegment {
                start,
                end: domain.max,
            });
        }

        tracing::debug!(
            target: "scan",
            %domain,
            samples,
            segments = segments.len(),
            "truth_segments"
        );
        segments
    }

    /// Truth of `kind x. predicate` over the tolerant grid.
    ///
    /// An empty grid is false for both kinds: a universal statement needs at
    /// least one witness here, unlike classical logic.
    pub fn evaluate_quantified(
        &self,
        predicate: &Predicate,
        kind: QuantifierKind,
        domain: &Domain,
    ) -> bool {
        let mut truths = self.truths(predicate, domain.tolerant_grid());
        let result = match kind {
            QuantifierKind::Universal => {
                let mut any = false;
                let mut all = true;
                for (_, truth) in truths.by_ref() {
                    any = true;
                    if !truth {
                        all = false;
                        break;
                    }
                }
                any && all
            }
            QuantifierKind::Existential => truths.any(|(_, truth)| truth),
        };

        tracing::debug!(target: "scan", %kind, %domain, result, "quantified");
        result
    }

    /// Every tolerant-grid point with its tri-state value.
    pub fn sample(&self, predicate: &Predicate, domain: &Domain) -> Vec<Sample> {
        let mut vars = Variables::new();
        domain
            .tolerant_grid()
            .map(|x| Sample {
                x,
                value: self.point(predicate.expression(), &mut vars, predicate.bound_variable(), x),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predicate(src: &str) -> Predicate {
        Predicate::compile(src, false, "x").unwrap()
    }

    fn segments(src: &str, min: f64, max: f64, step: f64) -> Vec<(f64, f64)> {
        DomainEvaluator::default()
            .truth_segments(&predicate(src), &Domain::new(min, max, step))
            .into_iter()
            .map(|s| (s.start, s.end))
            .collect()
    }

    #[test]
    fn test_evaluate_at_truthiness() {
        let ev = DomainEvaluator::default();
        let e = Expression::parse("x - 1").unwrap();
        assert_eq!(ev.evaluate_at(&e, "x", 1.0), PointValue::False);
        assert_eq!(ev.evaluate_at(&e, "x", 1.00001), PointValue::False);
        assert_eq!(ev.evaluate_at(&e, "x", 3.0), PointValue::True);

        let e = Expression::parse("1 / x > 0").unwrap();
        assert_eq!(ev.evaluate_at(&e, "x", 0.0), PointValue::Undefined);
        assert_eq!(ev.evaluate_at(&e, "y", 1.0), PointValue::Undefined);
    }

    #[test]
    fn test_classify() {
        let ev = DomainEvaluator::default();
        let d = Domain::new(-2.0, 2.0, 1.0);
        assert_eq!(ev.classify(&predicate("x > 0"), &d), PredicateType::Satisfiable);
        assert_eq!(ev.classify(&predicate("x * x >= 0"), &d), PredicateType::AlwaysTrue);
        assert_eq!(ev.classify(&predicate("x > 100"), &d), PredicateType::AlwaysFalse);
        // Undefined everywhere projects to false
        assert_eq!(ev.classify(&predicate("sqrt(-1 - x*x) > 0"), &d), PredicateType::AlwaysFalse);
    }

    #[test]
    fn test_classify_empty_domain_is_always_false() {
        let ev = DomainEvaluator::default();
        let d = Domain::new(2.0, -2.0, 1.0);
        assert_eq!(ev.classify(&predicate("x * x >= 0"), &d), PredicateType::AlwaysFalse);
    }

    #[test]
    fn test_truth_segments() {
        assert_eq!(segments("x > 0", -2.0, 2.0, 1.0), vec![(1.0, 2.0)]);
        assert_eq!(segments("x > 10", -2.0, 2.0, 1.0), Vec::<(f64, f64)>::new());
        assert_eq!(segments("x * x >= 0", -2.0, 2.0, 1.0), vec![(-2.0, 2.0)]);
        assert_eq!(
            segments("x <= -1 or x >= 1", -3.0, 3.0, 1.0),
            vec![(-3.0, -1.0), (1.0, 3.0)]
        );
        // Undefined at 0 splits the run
        assert_eq!(
            segments("1 / x != 5", -2.0, 2.0, 1.0),
            vec![(-2.0, -1.0), (1.0, 2.0)]
        );
    }

    #[test]
    fn test_quantified() {
        let ev = DomainEvaluator::default();
        let p = predicate("x > 0");
        let positive = Domain::new(1.0, 10.0, 1.0);
        let symmetric = Domain::new(-5.0, 5.0, 1.0);
        let negative = Domain::new(-10.0, -1.0, 1.0);

        assert!(ev.evaluate_quantified(&p, QuantifierKind::Universal, &positive));
        assert!(!ev.evaluate_quantified(&p, QuantifierKind::Universal, &symmetric));
        assert!(ev.evaluate_quantified(&p, QuantifierKind::Existential, &symmetric));
        assert!(!ev.evaluate_quantified(&p, QuantifierKind::Existential, &negative));
    }

    #[test]
    fn test_quantified_empty_domain_is_false() {
        let ev = DomainEvaluator::default();
        let p = predicate("x * x >= 0");
        let empty = Domain::new(0.0, 1.0, -1.0);
        assert!(!ev.evaluate_quantified(&p, QuantifierKind::Universal, &empty));
        assert!(!ev.evaluate_quantified(&p, QuantifierKind::Existential, &empty));
    }

    #[test]
    fn test_sample_keeps_undefined() {
        let ev = DomainEvaluator::default();
        let samples = ev.sample(&predicate("1 / x > 0"), &Domain::new(-1.0, 1.0, 1.0));
        let values: Vec<_> = samples.iter().map(|s| (s.x, s.value)).collect();
        assert_eq!(
            values,
            vec![
                (-1.0, PointValue::False),
                (0.0, PointValue::Undefined),
                (1.0, PointValue::True)
            ]
        );
    }

    #[test]
    fn test_custom_epsilon() {
        let e = Expression::parse("x").unwrap();
        assert_eq!(DomainEvaluator::new(0.5).evaluate_at(&e, "x", 0.4), PointValue::False);
        assert_eq!(DomainEvaluator::new(0.1).evaluate_at(&e, "x", 0.4), PointValue::True);
    }
}
