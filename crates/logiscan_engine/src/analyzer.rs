//! End-to-end analysis of a raw formula over a domain.
//!
//! The pipeline is validate → normalize → classify → compile → scan. All
//! input checks run before any sampling, so an invalid request never costs a
//! scan.

use crate::classifier::{Classifier, QuantifierKind};
use crate::domain::{Domain, PredicateType, TruthSegment};
use crate::error::{AnalysisError, ValidationError};
use crate::normalizer::Normalizer;
use crate::notation::NotationTables;
use crate::predicate::Predicate;
use crate::scan::{DomainEvaluator, DEFAULT_TRUTHY_EPSILON};

pub const DEFAULT_MAX_SAMPLES: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerOptions {
    /// Reject domains whose grid would exceed this many points.
    pub max_samples: usize,
    pub truthy_epsilon: f64,
    pub strict_predicates: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            max_samples: DEFAULT_MAX_SAMPLES,
            truthy_epsilon: DEFAULT_TRUTHY_EPSILON,
            strict_predicates: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    Quantified {
        kind: QuantifierKind,
        truth_value: bool,
    },
    Unquantified {
        predicate_type: PredicateType,
        segments: Vec<TruthSegment>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub formula: String,
    pub normalized: String,
    pub variable: String,
    pub domain: Domain,
    pub result: AnalysisResult,
}

#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'t> {
    tables: &'t NotationTables,
    options: AnalyzerOptions,
}

impl Default for Analyzer<'static> {
    fn default() -> Self {
        Self::new(NotationTables::shared(), AnalyzerOptions::default())
    }
}

impl<'t> Analyzer<'t> {
    pub fn new(tables: &'t NotationTables, options: AnalyzerOptions) -> Self {
        Self { tables, options }
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    pub fn normalizer(&self) -> Normalizer<'t> {
        Normalizer::new(self.tables)
    }

    pub fn classifier(&self) -> Classifier<'t> {
        Classifier::new(self.tables).with_strict(self.options.strict_predicates)
    }

    pub fn evaluator(&self) -> DomainEvaluator {
        DomainEvaluator::new(self.options.truthy_epsilon)
    }

    /// Domain checks, including the sample budget.
    pub fn validate_domain(&self, domain: &Domain) -> Result<(), ValidationError> {
        domain.validate()?;
        let samples = domain.estimated_samples();
        if samples > self.options.max_samples as f64 {
            return Err(ValidationError::TooManySamples {
                samples,
                limit: self.options.max_samples,
            });
        }
        Ok(())
    }

    pub fn analyze(
        &self,
        formula: &str,
        min: f64,
        max: f64,
        step: f64,
    ) -> Result<Analysis, AnalysisError> {
        self.analyze_domain(formula, Domain::new(min, max, step))
    }

    pub fn analyze_domain(&self, formula: &str, domain: Domain) -> Result<Analysis, AnalysisError> {
        if formula.trim().is_empty() {
            return Err(ValidationError::EmptyFormula.into());
        }
        self.validate_domain(&domain)?;

        let classifier = self.classifier();
        if !classifier.is_predicate(formula) {
            return Err(ValidationError::NotAPredicate(formula.to_string()).into());
        }
        let has_quantifier = classifier.has_quantifiers(formula)?;

        let normalized = self.normalizer().normalize(formula);
        let variable = classifier.extract_quantifier_variable(formula);
        tracing::debug!(
            target: "analyze",
            formula,
            normalized = %normalized,
            variable = %variable,
            has_quantifier,
            "prepared"
        );

        let predicate = Predicate::compile(&normalized, has_quantifier, &variable)?;
        let evaluator = self.evaluator();

        let result = if has_quantifier {
            let kind = classifier.classify_quantifier(formula);
            AnalysisResult::Quantified {
                kind,
                truth_value: evaluator.evaluate_quantified(&predicate, kind, &domain),
            }
        } else {
            AnalysisResult::Unquantified {
                predicate_type: evaluator.classify(&predicate, &domain),
                segments: evaluator.truth_segments(&predicate, &domain),
            }
        };

        tracing::debug!(target: "analyze", ?result, "analyzed");
        Ok(Analysis {
            formula: formula.to_string(),
            normalized,
            variable,
            domain,
            result,
        })
    }
}

/// Analyze with the shared notation tables and default options.
pub fn analyze(formula: &str, min: f64, max: f64, step: f64) -> Result<Analysis, AnalysisError> {
    Analyzer::default().analyze(formula, min, max, step)
}
