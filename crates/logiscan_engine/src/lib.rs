//! Logic-formula analysis over sampled numeric domains.
//!
//! Raw text in mixed notation (`∀x: 1 < x ≤ 5`, `¬(x ≥ 5) → x = 3`) is
//! normalized into the `logiscan_expr` grammar, classified, compiled once and
//! then sampled over a [`Domain`].

pub mod analyzer;
pub mod classifier;
pub mod domain;
pub mod error;
pub mod normalizer;
pub mod notation;
pub mod predicate;
pub mod preview;
pub mod scan;

pub use analyzer::{analyze, Analysis, AnalysisResult, Analyzer, AnalyzerOptions, DEFAULT_MAX_SAMPLES};
pub use classifier::{Classification, Classifier, QuantifierKind};
pub use domain::{Domain, Grid, PredicateType, TruthSegment};
pub use error::{AnalysisError, ValidationError};
pub use normalizer::{NormalizeStep, Normalizer};
pub use notation::NotationTables;
pub use predicate::Predicate;
pub use preview::{preview_domain, truth_series, DomainPreview, SeriesPoint, TruthSeries, DEFAULT_PREVIEW_LIMIT};
pub use scan::{DomainEvaluator, PointValue, Sample, DEFAULT_TRUTHY_EPSILON};

/// Normalize `text` with the shared notation tables.
pub fn normalize(text: &str) -> String {
    Normalizer::default().normalize(text)
}
