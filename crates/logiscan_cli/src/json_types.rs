//! JSON output types for the `--format json` mode of every subcommand.
//!
//! Successful outputs carry `"ok": true`; failures are reported as
//! [`ErrorJsonOutput`].

use logiscan_engine::{
    Analysis, AnalysisError, AnalysisResult, Classification, Domain, DomainPreview, NormalizeStep,
    SeriesPoint, TruthSegment, ValidationError,
};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct DomainJson {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl From<&Domain> for DomainJson {
    fn from(d: &Domain) -> Self {
        Self {
            min: d.min,
            max: d.max,
            step: d.step,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy)]
pub struct SegmentJson {
    pub start: f64,
    pub end: f64,
}

impl From<&TruthSegment> for SegmentJson {
    fn from(s: &TruthSegment) -> Self {
        Self {
            start: s.start,
            end: s.end,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy)]
pub struct SeriesPointJson {
    pub x: f64,
    pub y: u8,
}

impl From<&SeriesPoint> for SeriesPointJson {
    fn from(p: &SeriesPoint) -> Self {
        Self { x: p.x, y: p.level }
    }
}

/// Result of `analyze --format json`
#[derive(Serialize, Debug)]
pub struct AnalyzeJsonOutput {
    pub ok: bool,
    pub formula: String,
    pub normalized: String,
    pub variable: String,
    pub domain: DomainJson,
    pub quantified: bool,

    /// "universal" or "existential"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truth_value: Option<bool>,

    /// "always_true", "always_false" or "satisfiable"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicate_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<SegmentJson>>,

    /// Step polyline of the segments, for plotting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<Vec<SeriesPointJson>>,
}

impl AnalyzeJsonOutput {
    pub fn new(analysis: &Analysis, series: &[SeriesPoint]) -> Self {
        let mut out = Self {
            ok: true,
            formula: analysis.formula.clone(),
            normalized: analysis.normalized.clone(),
            variable: analysis.variable.clone(),
            domain: DomainJson::from(&analysis.domain),
            quantified: false,
            quantifier: None,
            truth_value: None,
            predicate_type: None,
            segments: None,
            series: None,
        };
        match &analysis.result {
            AnalysisResult::Quantified { kind, truth_value } => {
                out.quantified = true;
                out.quantifier = Some(kind.name().to_string());
                out.truth_value = Some(*truth_value);
            }
            AnalysisResult::Unquantified {
                predicate_type,
                segments,
            } => {
                out.predicate_type = Some(predicate_type.name().to_string());
                out.segments = Some(segments.iter().map(SegmentJson::from).collect());
                out.series = Some(series.iter().map(SeriesPointJson::from).collect());
            }
        }
        out
    }
}

#[derive(Serialize, Debug)]
pub struct StepJson {
    pub rule: String,
    pub before: String,
    pub after: String,
}

impl From<&NormalizeStep> for StepJson {
    fn from(s: &NormalizeStep) -> Self {
        Self {
            rule: s.rule.to_string(),
            before: s.before.clone(),
            after: s.after.clone(),
        }
    }
}

/// Result of `normalize --format json`
#[derive(Serialize, Debug)]
pub struct NormalizeJsonOutput {
    pub ok: bool,
    pub input: String,
    pub normalized: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepJson>,
}

/// Result of `classify --format json`
#[derive(Serialize, Debug)]
pub struct ClassifyJsonOutput {
    pub ok: bool,
    pub input: String,
    pub is_predicate: bool,
    pub quantifier_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantifier: Option<String>,
    pub variable: String,
}

impl ClassifyJsonOutput {
    pub fn new(input: &str, c: &Classification) -> Self {
        Self {
            ok: true,
            input: input.to_string(),
            is_predicate: c.is_predicate,
            quantifier_count: c.quantifier_count,
            quantifier: c.quantifier.map(|k| k.name().to_string()),
            variable: c.variable.clone(),
        }
    }
}

/// Result of `domain --format json`
#[derive(Serialize, Debug)]
pub struct DomainJsonOutput {
    pub ok: bool,
    pub domain: DomainJson,
    pub estimated_samples: f64,
    pub points: Vec<f64>,
    pub truncated: bool,
}

impl DomainJsonOutput {
    pub fn new(domain: &Domain, preview: DomainPreview) -> Self {
        Self {
            ok: true,
            domain: DomainJson::from(domain),
            estimated_samples: domain.estimated_samples(),
            points: preview.points,
            truncated: preview.truncated,
        }
    }
}

/// An error result
#[derive(Serialize, Debug)]
pub struct ErrorJsonOutput {
    pub ok: bool,
    pub error: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

impl ErrorJsonOutput {
    pub fn from_error(error: &anyhow::Error, input: Option<&str>) -> Self {
        Self {
            ok: false,
            error: error.to_string(),
            kind: error_kind(error).to_string(),
            input: input.map(str::to_string),
        }
    }
}

/// Stable class name for an error raised by a command.
pub fn error_kind(error: &anyhow::Error) -> &'static str {
    if let Some(e) = error.downcast_ref::<AnalysisError>() {
        e.kind()
    } else if error.downcast_ref::<ValidationError>().is_some() {
        "input_validation"
    } else {
        "internal"
    }
}

pub fn print_pretty_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => {
            eprintln!("JSON serialization error: {}", e);
            match serde_json::to_string(value) {
                Ok(s) => println!("{}", s),
                Err(_) => println!("{{\"ok\":false,\"error\":\"JSON_SERIALIZATION_FAILED\"}}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiscan_engine::analyze;

    #[test]
    fn test_error_kind() {
        let e = anyhow::Error::new(ValidationError::EmptyFormula);
        assert_eq!(error_kind(&e), "input_validation");

        let e = anyhow::Error::new(analyze("x > > 1", 0.0, 1.0, 1.0).unwrap_err());
        assert_eq!(error_kind(&e), "expression_syntax");

        assert_eq!(error_kind(&anyhow::anyhow!("boom")), "internal");
    }

    #[test]
    fn test_quantified_output_has_no_segments() {
        let a = analyze("∃x: x > 3", 0.0, 5.0, 1.0).unwrap();
        let json = serde_json::to_value(AnalyzeJsonOutput::new(&a, &[])).unwrap();
        assert_eq!(json["quantifier"], "existential");
        assert_eq!(json["truth_value"], true);
        assert!(json.get("segments").is_none());
        assert!(json.get("series").is_none());
    }
}
