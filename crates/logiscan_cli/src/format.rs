//! Plain-text rendering shared by the subcommands and the REPL.

use std::fmt::Write;

use logiscan_engine::{Analysis, AnalysisResult, Classification, Domain, DomainPreview, NormalizeStep};

pub fn format_analysis(a: &Analysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Formula:     {}", a.formula);
    let _ = writeln!(out, "Normalized:  {}", a.normalized);
    let _ = writeln!(out, "Variable:    {}", a.variable);
    let _ = write!(out, "Domain:      {}", a.domain);

    match &a.result {
        AnalysisResult::Quantified { kind, truth_value } => {
            let _ = write!(out, "\nQuantifier:  {} ({})", kind, kind.symbol());
            let _ = write!(out, "\nResult:      {}", truth_value);
        }
        AnalysisResult::Unquantified {
            predicate_type,
            segments,
        } => {
            let _ = write!(out, "\nType:        {}", predicate_type);
            let _ = write!(out, "\nSegments:    {}", segments.len());
            for seg in segments {
                let _ = write!(out, "\n  {}", seg);
            }
        }
    }
    out
}

pub fn format_classification(c: &Classification) -> String {
    let quantifier = match c.quantifier {
        Some(kind) => format!("{} ({})", c.quantifier_count, kind),
        None => c.quantifier_count.to_string(),
    };
    let variable = if c.variable.is_empty() {
        "-"
    } else {
        c.variable.as_str()
    };
    format!(
        "Predicate:   {}\nQuantifiers: {}\nVariable:    {}",
        if c.is_predicate { "yes" } else { "no" },
        quantifier,
        variable
    )
}

pub fn format_preview(domain: &Domain, preview: &DomainPreview) -> String {
    let mut out = format!("Domain {}", domain);
    if preview.points.is_empty() {
        out.push_str("\n(empty)");
        return out;
    }
    for x in &preview.points {
        let _ = write!(out, "\n{}", x);
    }
    if preview.truncated {
        let _ = write!(out, "\n... (first {} points shown)", preview.points.len());
    }
    out
}

pub fn format_steps(steps: &[NormalizeStep], result: &str) -> String {
    let mut out = String::new();
    for (i, step) in steps.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, step.rule);
        let _ = writeln!(out, "   {}  ->  {}", step.before, step.after);
    }
    let _ = write!(out, "Result: {}", result);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiscan_engine::{analyze, preview_domain, Classifier, Normalizer};

    #[test]
    fn test_format_unquantified_analysis() {
        let a = analyze("x > 0", -2.0, 2.0, 1.0).unwrap();
        let text = format_analysis(&a);
        assert!(text.contains("Type:        satisfiable"));
        assert!(text.contains("Segments:    1\n  [1, 2]"));
    }

    #[test]
    fn test_format_quantified_analysis() {
        let a = analyze("∀x (x > 0)", 1.0, 10.0, 1.0).unwrap();
        let text = format_analysis(&a);
        assert!(text.contains("Quantifier:  universal (∀)"));
        assert!(text.ends_with("Result:      true"));
    }

    #[test]
    fn test_format_classification() {
        let c = Classifier::default().classify("1 + 2");
        assert_eq!(
            format_classification(&c),
            "Predicate:   no\nQuantifiers: 0\nVariable:    -"
        );
    }

    #[test]
    fn test_format_preview_truncated() {
        let d = Domain::new(0.0, 5.0, 1.0);
        let text = format_preview(&d, &preview_domain(&d, 2));
        assert_eq!(text, "Domain [0, 5] step 1\n0\n1\n... (first 2 points shown)");
    }

    #[test]
    fn test_format_steps_ends_with_result() {
        let (out, steps) = Normalizer::default().normalize_with_steps("x ≥ 1");
        let text = format_steps(&steps, &out);
        assert!(text.starts_with("1. substitute_symbols"));
        assert!(text.ends_with("Result: x >= 1"));
    }
}
