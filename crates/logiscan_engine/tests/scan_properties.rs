use logiscan_engine::{
    normalize, Domain, DomainEvaluator, Predicate, PredicateType, QuantifierKind,
};
use proptest::prelude::*;

const FRAGMENTS: &[&str] = &[
    "x", "y", "1", "2.5", " ", "  ", "<", "<=", ">", ">=", "=", "==", "≠", "≤", "≥", "∧", "∨",
    "¬", "→", "↔", "(", ")", "∀x ", "∃y ", "forall t. ", ":", "+", "*", " and ", " or ", "not ",
    "sin(", ",",
];

fn arb_notation() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..14).prop_map(|parts| parts.concat())
}

fn arb_predicate() -> impl Strategy<Value = String> {
    prop_oneof![
        (-10i32..10).prop_map(|a| format!("x > {a}")),
        (-10i32..10, 0i32..8).prop_map(|(a, w)| format!("x < {a} or x > {}", a + w)),
        (1i32..6, -3i32..3).prop_map(|(k, c)| format!("sin(x / {k}) > {c} / 4")),
        (2i32..5).prop_map(|m| format!("x % {m} == 0")),
        (-5i32..5).prop_map(|c| format!("1 / (x - {c}) > 0")),
        (-3i32..3, 0i32..3).prop_map(|(a, w)| format!("{a} <= x and x <= {}", a + w)),
    ]
}

// Integer bounds with a unit step keep the strict and tolerant grids identical.
fn arb_integer_domain() -> impl Strategy<Value = Domain> {
    (-20i32..0, 1i32..40).prop_map(|(min, len)| Domain::new(f64::from(min), f64::from(min + len), 1.0))
}

fn compile(src: &str) -> Predicate {
    Predicate::compile(src, false, "x").unwrap()
}

fn point_truths(ev: &DomainEvaluator, p: &Predicate, d: &Domain) -> Vec<(f64, bool)> {
    ev.sample(p, d).into_iter().map(|s| (s.x, s.value.is_true())).collect()
}

proptest! {
    #[test]
    fn normalize_is_idempotent(text in arb_notation()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once.clone(), "input: {:?}", text);
    }

    #[test]
    fn normalized_text_has_no_logic_glyphs(text in arb_notation()) {
        let out = normalize(&text);
        prop_assert!(!out.contains(['∀', '∃', '∧', '∨', '¬', '→', '↔', '≠', '≤', '≥']), "{}", out);
    }

    #[test]
    fn segments_reconstruct_point_sequence(src in arb_predicate(), domain in arb_integer_domain()) {
        let ev = DomainEvaluator::default();
        let p = compile(&src);
        let segments = ev.truth_segments(&p, &domain);

        for (x, truth) in point_truths(&ev, &p, &domain) {
            let covered = segments.iter().any(|s| s.start <= x && x <= s.end);
            prop_assert_eq!(covered, truth, "{} at x = {}", src, x);
        }
        for pair in segments.windows(2) {
            prop_assert!(pair[0].end < pair[1].start);
        }
        for s in &segments {
            prop_assert!(s.start <= s.end);
        }
    }

    #[test]
    fn classification_agrees_with_segments(src in arb_predicate(), domain in arb_integer_domain()) {
        let ev = DomainEvaluator::default();
        let p = compile(&src);
        let segments = ev.truth_segments(&p, &domain);
        let covers_all = segments.len() == 1
            && segments[0].start == domain.min
            && segments[0].end == domain.max;

        let expected = if segments.is_empty() {
            PredicateType::AlwaysFalse
        } else if covers_all {
            PredicateType::AlwaysTrue
        } else {
            PredicateType::Satisfiable
        };
        prop_assert_eq!(ev.classify(&p, &domain), expected, "{}", src);
    }

    #[test]
    fn quantifiers_fold_point_values(src in arb_predicate(), domain in arb_integer_domain()) {
        let ev = DomainEvaluator::default();
        let p = compile(&src);
        let truths: Vec<bool> = point_truths(&ev, &p, &domain).into_iter().map(|(_, t)| t).collect();

        let all = !truths.is_empty() && truths.iter().all(|t| *t);
        let any = truths.iter().any(|t| *t);
        prop_assert_eq!(ev.evaluate_quantified(&p, QuantifierKind::Universal, &domain), all);
        prop_assert_eq!(ev.evaluate_quantified(&p, QuantifierKind::Existential, &domain), any);
    }
}
