//! Rewrites mixed mathematical notation into the evaluator grammar.
//!
//! Normalization is an ordered list of named, pure rules ([`RULES`]). The
//! list is applied until the text stops changing, so a quantifier exposed by
//! a later rule (e.g. after outer parentheses are removed) is still stripped
//! and `normalize(normalize(s)) == normalize(s)`.

mod chain;

use crate::notation::{
    substitute, NotationTables, ARITHMETIC_SUBSTITUTIONS, CONNECTIVE_SUBSTITUTIONS,
    SYMBOL_SUBSTITUTIONS,
};

pub use chain::expand_chains;

/// Upper bound on full passes over the rule list.
const MAX_PASSES: usize = 32;

/// A single rewrite step.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    apply: fn(&NotationTables, &str) -> String,
}

impl Rule {
    pub fn apply(&self, tables: &NotationTables, text: &str) -> String {
        (self.apply)(tables, text)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// The rules, in application order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "strip_quantifiers",
        apply: strip_quantifiers,
    },
    Rule {
        name: "substitute_symbols",
        apply: substitute_symbols,
    },
    Rule {
        name: "substitute_connectives",
        apply: substitute_connectives,
    },
    Rule {
        name: "substitute_division",
        apply: substitute_division,
    },
    Rule {
        name: "expand_chains",
        apply: expand_chain_rule,
    },
    Rule {
        name: "promote_single_equals",
        apply: promote_equals_rule,
    },
    Rule {
        name: "collapse_whitespace",
        apply: collapse_whitespace,
    },
    Rule {
        name: "strip_outer_parens",
        apply: strip_parens_rule,
    },
];

/// One rule application that changed the text, for step-by-step display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeStep {
    pub rule: &'static str,
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'t> {
    tables: &'t NotationTables,
}

impl Default for Normalizer<'static> {
    fn default() -> Self {
        Self::new(NotationTables::shared())
    }
}

impl<'t> Normalizer<'t> {
    pub fn new(tables: &'t NotationTables) -> Self {
        Self { tables }
    }

    pub fn rules(&self) -> &'static [Rule] {
        RULES
    }

    /// Normalize `text`. Total: every input produces some output.
    pub fn normalize(&self, text: &str) -> String {
        self.run(text, |_| {})
    }

    /// Like [`normalize`](Self::normalize), also returning every rule
    /// application that changed the text.
    pub fn normalize_with_steps(&self, text: &str) -> (String, Vec<NormalizeStep>) {
        let mut steps = Vec::new();
        let out = self.run(text, |step| steps.push(step));
        (out, steps)
    }

    fn run(&self, text: &str, mut on_step: impl FnMut(NormalizeStep)) -> String {
        let mut current = text.to_string();

        for pass in 0..MAX_PASSES {
            let start = current.clone();
            for rule in RULES {
                let next = rule.apply(self.tables, &current);
                if next != current {
                    tracing::trace!(
                        target: "normalize",
                        pass,
                        rule = rule.name,
                        before = %current,
                        after = %next,
                        "rule_applied"
                    );
                    on_step(NormalizeStep {
                        rule: rule.name,
                        before: std::mem::replace(&mut current, next.clone()),
                        after: next,
                    });
                }
            }
            // Fixed point check
            if current == start {
                break;
            }
        }

        tracing::debug!(target: "normalize", input = text, output = %current, "normalized");
        current
    }
}

/// Remove leading quantifiers with their bound variables, then any bare
/// quantifier glyph left in the text.
fn strip_quantifiers(tables: &NotationTables, text: &str) -> String {
    let mut out = text.to_string();
    while let Some(m) = tables.leading_quantifier.find(&out) {
        out = out[m.end()..].to_string();
    }
    let out = tables.bare_quantifier.replace_all(&out, "");
    out.trim().to_string()
}

fn substitute_symbols(_: &NotationTables, text: &str) -> String {
    substitute(text, SYMBOL_SUBSTITUTIONS)
}

fn substitute_connectives(_: &NotationTables, text: &str) -> String {
    substitute(text, CONNECTIVE_SUBSTITUTIONS)
}

fn substitute_division(_: &NotationTables, text: &str) -> String {
    substitute(text, ARITHMETIC_SUBSTITUTIONS)
}

fn expand_chain_rule(_: &NotationTables, text: &str) -> String {
    expand_chains(text)
}

fn promote_equals_rule(_: &NotationTables, text: &str) -> String {
    promote_single_equals(text)
}

fn strip_parens_rule(_: &NotationTables, text: &str) -> String {
    strip_outer_parens(text)
}

/// `a = b` → `a == b`; `=` next to `<`, `>`, `!` or `=` is left alone.
fn promote_single_equals(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let is_op = |c: Option<&char>| matches!(c, Some('<' | '>' | '!' | '='));

    let mut out = String::with_capacity(text.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        out.push(c);
        let prev = if i == 0 { None } else { chars.get(i - 1) };
        if c == '=' && !is_op(prev) && !is_op(chars.get(i + 1)) {
            out.push('=');
        }
    }
    out
}

fn collapse_whitespace(tables: &NotationTables, text: &str) -> String {
    tables.whitespace.replace_all(text, " ").trim().to_string()
}

/// Strip parentheses that wrap the whole text, repeatedly.
///
/// One scan matches every paren, then the leading `(` run and the trailing
/// `)` run are peeled while they pair up with each other.
fn strip_outer_parens(text: &str) -> String {
    let text = text.trim();
    let leading: Vec<usize> = text
        .char_indices()
        .filter(|&(_, c)| !c.is_whitespace())
        .take_while(|&(_, c)| c == '(')
        .map(|(i, _)| i)
        .collect();
    let trailing: Vec<usize> = text
        .char_indices()
        .rev()
        .filter(|&(_, c)| !c.is_whitespace())
        .take_while(|&(_, c)| c == ')')
        .map(|(i, _)| i)
        .collect();
    if leading.is_empty() || trailing.is_empty() {
        return text.to_string();
    }

    // Close index for each paren of the leading run
    let mut matched = vec![None; leading.len()];
    let mut open = Vec::new();
    for (i, c) in text.char_indices() {
        match c {
            '(' => open.push(i),
            ')' => {
                if let Some(start) = open.pop() {
                    if let Ok(k) = leading.binary_search(&start) {
                        matched[k] = Some(i);
                    }
                }
            }
            _ => {}
        }
    }

    let layers = leading
        .iter()
        .zip(&trailing)
        .zip(&matched)
        .take_while(|((_, close), m)| **m == Some(**close))
        .count();
    match layers {
        0 => text.to_string(),
        n => text[leading[n - 1] + 1..trailing[n - 1]].trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> String {
        Normalizer::default().normalize(text)
    }

    #[test]
    fn test_rule_order_is_fixed() {
        let names: Vec<_> = Normalizer::default().rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "strip_quantifiers",
                "substitute_symbols",
                "substitute_connectives",
                "substitute_division",
                "expand_chains",
                "promote_single_equals",
                "collapse_whitespace",
                "strip_outer_parens",
            ]
        );
    }

    #[test]
    fn test_mixed_notation() {
        assert_eq!(
            normalize("¬(x ≥ 5 ∧ y ≤ 10) → z = 3"),
            "not (x >= 5 and y <= 10) => z == 3"
        );
        assert_eq!(normalize("x ≠ 1 ∨ x ↔ 2"), "x != 1 or x <=> 2");
        assert_eq!(normalize("x : 2 > 1"), "x / 2 > 1");
        assert_eq!(normalize("p ⇒ q ⇔ r"), "p => q <=> r");
    }

    #[test]
    fn test_quantifier_stripping() {
        assert_eq!(normalize("∀x (x > 0)"), "x > 0");
        assert_eq!(normalize("∃x: x < 0"), "x < 0");
        assert_eq!(normalize("forall x. x*x >= 0"), "x*x >= 0");
        assert_eq!(normalize("EXISTS y y = 2"), "y == 2");
        assert_eq!(normalize("∀(x > 0)"), "x > 0");
        // A quantifier exposed by paren stripping is removed on the next pass
        assert_eq!(normalize("(forall x (x > 0))"), "x > 0");
    }

    #[test]
    fn test_chain_expansion_before_equals_promotion() {
        assert_eq!(normalize("1 < x ≤ 5"), "(1 < x) and (x <= 5)");
        assert_eq!(normalize("0 = x = 0"), "(0 == x) and (x == 0)");
    }

    #[test]
    fn test_single_equals_promotion() {
        assert_eq!(promote_single_equals("a = b"), "a == b");
        assert_eq!(promote_single_equals("a <= b >= c != d == e"), "a <= b >= c != d == e");
        assert_eq!(promote_single_equals("a => b <=> c"), "a => b <=> c");
        assert_eq!(promote_single_equals("=x"), "==x");
    }

    #[test]
    fn test_outer_parens() {
        assert_eq!(strip_outer_parens("((x > 0))"), "x > 0");
        assert_eq!(strip_outer_parens("(x > 0) and (x < 5)"), "(x > 0) and (x < 5)");
        assert_eq!(strip_outer_parens("(x > 0"), "(x > 0");
        assert_eq!(strip_outer_parens("()"), "");
        assert_eq!(strip_outer_parens(" ( (x) (y) ) "), "(x) (y)");
    }

    #[test]
    fn test_deep_parentheses() {
        let depth = 20_000;
        let text = format!("{}x > 0{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(normalize(&text), "x > 0");

        let chained = format!("{}1 < x ≤ 3{}", "( ".repeat(depth), " )".repeat(depth));
        assert_eq!(normalize(&chained), "(1 < x) and (x <= 3)");
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(normalize("  x   >\t0  "), "x > 0");
        assert_eq!(normalize("x>0∧x<5"), "x>0 and x<5");
    }

    #[test]
    fn test_total_on_garbage() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("))(("), "))((");
        assert_eq!(normalize("∀∃"), "");
    }

    #[test]
    fn test_steps_record_changed_rules_only() {
        let (out, steps) = Normalizer::default().normalize_with_steps("x ≥ 1");
        assert_eq!(out, "x >= 1");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].rule, "substitute_symbols");
        assert_eq!(steps[0].before, "x ≥ 1");
        assert_eq!(steps[0].after, "x >= 1");
    }
}
