//! Pattern and substitution tables for the mixed mathematical notation.
//!
//! Tables are compiled once. [`NotationTables::shared`] hands out a lazily
//! built process-wide instance; tests and embedders can still construct their
//! own with [`NotationTables::new`].

use std::sync::LazyLock;

use regex::Regex;

/// Multi-character symbols and their evaluator spelling.
pub const SYMBOL_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("≠", "!="),
    ("≥", ">="),
    ("≤", "<="),
    ("↔", "<=>"),
    ("⇔", "<=>"),
    ("→", "=>"),
    ("⇒", "=>"),
];

/// Logical connective glyphs. Spaces around the words keep `a∧b` tokenizable.
pub const CONNECTIVE_SUBSTITUTIONS: &[(&str, &str)] =
    &[("∧", " and "), ("∨", " or "), ("¬", " not ")];

pub const ARITHMETIC_SUBSTITUTIONS: &[(&str, &str)] =
    &[(":", "/"), ("÷", "/"), ("×", "*"), ("·", "*")];

/// Quantifier glyphs recognised anywhere in the text.
pub const QUANTIFIER_GLYPHS: &[char] = &['∀', '∃'];

/// Characters allowed right after the first variable token in strict mode,
/// besides whitespace and end of input.
pub const VARIABLE_FOLLOWERS: &str = "+-*/^%()[]{}|,.:<>=!&≠≤≥∧∨¬→↔⇒⇔×÷·";

static SHARED: LazyLock<NotationTables> = LazyLock::new(NotationTables::new);

/// Compiled regular expressions used by the normalizer and the classifier.
#[derive(Debug, Clone)]
pub struct NotationTables {
    /// Quantifier at the very start, its bound variable and an optional `.`/`:`/`,`.
    pub leading_quantifier: Regex,
    /// A quantifier glyph left over after the leading strip, e.g. `∀(x > 0)`.
    pub bare_quantifier: Regex,
    /// Any quantifier token, glyph or word.
    pub quantifier_token: Regex,
    pub comparison: Regex,
    /// Letter sequence: a candidate variable.
    pub letters: Regex,
    /// Identifier-shaped token used by the strict predicate check.
    pub identifier: Regex,
    pub whitespace: Regex,
}

impl NotationTables {
    pub fn new() -> Self {
        Self {
            leading_quantifier: Regex::new(
                r"^\s*(?:∀|∃|(?i:forall|exists))\s*([A-Za-z]+)\s*(?:[.:,]\s*)?",
            )
            .expect("valid regex literal"),
            bare_quantifier: Regex::new(r"[∀∃]\s*").expect("valid regex literal"),
            quantifier_token: Regex::new(r"(?i)∀|∃|\b(?:forall|exists)")
                .expect("valid regex literal"),
            comparison: Regex::new(r"<=|>=|==|!=|<|>|≠|≤|≥").expect("valid regex literal"),
            letters: Regex::new(r"[A-Za-z]+").expect("valid regex literal"),
            identifier: Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("valid regex literal"),
            whitespace: Regex::new(r"\s+").expect("valid regex literal"),
        }
    }

    pub fn shared() -> &'static NotationTables {
        &SHARED
    }
}

impl Default for NotationTables {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply a substitution table in order.
pub fn substitute(text: &str, table: &[(&str, &str)]) -> String {
    table
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_quantifier_captures_variable() {
        let t = NotationTables::shared();
        let caps = t.leading_quantifier.captures("  ∀x: x > 0").unwrap();
        assert_eq!(&caps[1], "x");
        assert_eq!(caps.get(0).unwrap().end(), "  ∀x: ".len());

        let caps = t.leading_quantifier.captures("EXISTS y y < 1").unwrap();
        assert_eq!(&caps[1], "y");
        assert!(t.leading_quantifier.captures("x > 0 ∀").is_none());
    }

    #[test]
    fn test_quantifier_token_counts_words_and_glyphs() {
        let t = NotationTables::shared();
        assert_eq!(t.quantifier_token.find_iter("∀x ∃y x > y").count(), 2);
        assert_eq!(t.quantifier_token.find_iter("forall x Exists y").count(), 2);
        // Only word-initial matches count
        assert_eq!(t.quantifier_token.find_iter("preexists > 1").count(), 0);
    }

    #[test]
    fn test_substitute_in_table_order() {
        assert_eq!(substitute("a ≥ b ≠ c", SYMBOL_SUBSTITUTIONS), "a >= b != c");
        assert_eq!(substitute("p ↔ q → r", SYMBOL_SUBSTITUTIONS), "p <=> q => r");
        assert_eq!(substitute("6 : 2 × 3", ARITHMETIC_SUBSTITUTIONS), "6 / 2 * 3");
    }

    #[test]
    fn test_tables_are_sync() {
        fn assert_sync<T: Sync + Send>() {}
        assert_sync::<NotationTables>();
    }
}
