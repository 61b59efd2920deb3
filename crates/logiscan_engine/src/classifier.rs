//! Predicate and quantifier detection on raw formula text.

use std::fmt;

use logiscan_expr::is_reserved_word;

use crate::error::ValidationError;
use crate::notation::{NotationTables, VARIABLE_FOLLOWERS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantifierKind {
    Universal,
    Existential,
}

impl QuantifierKind {
    pub fn symbol(self) -> char {
        match self {
            QuantifierKind::Universal => '∀',
            QuantifierKind::Existential => '∃',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            QuantifierKind::Universal => "universal",
            QuantifierKind::Existential => "existential",
        }
    }
}

impl fmt::Display for QuantifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the classifier can tell about a formula without evaluating it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub is_predicate: bool,
    pub quantifier_count: usize,
    /// Present when exactly one quantifier was found.
    pub quantifier: Option<QuantifierKind>,
    pub variable: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Classifier<'t> {
    tables: &'t NotationTables,
    strict: bool,
}

impl Default for Classifier<'static> {
    fn default() -> Self {
        Self::new(NotationTables::shared())
    }
}

impl<'t> Classifier<'t> {
    /// A strict classifier over `tables`.
    pub fn new(tables: &'t NotationTables) -> Self {
        Self {
            tables,
            strict: true,
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// True when the text has a comparison operator and a letter sequence.
    ///
    /// In strict mode the character right after the first identifier must
    /// also be whitespace, an operator or grouping symbol, or end of input,
    /// which rejects things like `x² > 1` or `xé < 2`.
    pub fn is_predicate(&self, text: &str) -> bool {
        if !self.tables.comparison.is_match(text) || !self.tables.letters.is_match(text) {
            return false;
        }
        if !self.strict {
            return true;
        }

        let Some(first) = self.tables.identifier.find(text) else {
            return false;
        };
        match text[first.end()..].chars().next() {
            None => true,
            Some(c) => c.is_whitespace() || VARIABLE_FOLLOWERS.contains(c),
        }
    }

    pub fn count_quantifiers(&self, text: &str) -> usize {
        self.tables.quantifier_token.find_iter(text).count()
    }

    /// `Ok(true)` for exactly one quantifier, `Ok(false)` for none.
    pub fn has_quantifiers(&self, text: &str) -> Result<bool, ValidationError> {
        match self.count_quantifiers(text) {
            0 => Ok(false),
            1 => Ok(true),
            count => Err(ValidationError::MultipleQuantifiers { count }),
        }
    }

    /// The variable a formula is about.
    ///
    /// A leading quantifier names it directly. Otherwise the first letter
    /// sequence that is not a keyword, function or constant is used, so
    /// `sin(x) > 0` yields `x`. Returns an empty string when nothing matches.
    pub fn extract_quantifier_variable(&self, text: &str) -> String {
        if let Some(caps) = self.tables.leading_quantifier.captures(text) {
            return caps[1].to_string();
        }

        self.tables
            .identifier
            .find_iter(text)
            .map(|m| m.as_str())
            .find(|word| !is_reserved_word(word) && !is_quantifier_word(word))
            .map(|word| word.to_string())
            .unwrap_or_default()
    }

    /// Kind of the leading quantifier, by prefix of the trimmed, lower-cased
    /// text. Anything unrecognised defaults to existential.
    pub fn classify_quantifier(&self, text: &str) -> QuantifierKind {
        let text = text.trim().to_lowercase();
        if text.starts_with('∀') || text.starts_with("forall") {
            QuantifierKind::Universal
        } else {
            // Covers `∃`/`exists` and the unrecognised fallback
            QuantifierKind::Existential
        }
    }

    pub fn classify(&self, text: &str) -> Classification {
        let quantifier_count = self.count_quantifiers(text);
        Classification {
            is_predicate: self.is_predicate(text),
            quantifier_count,
            quantifier: (quantifier_count == 1).then(|| self.classify_quantifier(text)),
            variable: self.extract_quantifier_variable(text),
        }
    }
}

fn is_quantifier_word(word: &str) -> bool {
    word.eq_ignore_ascii_case("forall") || word.eq_ignore_ascii_case("exists")
}
