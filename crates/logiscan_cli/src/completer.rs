use logiscan_expr::builtin::{BuiltinFn, CONSTANTS, KEYWORDS};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

pub const COMMANDS: &[&str] = &[":domain", ":normalize", ":classify", ":help", ":quit"];

/// Textual quantifier words understood by the normalizer.
const QUANTIFIER_WORDS: &[&str] = &["forall", "exists"];

pub struct LogiscanHelper {
    commands: Vec<String>,
    words: Vec<String>,
}

impl Default for LogiscanHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl LogiscanHelper {
    pub fn new() -> Self {
        let words = QUANTIFIER_WORDS
            .iter()
            .chain(KEYWORDS)
            .chain(CONSTANTS)
            .copied()
            .chain(BuiltinFn::ALL.iter().map(|f| f.name()))
            .map(str::to_string)
            .collect();
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
            words,
        }
    }

    /// Candidates for the word ending at `pos`, with its start offset.
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let (start, word) = extract_word(line, pos);
        if word.is_empty() {
            return (start, Vec::new());
        }
        // Commands only make sense at the start of the line
        let pool = if start == 0 && word.starts_with(':') {
            &self.commands
        } else {
            &self.words
        };
        let matches = pool.iter().filter(|c| c.starts_with(word)).cloned().collect();
        (start, matches)
    }
}

impl Completer for LogiscanHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let (start, matches) = self.candidates(line, pos);
        let pairs = matches
            .into_iter()
            .map(|m| Pair {
                display: m.clone(),
                replacement: m,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for LogiscanHelper {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for LogiscanHelper {}

impl Validator for LogiscanHelper {}

impl Helper for LogiscanHelper {}

fn extract_word(line: &str, pos: usize) -> (usize, &str) {
    let line = &line[..pos];
    let start = line
        .char_indices()
        .rev()
        .find(|&(_, c)| !(c.is_alphanumeric() || c == '_' || c == ':'))
        .map_or(0, |(i, c)| i + c.len_utf8());
    (start, &line[start..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_word() {
        assert_eq!(extract_word("x > 0 an", 8), (6, "an"));
        assert_eq!(extract_word("∀x (si", 8), (6, "si"));
        assert_eq!(extract_word("", 0), (0, ""));
    }

    #[test]
    fn test_command_completion_at_line_start() {
        let h = LogiscanHelper::new();
        assert_eq!(h.candidates(":d", 2), (0, vec![":domain".to_string()]));
        assert_eq!(h.candidates(":q", 2).1, vec![":quit".to_string()]);
    }

    #[test]
    fn test_word_completion() {
        let h = LogiscanHelper::new();
        let (start, m) = h.candidates("fora", 4);
        assert_eq!((start, m), (0, vec!["forall".to_string()]));

        let (_, m) = h.candidates("x > 0 an", 8);
        assert_eq!(m, vec!["and".to_string()]);

        let (_, m) = h.candidates("sq", 2);
        assert_eq!(m, vec!["sqrt".to_string()]);
    }
}
