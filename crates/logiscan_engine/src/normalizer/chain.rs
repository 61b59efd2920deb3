//! Comparison-chain expansion: `1 < x <= 5` becomes `((1 < x) and (x <= 5))`.
//!
//! Text is lexed into a light token stream and grouped by parentheses. Inside
//! each group, clauses are delimited by logical separators; a clause with two
//! or more comparison operators at its own level is rewritten as one conjunct
//! per adjacent operand pair. Everything else is reproduced verbatim.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Open,
    Close,
    Comparison,
    Separator,
    Text,
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    kind: TokenKind,
    text: &'a str,
}

// Longest first: `<=>` and `=>` are separators, never comparisons.
const OPERATORS: &[(&str, TokenKind)] = &[
    ("<=>", TokenKind::Separator),
    ("=>", TokenKind::Separator),
    ("<=", TokenKind::Comparison),
    (">=", TokenKind::Comparison),
    ("==", TokenKind::Comparison),
    ("!=", TokenKind::Comparison),
    ("&&", TokenKind::Separator),
    ("||", TokenKind::Separator),
    ("<", TokenKind::Comparison),
    (">", TokenKind::Comparison),
    ("=", TokenKind::Comparison),
    ("!", TokenKind::Separator),
    (",", TokenKind::Separator),
];

const SEPARATOR_WORDS: &[&str] = &["and", "or", "not"];

fn lex(src: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = src;

    while let Some(c) = rest.chars().next() {
        let (kind, len) = if c == '(' {
            (TokenKind::Open, 1)
        } else if c == ')' {
            (TokenKind::Close, 1)
        } else if let Some((op, kind)) = OPERATORS.iter().find(|(op, _)| rest.starts_with(op)) {
            (*kind, op.len())
        } else if c.is_ascii_alphabetic() || c == '_' {
            let len = rest
                .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
                .unwrap_or(rest.len());
            let kind = if SEPARATOR_WORDS.contains(&&rest[..len]) {
                TokenKind::Separator
            } else {
                TokenKind::Text
            };
            (kind, len)
        } else if c.is_ascii_digit() || c == '.' {
            let len = rest
                .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
                .unwrap_or(rest.len());
            (TokenKind::Text, len)
        } else {
            (TokenKind::Text, c.len_utf8())
        };

        tokens.push(Token {
            kind,
            text: &rest[..len],
        });
        rest = &rest[len..];
    }

    tokens
}

enum Piece<'a> {
    Operand(String),
    Operator(&'a str),
}

/// Rendered text and pending clause of one parenthesis level.
#[derive(Default)]
struct Level<'a> {
    out: String,
    clause: Vec<Piece<'a>>,
}

impl<'a> Level<'a> {
    fn separate(&mut self, separator: &str) {
        self.out.push_str(&render_clause(&self.clause));
        self.clause.clear();
        self.out.push_str(separator);
    }

    fn finish(mut self) -> String {
        self.out.push_str(&render_clause(&self.clause));
        self.out
    }

    fn wrap(self, closed: bool) -> String {
        let mut text = String::from("(");
        text.push_str(&self.finish());
        if closed {
            text.push(')');
        }
        text
    }
}

fn render_clause(pieces: &[Piece<'_>]) -> String {
    let mut operands = vec![String::new()];
    let mut operators = Vec::new();
    for piece in pieces {
        match piece {
            Piece::Operand(text) => {
                if let Some(last) = operands.last_mut() {
                    last.push_str(text);
                }
            }
            Piece::Operator(op) => {
                operators.push(*op);
                operands.push(String::new());
            }
        }
    }

    let verbatim = || {
        let mut s = String::new();
        for piece in pieces {
            match piece {
                Piece::Operand(text) => s.push_str(text),
                Piece::Operator(op) => s.push_str(op),
            }
        }
        s
    };

    // Malformed chains (`< x <`) are left for the parser to reject
    if operators.len() < 2 || operands.iter().any(|o| o.trim().is_empty()) {
        return verbatim();
    }

    let first = &operands[0];
    let last = &operands[operands.len() - 1];
    let leading = &first[..first.len() - first.trim_start().len()];
    let trailing = &last[last.trim_end().len()..];

    let conjuncts: Vec<String> = operators
        .iter()
        .enumerate()
        .map(|(i, op)| format!("({} {} {})", operands[i].trim(), op, operands[i + 1].trim()))
        .collect();

    format!("{}({}){}", leading, conjuncts.join(" and "), trailing)
}

/// Expand every comparison chain in `src`.
///
/// Enclosing levels live on an explicit stack, so nesting depth is bounded
/// only by memory. A stray `)` at top level stays plain text; an unclosed
/// `(` is reproduced without a closing paren.
pub fn expand_chains(src: &str) -> String {
    let mut current = Level::default();
    let mut enclosing: Vec<Level<'_>> = Vec::new();

    for tok in lex(src) {
        match tok.kind {
            TokenKind::Open => enclosing.push(std::mem::take(&mut current)),
            TokenKind::Close => match enclosing.pop() {
                Some(parent) => {
                    let inner = std::mem::replace(&mut current, parent);
                    current.clause.push(Piece::Operand(inner.wrap(true)));
                }
                None => current.clause.push(Piece::Operand(tok.text.to_string())),
            },
            TokenKind::Separator => current.separate(tok.text),
            TokenKind::Comparison => current.clause.push(Piece::Operator(tok.text)),
            TokenKind::Text => current.clause.push(Piece::Operand(tok.text.to_string())),
        }
    }

    while let Some(parent) = enclosing.pop() {
        let inner = std::mem::replace(&mut current, parent);
        current.clause.push(Piece::Operand(inner.wrap(false)));
    }
    current.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_comparisons() {
        assert_eq!(expand_chains("1 < x <= 5"), "((1 < x) and (x <= 5))");
    }

    #[test]
    fn test_long_chain_keeps_operator_identity() {
        assert_eq!(
            expand_chains("a < b >= c != d"),
            "((a < b) and (b >= c) and (c != d))"
        );
    }

    #[test]
    fn test_single_comparison_untouched() {
        assert_eq!(expand_chains("x + 1 > 2*y"), "x + 1 > 2*y");
        assert_eq!(expand_chains("  x > 0  "), "  x > 0  ");
    }

    #[test]
    fn test_chain_per_clause() {
        assert_eq!(
            expand_chains("x > 0 and 1 < y < 2"),
            "x > 0 and ((1 < y) and (y < 2))"
        );
        assert_eq!(
            expand_chains("not 0 <= x < 1 => x == 0"),
            "not ((0 <= x) and (x < 1)) => x == 0"
        );
    }

    #[test]
    fn test_chain_per_paren_level() {
        assert_eq!(expand_chains("(0 < x < 1) or x > 5"), "(((0 < x) and (x < 1))) or x > 5");
        // Comparisons inside a group do not join a chain outside it
        assert_eq!(expand_chains("(x > 0) == (y > 0)"), "(x > 0) == (y > 0)");
    }

    #[test]
    fn test_lone_equals_counts_as_comparison() {
        assert_eq!(expand_chains("0 = x = 0"), "((0 = x) and (x = 0))");
    }

    #[test]
    fn test_equivalence_and_implication_are_separators() {
        assert_eq!(expand_chains("x > 0 <=> x >= 1"), "x > 0 <=> x >= 1");
        assert_eq!(expand_chains("x > 0 => x >= 1"), "x > 0 => x >= 1");
    }

    #[test]
    fn test_function_arguments_are_clauses() {
        assert_eq!(expand_chains("max(x, 1) < y < 3"), "((max(x, 1) < y) and (y < 3))");
    }

    #[test]
    fn test_unbalanced_input_is_preserved() {
        assert_eq!(expand_chains("(x > 0"), "(x > 0");
        assert_eq!(expand_chains("x > 0)"), "x > 0)");
        assert_eq!(expand_chains("< x <"), "< x <");
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 20_000;
        let src = format!("{}x > 0{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(expand_chains(&src), src);

        let chained = format!("{}0 < x < 1{}", "(".repeat(depth), ")".repeat(depth));
        let expected = format!(
            "{}((0 < x) and (x < 1)){}",
            "(".repeat(depth),
            ")".repeat(depth)
        );
        assert_eq!(expand_chains(&chained), expected);

        let unclosed = "(".repeat(depth);
        assert_eq!(expand_chains(&unclosed), unclosed);
    }
}
