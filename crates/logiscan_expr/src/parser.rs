use std::cell::Cell;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{digit1, multispace0, one_of},
    combinator::{map, opt, recognize},
    error::ErrorKind,
    multi::separated_list0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::ast::{BinaryOp, Constant, Expr, UnaryOp};
use crate::builtin::{BuiltinFn, KEYWORDS};
use crate::error::ParseError;

// Intermediate AST for parsing.
// Identifiers and calls stay unresolved until `lower`, so unknown functions
// and wrong argument counts become typed errors instead of nom failures.
#[derive(Debug, Clone)]
enum ParseNode {
    Number(f64),
    Bool(bool),
    Identifier(String),
    Call(String, Vec<ParseNode>),
    Unary(UnaryOp, Box<ParseNode>),
    Binary(BinaryOp, Box<ParseNode>, Box<ParseNode>),
}

/// Deepest syntactic nesting accepted: parenthesised groups, call and
/// `|..|` arguments, prefix operators, exponent and implication chains.
pub const MAX_NESTING: usize = 128;

/// Deepest expression tree accepted, counting the root as 1. Long flat
/// chains such as `x + x + ...` grow the tree one level per operator.
pub const MAX_TREE_DEPTH: usize = 1024;

thread_local! {
    static NESTING: Cell<usize> = const { Cell::new(0) };
}

// Holds one level of the current thread's nesting count until dropped.
struct NestingGuard;

impl NestingGuard {
    fn enter(input: &str) -> Result<Self, nom::Err<nom::error::Error<&str>>> {
        NESTING.with(|depth| {
            if depth.get() >= MAX_NESTING {
                return Err(nom::Err::Failure(nom::error::Error::new(
                    input,
                    ErrorKind::TooLarge,
                )));
            }
            depth.set(depth.get() + 1);
            Ok(NestingGuard)
        })
    }
}

impl Drop for NestingGuard {
    fn drop(&mut self) {
        NESTING.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

impl ParseNode {
    fn binary(op: BinaryOp, lhs: ParseNode, rhs: ParseNode) -> Self {
        ParseNode::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    /// Longest root-to-leaf path, counting both ends. Iterative.
    fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, d)) = stack.pop() {
            max = max.max(d);
            match node {
                ParseNode::Call(_, args) => stack.extend(args.iter().map(|a| (a, d + 1))),
                ParseNode::Unary(_, e) => stack.push((&**e, d + 1)),
                ParseNode::Binary(_, l, r) => {
                    stack.push((&**l, d + 1));
                    stack.push((&**r, d + 1));
                }
                ParseNode::Number(_) | ParseNode::Bool(_) | ParseNode::Identifier(_) => {}
            }
        }
        max
    }

    fn lower(self) -> Result<Expr, ParseError> {
        Ok(match self {
            ParseNode::Number(n) => Expr::Number(n),
            ParseNode::Bool(b) => Expr::Bool(b),
            ParseNode::Identifier(name) => match name.as_str() {
                "pi" => Expr::Constant(Constant::Pi),
                "e" => Expr::Constant(Constant::E),
                _ => Expr::Variable(name),
            },
            ParseNode::Call(name, args) => {
                let func = BuiltinFn::from_name(&name)
                    .ok_or_else(|| ParseError::UnknownFunction { name: name.clone() })?;
                if !func.arity().accepts(args.len()) {
                    return Err(ParseError::Arity {
                        name,
                        expected: func.arity().to_string(),
                        found: args.len(),
                    });
                }
                let args = args
                    .into_iter()
                    .map(ParseNode::lower)
                    .collect::<Result<Vec<_>, _>>()?;
                Expr::Call(func, args)
            }
            ParseNode::Unary(op, e) => Expr::Unary(op, Box::new(e.lower()?)),
            ParseNode::Binary(op, l, r) => {
                Expr::Binary(op, Box::new(l.lower()?), Box::new(r.lower()?))
            }
        })
    }
}

fn fail<T>(input: &str, kind: nom::error::ErrorKind) -> IResult<&str, T> {
    Err(nom::Err::Error(nom::error::Error::new(input, kind)))
}

fn too_long<T>(input: &str) -> IResult<&str, T> {
    Err(nom::Err::Failure(nom::error::Error::new(input, ErrorKind::Count)))
}

// Left-associative fold of `(op, operand)` steps onto `acc`. Stops at the
// first step that does not match and fails once the tree gets too deep.
fn fold_left<'a, F>(
    mut input: &'a str,
    mut acc: ParseNode,
    mut step: F,
) -> IResult<&'a str, ParseNode>
where
    F: FnMut(&'a str) -> IResult<&'a str, (BinaryOp, ParseNode)>,
{
    let mut depth = acc.depth();
    loop {
        match step(input) {
            Ok((rest, (op, rhs))) => {
                depth = 1 + depth.max(rhs.depth());
                if depth > MAX_TREE_DEPTH {
                    return too_long(input);
                }
                acc = ParseNode::binary(op, acc, rhs);
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, acc)),
            Err(e) => return Err(e),
        }
    }
}

// Parser for numeric literals
// Supports: 123, 8.2, .5, 8., 1e-3, 2.5E+4
fn parse_number(input: &str) -> IResult<&str, ParseNode> {
    fn is_digit(c: char) -> bool {
        c.is_ascii_digit()
    }

    let (remaining, text) = recognize(tuple((
        take_while(is_digit),
        opt(pair(tag("."), take_while(is_digit))),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)?;

    // Must have at least one digit before any exponent
    let mantissa_digits = text
        .chars()
        .take_while(|c| *c != 'e' && *c != 'E')
        .filter(char::is_ascii_digit)
        .count();
    if mantissa_digits == 0 {
        return fail(input, nom::error::ErrorKind::Digit);
    }

    match text.parse::<f64>() {
        Ok(n) => Ok((remaining, ParseNode::Number(n))),
        Err(_) => fail(input, nom::error::ErrorKind::Float),
    }
}

// Parser for identifiers (variable/function names)
// Identifiers start with letter or underscore, then allow letters, digits, underscores
fn parse_identifier(input: &str) -> IResult<&str, &str> {
    let mut chars = input.chars();
    let first = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => c,
        _ => return fail(input, nom::error::ErrorKind::Alpha),
    };

    let mut len = first.len_utf8();
    for c in chars {
        if c.is_ascii_alphanumeric() || c == '_' {
            len += c.len_utf8();
        } else {
            break;
        }
    }

    Ok((&input[len..], &input[..len]))
}

// A reserved word, matched only on a whole identifier (`and` but not `android`)
fn keyword(word: &'static str) -> impl Fn(&str) -> IResult<&str, &str> {
    move |input: &str| {
        let (rest, ident) = parse_identifier(input)?;
        if ident == word {
            Ok((rest, ident))
        } else {
            fail(input, nom::error::ErrorKind::Tag)
        }
    }
}

fn parse_bool(input: &str) -> IResult<&str, ParseNode> {
    alt((
        map(keyword("true"), |_| ParseNode::Bool(true)),
        map(keyword("false"), |_| ParseNode::Bool(false)),
    ))(input)
}

// Parser for function calls: name(arg, ...)
fn parse_call(input: &str) -> IResult<&str, ParseNode> {
    let (input, name) = parse_identifier(input)?;
    let (input, _) = preceded(multispace0, tag("("))(input)?;
    let (input, args) = separated_list0(preceded(multispace0, tag(",")), parse_iff)(input)?;
    let (input, _) = preceded(multispace0, tag(")"))(input)?;
    Ok((input, ParseNode::Call(name.to_string(), args)))
}

fn parse_variable(input: &str) -> IResult<&str, ParseNode> {
    let (rest, ident) = parse_identifier(input)?;
    if KEYWORDS.contains(&ident) {
        return fail(input, nom::error::ErrorKind::Verify);
    }
    Ok((rest, ParseNode::Identifier(ident.to_string())))
}

fn parse_parens(input: &str) -> IResult<&str, ParseNode> {
    delimited(tag("("), parse_iff, preceded(multispace0, tag(")")))(input)
}

fn parse_abs(input: &str) -> IResult<&str, ParseNode> {
    map(
        delimited(tag("|"), parse_additive, preceded(multispace0, tag("|"))),
        |e| ParseNode::Call("abs".to_string(), vec![e]),
    )(input)
}

// Atom
fn parse_atom(input: &str) -> IResult<&str, ParseNode> {
    let _level = NestingGuard::enter(input)?;
    preceded(
        multispace0,
        alt((
            parse_number,
            parse_bool,
            parse_call,
            parse_variable,
            parse_parens,
            parse_abs,
        )),
    )(input)
}

// Power - right associative: 2^3^4 = 2^(3^4)
// `**` is accepted as a synonym of `^`
fn parse_power(input: &str) -> IResult<&str, ParseNode> {
    let (input, base) = parse_atom(input)?;

    let caret = preceded::<_, _, _, nom::error::Error<&str>, _, _>(
        multispace0,
        alt((tag("**"), tag("^"))),
    )(input);

    if let Ok((input, _)) = caret {
        let _level = NestingGuard::enter(input)?;
        let (input, exp) = parse_power_exponent(input)?;
        Ok((input, ParseNode::binary(BinaryOp::Pow, base, exp)))
    } else {
        Ok((input, base))
    }
}

// Exponents allow a sign prefix (x^-2) then recurse for chained powers
fn parse_power_exponent(input: &str) -> IResult<&str, ParseNode> {
    let (input, _) = multispace0(input)?;
    let Some(sign) = input.chars().next().filter(|&c| c == '-' || c == '+') else {
        return parse_power(input);
    };
    let _level = NestingGuard::enter(input)?;
    let (rest, e) = parse_power_exponent(&input[1..])?;
    match sign {
        '-' => Ok((rest, ParseNode::Unary(UnaryOp::Neg, Box::new(e)))),
        _ => Ok((rest, e)),
    }
}

// Unary
fn parse_unary(input: &str) -> IResult<&str, ParseNode> {
    let (trimmed, _) = multispace0(input)?;
    let Some(sign) = trimmed.chars().next().filter(|&c| c == '-' || c == '+') else {
        return parse_power(input);
    };
    let _level = NestingGuard::enter(trimmed)?;
    let (rest, e) = parse_unary(&trimmed[1..])?;
    match sign {
        '-' => Ok((rest, ParseNode::Unary(UnaryOp::Neg, Box::new(e)))),
        _ => Ok((rest, e)),
    }
}

// A unary operand plus any implicit multiplication glued to it: 2x, 3(x+1)
fn parse_factor(input: &str) -> IResult<&str, ParseNode> {
    let (input, first) = parse_unary(input)?;
    parse_implicit_mul_chain(input, first)
}

// Term - handles explicit * / %
fn parse_term(input: &str) -> IResult<&str, ParseNode> {
    let (input, init) = parse_factor(input)?;
    fold_left(
        input,
        init,
        pair(
            preceded(
                multispace0,
                alt((
                    map(tag("*"), |_| BinaryOp::Mul),
                    map(tag("/"), |_| BinaryOp::Div),
                    map(tag("%"), |_| BinaryOp::Rem),
                )),
            ),
            parse_factor,
        ),
    )
}

// Only applies when the next char is glued to the previous factor (no whitespace)
fn parse_implicit_mul_chain(mut input: &str, mut acc: ParseNode) -> IResult<&str, ParseNode> {
    let mut depth = acc.depth();
    loop {
        let glued = matches!(input.chars().next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '(');
        if !glued || !can_implicit_mul(&acc) || starts_with_keyword(input) {
            return Ok((input, acc));
        }
        let (rest, next) = match parse_power(input) {
            Ok(parsed) => parsed,
            Err(nom::Err::Failure(e)) => return Err(nom::Err::Failure(e)),
            Err(_) => return Ok((input, acc)),
        };
        depth = 1 + depth.max(next.depth());
        if depth > MAX_TREE_DEPTH {
            return too_long(input);
        }
        acc = ParseNode::binary(BinaryOp::Mul, acc, next);
        input = rest;
    }
}

fn starts_with_keyword(input: &str) -> bool {
    parse_identifier(input)
        .map(|(_, ident)| KEYWORDS.contains(&ident))
        .unwrap_or(false)
}

// Numbers (and products/powers ending in one) can be followed by implicit mul
fn can_implicit_mul(node: &ParseNode) -> bool {
    match node {
        ParseNode::Number(_) => true,
        ParseNode::Unary(UnaryOp::Neg, inner) => can_implicit_mul(inner),
        ParseNode::Binary(BinaryOp::Pow, _, exp) => matches!(**exp, ParseNode::Number(_)),
        ParseNode::Binary(BinaryOp::Mul, _, right) => can_implicit_mul(right),
        _ => false,
    }
}

fn parse_additive(input: &str) -> IResult<&str, ParseNode> {
    let (input, init) = parse_term(input)?;
    fold_left(
        input,
        init,
        pair(
            preceded(
                multispace0,
                alt((
                    map(tag("+"), |_| BinaryOp::Add),
                    map(tag("-"), |_| BinaryOp::Sub),
                )),
            ),
            parse_term,
        ),
    )
}

// Parser for relational operators.
// `<=>` belongs to the equivalence level, so `<=` must not eat its prefix.
fn parse_relop(input: &str) -> IResult<&str, BinaryOp> {
    let (input, _) = multispace0(input)?;
    if input.starts_with("<=>") {
        return fail(input, nom::error::ErrorKind::Tag);
    }
    alt((
        map(tag("<="), |_| BinaryOp::Le),
        map(tag(">="), |_| BinaryOp::Ge),
        map(tag("=="), |_| BinaryOp::Eq),
        map(tag("!="), |_| BinaryOp::Ne),
        map(tag("<"), |_| BinaryOp::Lt),
        map(tag(">"), |_| BinaryOp::Gt),
    ))(input)
}

// A single, non-associative comparison. `1 < x < 5` is left unconsumed:
// chains are expanded into conjunctions before text reaches this grammar.
fn parse_comparison(input: &str) -> IResult<&str, ParseNode> {
    let (input, lhs) = parse_additive(input)?;
    match parse_relop(input) {
        Ok((rest, op)) => {
            let (rest, rhs) = parse_additive(rest)?;
            Ok((rest, ParseNode::binary(op, lhs, rhs)))
        }
        Err(_) => Ok((input, lhs)),
    }
}

fn parse_not_op(input: &str) -> IResult<&str, &str> {
    let (input, _) = multispace0(input)?;
    if input.starts_with("!=") {
        return fail(input, nom::error::ErrorKind::Tag);
    }
    alt((keyword("not"), tag("!")))(input)
}

fn parse_not(input: &str) -> IResult<&str, ParseNode> {
    match parse_not_op(input) {
        Ok((rest, _)) => {
            let _level = NestingGuard::enter(rest)?;
            let (rest, e) = parse_not(rest)?;
            Ok((rest, ParseNode::Unary(UnaryOp::Not, Box::new(e))))
        }
        Err(nom::Err::Error(_)) => parse_comparison(input),
        Err(e) => Err(e),
    }
}

fn parse_and(input: &str) -> IResult<&str, ParseNode> {
    let (input, init) = parse_not(input)?;
    fold_left(
        input,
        init,
        map(
            preceded(
                preceded(multispace0, alt((keyword("and"), tag("&&")))),
                parse_not,
            ),
            |val| (BinaryOp::And, val),
        ),
    )
}

fn parse_or(input: &str) -> IResult<&str, ParseNode> {
    let (input, init) = parse_and(input)?;
    fold_left(
        input,
        init,
        map(
            preceded(
                preceded(multispace0, alt((keyword("or"), tag("||")))),
                parse_and,
            ),
            |val| (BinaryOp::Or, val),
        ),
    )
}

// Implication - right associative: a => b => c = a => (b => c)
fn parse_implies(input: &str) -> IResult<&str, ParseNode> {
    let (input, lhs) = parse_or(input)?;
    let arrow =
        preceded::<_, _, _, nom::error::Error<&str>, _, _>(multispace0, tag("=>"))(input);
    if let Ok((rest, _)) = arrow {
        let _level = NestingGuard::enter(rest)?;
        let (rest, rhs) = parse_implies(rest)?;
        Ok((rest, ParseNode::binary(BinaryOp::Implies, lhs, rhs)))
    } else {
        Ok((input, lhs))
    }
}

fn parse_iff(input: &str) -> IResult<&str, ParseNode> {
    let (input, init) = parse_implies(input)?;
    fold_left(
        input,
        init,
        map(
            preceded(preceded(multispace0, tag("<=>")), parse_implies),
            |val| (BinaryOp::Iff, val),
        ),
    )
}

fn snippet(rest: &str) -> String {
    let trimmed = rest.trim_start();
    if trimmed.is_empty() {
        return "end of input".to_string();
    }
    trimmed.chars().take(12).collect()
}

/// Parse a complete formula into an [`Expr`].
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let (remaining, node) = parse_iff(input).map_err(|e| match e {
        nom::Err::Failure(err) if err.code == ErrorKind::TooLarge => ParseError::TooDeep {
            limit: MAX_NESTING,
        },
        nom::Err::Failure(err) if err.code == ErrorKind::Count => ParseError::TooLong {
            limit: MAX_TREE_DEPTH,
        },
        nom::Err::Error(err) | nom::Err::Failure(err) => {
            let skipped = err.input.len() - err.input.trim_start().len();
            ParseError::Syntax {
                position: input.len() - err.input.len() + skipped,
                found: snippet(err.input),
            }
        }
        nom::Err::Incomplete(_) => ParseError::Syntax {
            position: input.len(),
            found: "end of input".to_string(),
        },
    })?;

    let remaining = remaining.trim();
    if !remaining.is_empty() {
        return Err(ParseError::UnconsumedInput(remaining.to_string()));
    }
    if node.depth() > MAX_TREE_DEPTH {
        return Err(ParseError::TooLong {
            limit: MAX_TREE_DEPTH,
        });
    }

    node.lower()
}
