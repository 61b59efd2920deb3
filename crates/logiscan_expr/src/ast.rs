use std::collections::BTreeSet;
use std::fmt;

use crate::builtin::BuiltinFn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "e",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,

    // Relational
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,

    // Logical
    And,
    Or,
    Implies,
    Iff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
    None,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "^",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Implies => "=>",
            BinaryOp::Iff => "<=>",
        }
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge | BinaryOp::Eq | BinaryOp::Ne
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(
            self,
            BinaryOp::And | BinaryOp::Or | BinaryOp::Implies | BinaryOp::Iff
        )
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Iff => 1,
            BinaryOp::Implies => 2,
            BinaryOp::Or => 3,
            BinaryOp::And => 4,
            // 5 is prefix `not`
            BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge
            | BinaryOp::Eq
            | BinaryOp::Ne => 6,
            BinaryOp::Add | BinaryOp::Sub => 7,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 8,
            // 9 is unary minus
            BinaryOp::Pow => 10,
        }
    }

    fn assoc(self) -> Assoc {
        match self {
            BinaryOp::Pow | BinaryOp::Implies => Assoc::Right,
            op if op.is_relational() => Assoc::None,
            _ => Assoc::Left,
        }
    }
}

const NOT_PRECEDENCE: u8 = 5;
const NEG_PRECEDENCE: u8 = 9;
const ATOM_PRECEDENCE: u8 = 11;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Bool(bool),
    Constant(Constant),
    Variable(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(BuiltinFn, Vec<Expr>),
}

impl Expr {
    // Helper constructors for cleaner code
    pub fn num(n: f64) -> Self {
        Expr::Number(n)
    }

    pub fn var(name: &str) -> Self {
        Expr::Variable(name.to_string())
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary(op, Box::new(operand))
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary(op, _, _) => op.precedence(),
            Expr::Unary(UnaryOp::Not, _) => NOT_PRECEDENCE,
            Expr::Unary(UnaryOp::Neg, _) => NEG_PRECEDENCE,
            Expr::Number(n) if *n < 0.0 => NEG_PRECEDENCE,
            _ => ATOM_PRECEDENCE,
        }
    }

    /// Names of all variables referenced anywhere in the tree.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Variable(name) => {
                out.insert(name.clone());
            }
            Expr::Unary(_, e) => e.collect_variables(out),
            Expr::Binary(_, l, r) => {
                l.collect_variables(out);
                r.collect_variables(out);
            }
            Expr::Call(_, args) => args.iter().for_each(|a| a.collect_variables(out)),
            Expr::Number(_) | Expr::Bool(_) | Expr::Constant(_) => {}
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, child: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({})", child)
    } else {
        write!(f, "{}", child)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Bool(b) => write!(f, "{}", b),
            Expr::Constant(c) => write!(f, "{}", c.name()),
            Expr::Variable(s) => write!(f, "{}", s),
            Expr::Unary(UnaryOp::Neg, e) => {
                write!(f, "-")?;
                write_operand(f, e, e.precedence() < NEG_PRECEDENCE)
            }
            Expr::Unary(UnaryOp::Not, e) => {
                write!(f, "not ")?;
                write_operand(f, e, e.precedence() < NOT_PRECEDENCE)
            }
            Expr::Binary(op, l, r) => {
                let my_prec = op.precedence();
                let (l_parens, r_parens) = match op.assoc() {
                    Assoc::Left => (l.precedence() < my_prec, r.precedence() <= my_prec),
                    Assoc::Right => (l.precedence() <= my_prec, r.precedence() < my_prec),
                    Assoc::None => (l.precedence() <= my_prec, r.precedence() <= my_prec),
                };
                write_operand(f, l, l_parens)?;
                if *op == BinaryOp::Pow {
                    write!(f, "^")?;
                } else {
                    write!(f, " {} ", op.symbol())?;
                }
                write_operand(f, r, r_parens)
            }
            Expr::Call(func, args) => {
                write!(f, "{}(", func.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_inserts_only_needed_parens() {
        let sum = Expr::binary(BinaryOp::Add, Expr::var("x"), Expr::num(1.0));
        let prod = Expr::binary(BinaryOp::Mul, sum, Expr::num(2.0));
        assert_eq!(prod.to_string(), "(x + 1) * 2");

        let cmp = Expr::binary(BinaryOp::Gt, Expr::var("x"), Expr::num(0.0));
        let not = Expr::unary(UnaryOp::Not, cmp.clone());
        assert_eq!(not.to_string(), "not x > 0");

        let both = Expr::binary(BinaryOp::And, cmp.clone(), cmp);
        assert_eq!(
            Expr::unary(UnaryOp::Not, both).to_string(),
            "not (x > 0 and x > 0)"
        );
    }

    #[test]
    fn test_display_power_is_right_associative() {
        let inner = Expr::binary(BinaryOp::Pow, Expr::num(3.0), Expr::num(4.0));
        let right = Expr::binary(BinaryOp::Pow, Expr::num(2.0), inner.clone());
        assert_eq!(right.to_string(), "2^3^4");

        let left = Expr::binary(BinaryOp::Pow, inner, Expr::num(2.0));
        assert_eq!(left.to_string(), "(3^4)^2");
    }

    #[test]
    fn test_collect_variables() {
        let e = Expr::binary(
            BinaryOp::Lt,
            Expr::Call(BuiltinFn::Sin, vec![Expr::var("x")]),
            Expr::binary(BinaryOp::Add, Expr::var("y"), Expr::Constant(Constant::Pi)),
        );
        let vars: Vec<_> = e.variables().into_iter().collect();
        assert_eq!(vars, vec!["x".to_string(), "y".to_string()]);
    }
}
