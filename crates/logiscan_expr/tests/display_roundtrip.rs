//! The printer must emit text that parses back into the same tree, since the
//! normalized formula shown to users is re-parsed downstream.

use logiscan_expr::{parse, BinaryOp, BuiltinFn, Constant, Expr, UnaryOp};
use proptest::prelude::*;

fn arb_arith() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        (0u8..10).prop_map(|n| Expr::num(f64::from(n))),
        "[a-dx-z]".prop_map(|s| Expr::var(&s)),
        Just(Expr::Constant(Constant::Pi)),
    ];

    leaf.prop_recursive(4, 32, 2, |inner| {
        let arith_op = prop_oneof![
            Just(BinaryOp::Add),
            Just(BinaryOp::Sub),
            Just(BinaryOp::Mul),
            Just(BinaryOp::Div),
            Just(BinaryOp::Rem),
            Just(BinaryOp::Pow),
        ];
        prop_oneof![
            (arith_op, inner.clone(), inner.clone()).prop_map(|(op, l, r)| Expr::binary(op, l, r)),
            inner.clone().prop_map(|e| Expr::unary(UnaryOp::Neg, e)),
            inner.clone().prop_map(|e| Expr::Call(BuiltinFn::Sin, vec![e])),
            (inner.clone(), inner).prop_map(|(a, b)| Expr::Call(BuiltinFn::Max, vec![a, b])),
        ]
    })
}

fn arb_predicate() -> impl Strategy<Value = Expr> {
    let relop = prop_oneof![
        Just(BinaryOp::Lt),
        Just(BinaryOp::Le),
        Just(BinaryOp::Gt),
        Just(BinaryOp::Ge),
        Just(BinaryOp::Eq),
        Just(BinaryOp::Ne),
    ];
    let comparison =
        (relop, arb_arith(), arb_arith()).prop_map(|(op, l, r)| Expr::binary(op, l, r));

    comparison.prop_recursive(3, 16, 2, |inner| {
        let logic_op = prop_oneof![
            Just(BinaryOp::And),
            Just(BinaryOp::Or),
            Just(BinaryOp::Implies),
            Just(BinaryOp::Iff),
        ];
        prop_oneof![
            (logic_op, inner.clone(), inner.clone()).prop_map(|(op, l, r)| Expr::binary(op, l, r)),
            inner.prop_map(|e| Expr::unary(UnaryOp::Not, e)),
        ]
    })
}

proptest! {
    #[test]
    fn arithmetic_display_reparses(expr in arb_arith()) {
        let text = expr.to_string();
        let reparsed = parse(&text);
        prop_assert_eq!(reparsed, Ok(expr), "text: {}", text);
    }

    #[test]
    fn predicate_display_reparses(expr in arb_predicate()) {
        let text = expr.to_string();
        let reparsed = parse(&text);
        prop_assert_eq!(reparsed, Ok(expr), "text: {}", text);
    }
}

#[test]
fn whitespace_is_insignificant_between_tokens() {
    // A keyword glued to a number is not read as implicit multiplication
    let tight = parse("x>=1and x<=2").unwrap();

    let spaced = parse("  x >= 1   and   x <= 2 ").unwrap();
    let normal = parse("x >= 1 and x <= 2").unwrap();
    assert_eq!(spaced, normal);
    assert_eq!(tight, normal);
}
