mod utils;

use proptest::prelude::*;

use sprig::{
    ast::{token::TokenType, Ast, BinaryOperator, Literal, NodeId, NodeKind},
    parse::lexer::{fixed_tokens, tokenize, Lexer, REFERENCE},
};

const MAX_STEPS: usize = 4096;

fn name() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,6}".prop_filter("keywords are not names", |s| {
        TokenType::keyword(s).is_none()
    })
}

fn significant_piece() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(fixed_tokens()).prop_map(|(text, _)| text.to_string()),
        name(),
        (0u32..100_000).prop_map(|n| n.to_string()),
    ]
}

fn whitespace() -> impl Strategy<Value = String> {
    "[ \t\n]{1,3}"
}

proptest! {
    #[test]
    fn whitespace_separated_tokens_reconstruct_the_input(
        pieces in prop::collection::vec((significant_piece(), whitespace()), 0..24)
    ) {
        let src = pieces.iter().map(|(p, ws)| format!("{}{}", p, ws)).collect::<String>();
        let expected = pieces.iter().map(|(p, _)| p.as_str()).collect::<String>();
        let tokens = tokenize(&src);
        let text = tokens.iter().map(|t| t.text.as_str()).collect::<String>();
        prop_assert_eq!(text, expected);
        prop_assert_eq!(tokens.len(), pieces.len());
    }

    #[test]
    fn lexer_never_stalls(chars in prop::collection::vec(any::<char>(), 0..200)) {
        let input = chars.into_iter().collect::<String>();
        let mut lexer = Lexer::new(&input, &REFERENCE);
        let mut tokens = vec![];
        let mut finished = false;
        for _ in 0..MAX_STEPS {
            match lexer.advance() {
                Some(tok) => tokens.push(tok),
                None => {
                    finished = true;
                    break;
                }
            }
        }
        prop_assert!(finished, "lexer did not finish within {} steps", MAX_STEPS);

        for tok in tokens.iter() {
            prop_assert!(!tok.span.is_empty(), "zero-width {:?}", tok);
        }
        for pair in tokens.windows(2) {
            prop_assert!(
                pair[0].span.end <= pair[1].span.start,
                "{:?} overlaps {:?}",
                pair[0],
                pair[1]
            );
            prop_assert!(pair[0].span.range().end <= pair[1].span.range().start);
        }
    }
}

/// Expression shapes the renderer can print and the parser can read back.
#[derive(Clone, Debug)]
enum Expr {
    Lit(Literal),
    Ref(String),
    Binary(Box<Expr>, BinaryOperator, Box<Expr>),
    Member(Box<Expr>, String),
    Cond(Box<Expr>, Box<Expr>, Option<Box<Expr>>),
}

fn literal() -> impl Strategy<Value = Literal> {
    prop_oneof![
        (-1_000_000i32..1_000_000).prop_map(Literal::Int),
        (-10_000_000_000i64..10_000_000_000).prop_map(Literal::Long),
        (-4000i32..4000).prop_map(|n| Literal::Double(n as f64 / 4.0)),
        any::<bool>().prop_map(Literal::Boolean),
        "[a-z ]{0,5}".prop_map(Literal::String),
        name().prop_map(Literal::Symbol),
    ]
}

fn operator() -> impl Strategy<Value = BinaryOperator> {
    prop::sample::select(vec![
        BinaryOperator::Plus,
        BinaryOperator::Minus,
        BinaryOperator::Times,
        BinaryOperator::Divide,
        BinaryOperator::Remainder,
        BinaryOperator::Equal,
        BinaryOperator::NotEqual,
        BinaryOperator::Less,
        BinaryOperator::LessEqual,
        BinaryOperator::Greater,
        BinaryOperator::GreaterEqual,
        BinaryOperator::And,
        BinaryOperator::Or,
    ])
}

fn expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![literal().prop_map(Expr::Lit), name().prop_map(Expr::Ref)];
    leaf.prop_recursive(5, 48, 2, |inner| {
        prop_oneof![
            (inner.clone(), operator(), inner.clone())
                .prop_map(|(l, op, r)| Expr::Binary(Box::new(l), op, Box::new(r))),
            (inner.clone(), name()).prop_map(|(e, m)| Expr::Member(Box::new(e), m)),
            (inner.clone(), inner.clone(), prop::option::of(inner)).prop_map(|(c, t, e)| {
                Expr::Cond(Box::new(c), Box::new(t), e.map(Box::new))
            }),
        ]
    })
}

fn build(ast: &mut Ast, expr: &Expr) -> NodeId {
    let kind = match expr {
        Expr::Lit(lit) => NodeKind::Literal(lit.clone()),
        Expr::Ref(name) => NodeKind::Reference { name: name.clone() },
        Expr::Binary(l, operator, r) => NodeKind::BinaryOperation {
            left: Some(build(ast, l)),
            operator: *operator,
            right: Some(build(ast, r)),
        },
        Expr::Member(receiver, member) => NodeKind::MemberAccess {
            receiver: Some(build(ast, receiver)),
            member: member.clone(),
        },
        Expr::Cond(condition, then_branch, else_branch) => NodeKind::Conditional {
            condition: Some(build(ast, condition)),
            then_branch: Some(build(ast, then_branch)),
            else_branch: else_branch.as_ref().map(|e| build(ast, e)),
        },
    };
    ast.alloc(kind)
}

proptest! {
    #[test]
    fn rendered_expressions_parse_back(e in expr()) {
        let mut ast = Ast::new();
        let root = build(&mut ast, &e);
        let text = ast.render(root);

        let (parsed, parsed_root) = match utils::expression(&text) {
            Ok(parsed) => parsed,
            Err(errs) => return Err(TestCaseError::fail(format!("`{}`: {}", text, errs))),
        };
        prop_assert!(
            ast.equivalent(root, &parsed, parsed_root),
            "`{}` parsed as `{}`",
            text,
            parsed.render(parsed_root)
        );
        prop_assert!(parsed.parent_mismatches(parsed_root).is_empty());
    }
}
