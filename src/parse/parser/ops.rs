use fnv::FnvHashMap;

use crate::ast::{
    token::{Category, Token, TokenType},
    AssignmentOperator, BinaryOperator, NodeId, NodeKind,
};

use super::{ParseResult, Parser};

/// Binding strength of infix rules, weakest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Lowest,
    Assignment,
    Disjunction,
    Conjunction,
    Equality,
    Comparison,
    InfixCall,
    Additive,
    Multiplicative,
    Prefix,
    Postfix,
}

type PrefixRule = fn(&mut Parser, Token) -> ParseResult<NodeId>;
type InfixRule = fn(&mut Parser, NodeId, Token) -> ParseResult<NodeId>;

struct ParseRules {
    prefix: FnvHashMap<TokenType, PrefixRule>,
    infix: FnvHashMap<TokenType, (InfixRule, Precedence)>,
}

lazy_static! {
    static ref RULES: ParseRules = {
        use TokenType::*;

        let mut prefix = FnvHashMap::<TokenType, PrefixRule>::default();
        for ty in [
            IntLiteral,
            LongLiteral,
            FloatLiteral,
            DoubleLiteral,
            SymbolLiteral,
            True,
            False,
        ] {
            prefix.insert(ty, Parser::parse_literal);
        }
        for ty in [Identifier, As, Infix] {
            prefix.insert(ty, Parser::parse_reference);
        }
        prefix.insert(StringStart, Parser::parse_string);
        prefix.insert(LeftParen, Parser::parse_grouping);
        prefix.insert(Minus, Parser::parse_unary);
        prefix.insert(Not, Parser::parse_unary);
        prefix.insert(If, Parser::parse_conditional);
        prefix.insert(LeftBrace, Parser::parse_block);

        let mut infix = FnvHashMap::<TokenType, (InfixRule, Precedence)>::default();
        let binary: InfixRule = Parser::parse_binary;
        let levels = [
            (Or, Precedence::Disjunction),
            (And, Precedence::Conjunction),
            (Equal, Precedence::Equality),
            (NotEqual, Precedence::Equality),
            (Less, Precedence::Comparison),
            (LessEqual, Precedence::Comparison),
            (Greater, Precedence::Comparison),
            (GreaterEqual, Precedence::Comparison),
            (Plus, Precedence::Additive),
            (Minus, Precedence::Additive),
            (Times, Precedence::Multiplicative),
            (Divide, Precedence::Multiplicative),
            (Remainder, Precedence::Multiplicative),
        ];
        for (ty, prec) in levels {
            infix.insert(ty, (binary, prec));
        }
        for ty in [
            Assign,
            PlusAssign,
            MinusAssign,
            TimesAssign,
            DivideAssign,
            RemainderAssign,
        ] {
            infix.insert(ty, (Parser::parse_assignment as InfixRule, Precedence::Assignment));
        }
        infix.insert(
            Identifier,
            (Parser::parse_infix_invocation as InfixRule, Precedence::InfixCall),
        );
        infix.insert(Dot, (Parser::parse_member_access as InfixRule, Precedence::Postfix));
        infix.insert(LeftParen, (Parser::parse_invocation as InfixRule, Precedence::Postfix));

        ParseRules { prefix, infix }
    };
}

impl Parser {
    /// Parses an expression made of every infix rule binding tighter than
    /// `min`. Fails without consuming anything if the next token cannot start
    /// an expression.
    pub fn parse_expression(&mut self, min: Precedence) -> ParseResult<NodeId> {
        let token = self.tokens.advance();
        let prefix = match RULES.prefix.get(&token.ty) {
            Some(rule) => *rule,
            None => {
                self.tokens.unconsume();
                return Err(self.unexpected("expression"));
            }
        };

        let mut left = prefix(self, token)?;
        loop {
            let ty = self.tokens.peek().ty;
            let rule = match RULES.infix.get(&ty) {
                Some(&(rule, prec)) if prec > min => rule,
                _ => break,
            };
            let token = self.tokens.advance();
            left = rule(self, left, token)?;
        }
        Ok(left)
    }

    fn parse_binary(&mut self, left: NodeId, op: Token) -> ParseResult<NodeId> {
        let (operator, prec) = match (BinaryOperator::from_token(op.ty), RULES.infix.get(&op.ty)) {
            (Some(operator), Some(&(_, prec))) => (operator, prec),
            _ => unreachable!("{:?} registered as a binary operator", op.ty),
        };

        let right = self.parse_expression(prec)?;
        let span = self.span_of(left).extend_to(&self.span_of(right));
        Ok(self.make(
            NodeKind::BinaryOperation {
                left: Some(left),
                operator,
                right: Some(right),
            },
            span,
        ))
    }

    /// Right associative: the value may itself be an assignment.
    fn parse_assignment(&mut self, target: NodeId, op: Token) -> ParseResult<NodeId> {
        let operator = match AssignmentOperator::from_token(op.ty) {
            Some(operator) => operator,
            None => unreachable!("{:?} registered as an assignment", op.ty),
        };

        let value = self.parse_expression(Precedence::Lowest)?;
        let span = self.span_of(target).extend_to(&self.span_of(value));
        Ok(self.make(
            NodeKind::Assignment {
                target: Some(target),
                operator,
                value: Some(value),
            },
            span,
        ))
    }

    /// `left name right`
    fn parse_infix_invocation(&mut self, left: NodeId, name: Token) -> ParseResult<NodeId> {
        let right = self.parse_expression(Precedence::InfixCall)?;
        let span = self.span_of(left).extend_to(&self.span_of(right));
        Ok(self.make(
            NodeKind::InfixInvocation {
                left: Some(left),
                name: name.text,
                right: Some(right),
            },
            span,
        ))
    }

    fn parse_member_access(&mut self, receiver: NodeId, _: Token) -> ParseResult<NodeId> {
        let member = self.consume(Category::IDENTIFIER_LIKE)?;
        let span = self.span_of(receiver).extend_to(&member.span);
        Ok(self.make(
            NodeKind::MemberAccess {
                receiver: Some(receiver),
                member: member.text,
            },
            span,
        ))
    }

    /// `target(args)`. Calls through a plain name become named invocations,
    /// anything else is invoked as a value.
    fn parse_invocation(&mut self, target: NodeId, _: Token) -> ParseResult<NodeId> {
        let mut arguments = vec![];
        while !self.check(TokenType::RightParen) {
            arguments.push(self.parse_expression(Precedence::Lowest)?);
            if self.match_next(TokenType::Comma).is_none() {
                break;
            }
        }
        self.consume(TokenType::RightParen)?;

        let span = self.span_from(self.span_of(target));
        let kind = match self.ast.kind(target) {
            NodeKind::Reference { name } => NodeKind::NamedInvocation {
                name: name.clone(),
                arguments,
            },
            _ => NodeKind::AnonymousInvocation {
                target: Some(target),
                arguments,
            },
        };
        Ok(self.make(kind, span))
    }
}

#[cfg(test)]
mod precedence_tests {
    use super::{Precedence, RULES};
    use crate::ast::token::TokenType;

    #[test]
    fn levels_are_ordered_weakest_first() {
        assert!(Precedence::Lowest < Precedence::Assignment);
        assert!(Precedence::Assignment < Precedence::Disjunction);
        assert!(Precedence::InfixCall < Precedence::Additive);
        assert!(Precedence::Multiplicative < Precedence::Prefix);
        assert!(Precedence::Prefix < Precedence::Postfix);
    }

    #[test]
    fn every_binary_operator_has_an_infix_rule() {
        for ty in [
            TokenType::Plus,
            TokenType::Minus,
            TokenType::Times,
            TokenType::Divide,
            TokenType::Remainder,
            TokenType::Equal,
            TokenType::NotEqual,
            TokenType::Less,
            TokenType::LessEqual,
            TokenType::Greater,
            TokenType::GreaterEqual,
            TokenType::And,
            TokenType::Or,
        ] {
            assert!(RULES.infix.contains_key(&ty), "{:?}", ty);
        }
        assert!(!RULES.infix.contains_key(&TokenType::Not));
        assert!(RULES.prefix.contains_key(&TokenType::Not));
    }
}
