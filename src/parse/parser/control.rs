use crate::ast::{
    token::{Category, Token, TokenType},
    NodeId, NodeKind,
};

use super::{ParseResult, Parser, Precedence};

impl Parser {
    /// `if (condition) expression (else expression)?`
    pub(super) fn parse_conditional(&mut self, start: Token) -> ParseResult<NodeId> {
        self.consume(TokenType::LeftParen)?;
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.consume(TokenType::RightParen)?;
        let then_branch = self.parse_expression(Precedence::Lowest)?;
        let else_branch = if expect_if!(self, TokenType::Else) {
            Some(self.parse_expression(Precedence::Lowest)?)
        } else {
            None
        };

        let span = self.span_from(start.span);
        Ok(self.make(
            NodeKind::Conditional {
                condition: Some(condition),
                then_branch: Some(then_branch),
                else_branch,
            },
            span,
        ))
    }

    /// `{ statement* }` with its own scope. Every statement is a
    /// synchronization point.
    pub(super) fn parse_block(&mut self, start: Token) -> ParseResult<NodeId> {
        let table = self.open_scope();
        let statements = self.parse_block_statements();
        self.close_scope();
        let statements = statements?;
        self.consume(TokenType::RightBrace)?;

        let span = self.span_from(start.span);
        let block = self.make(NodeKind::Block { statements, table }, span);
        self.report_redefinitions();
        Ok(block)
    }

    fn parse_block_statements(&mut self) -> ParseResult<Vec<NodeId>> {
        let mut statements = vec![];
        while !peek!(self, TokenType::RightBrace | TokenType::EndOfFile) {
            let stmt = self.with_synchronization(
                (Category::BLOCK_START, TokenType::RightBrace),
                |_| None,
                |p| p.parse_statement().map(Some),
            )?;
            statements.extend(stmt);
        }
        Ok(statements)
    }

    pub fn parse_statement(&mut self) -> ParseResult<NodeId> {
        let start = self.tokens.peek().span;
        let kind = match self.tokens.peek().ty {
            TokenType::Val | TokenType::Var => self.parse_local_variable()?,
            TokenType::Return => {
                self.tokens.advance();
                let value = if peek!(
                    self,
                    TokenType::Semicolon | TokenType::RightBrace | TokenType::EndOfFile
                ) {
                    None
                } else {
                    Some(self.parse_expression(Precedence::Lowest)?)
                };
                NodeKind::Return { value }
            }
            _ => NodeKind::ExpressionStatement {
                expression: Some(self.parse_expression(Precedence::Lowest)?),
            },
        };
        self.consume_terminator()?;

        let span = self.span_from(start);
        Ok(self.make(kind, span))
    }

    /// `('val' | 'var') name (':' type)? ('=' expression)?`
    fn parse_local_variable(&mut self) -> ParseResult<NodeKind> {
        let mutable = self.tokens.advance().ty == TokenType::Var;
        let name = self.name()?.text;
        let ty = if expect_if!(self, TokenType::Colon) {
            Some(self.type_name()?)
        } else {
            None
        };
        let initializer = if expect_if!(self, TokenType::Assign) {
            Some(self.parse_expression(Precedence::Lowest)?)
        } else {
            None
        };

        Ok(NodeKind::LocalVariable {
            name,
            mutable,
            ty,
            initializer,
        })
    }

    /// `;`, which may be left out after a `}`, before a `}` and at the end of
    /// the input.
    pub(super) fn consume_terminator(&mut self) -> ParseResult<()> {
        if expect_if!(self, TokenType::Semicolon) {
            return Ok(());
        }

        let after_brace = self.tokens.has_previous()
            && self.tokens.previous().ty == TokenType::RightBrace;
        if after_brace || peek!(self, TokenType::RightBrace | TokenType::EndOfFile) {
            Ok(())
        } else {
            self.consume(TokenType::Semicolon).map(|_| ())
        }
    }
}
