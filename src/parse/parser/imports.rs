use crate::{
    ast::{token::TokenType, Literal, NodeId, NodeKind},
    errors::DiagnosticKind,
};

use super::{ParseResult, Parser};

impl Parser {
    /// `'import' string ('{' entry (',' entry)* ','? '}')? ';'?`
    pub(super) fn parse_import(&mut self) -> ParseResult<NodeId> {
        let start = self.consume(TokenType::Import)?.span;
        let quote = self.consume(TokenType::StringStart)?;
        let path_node = self.parse_string(quote)?;
        let path = match self.ast.kind(path_node) {
            NodeKind::Literal(Literal::String(path)) => path.clone(),
            _ => {
                return Err(self.error(
                    DiagnosticKind::Syntax,
                    self.span_of(path_node),
                    "import path cannot contain interpolation",
                ))
            }
        };

        let mut entries = vec![];
        if let Some(open) = self.match_next(TokenType::LeftBrace) {
            while !self.check(TokenType::RightBrace) {
                entries.push(self.parse_import_entry()?);
                if !expect_if!(self, TokenType::Comma) {
                    break;
                }
            }
            let close = self.consume(TokenType::RightBrace)?;
            if entries.is_empty() {
                self.warn(open.span.extend_to(&close.span), "empty import list");
            }
        }
        expect_if!(self, TokenType::Semicolon);

        let span = self.span_from(start);
        Ok(self.make(NodeKind::Import { path, entries }, span))
    }

    /// `name ('as' alias)?`
    fn parse_import_entry(&mut self) -> ParseResult<NodeId> {
        let name = self.name()?;
        let alias = if expect_if!(self, TokenType::As) {
            let alias = self.name()?;
            if alias.text == name.text {
                self.warn(
                    name.span.extend_to(&alias.span),
                    format!("redundant alias: `{}` is already called `{}`", name.text, alias.text),
                );
            }
            Some(alias.text)
        } else {
            None
        };

        let span = self.span_from(name.span);
        Ok(self.make(
            NodeKind::ImportEntry {
                name: name.text,
                alias,
            },
            span,
        ))
    }
}
