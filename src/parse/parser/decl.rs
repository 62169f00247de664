use crate::{
    ast::{
        token::{Category, TokenType},
        NodeId, NodeKind,
    },
    errors::DiagnosticKind,
};

use super::{ParseResult, Parser, Precedence};

impl Parser {
    /// `(import | function)*` up to the end of the input. Each top-level
    /// construct is a synchronization point.
    pub fn parse_compilation_unit(&mut self) -> ParseResult<NodeId> {
        let table = self.open_scope();
        let mut imports = vec![];
        let mut declarations = vec![];

        while !self.tokens.is_at_end() {
            let item = self.with_synchronization(
                Category::TOP_LEVEL_START,
                |_| None,
                |p| p.parse_top_level().map(Some),
            );
            let item = match item {
                Ok(item) => item,
                Err(err) => {
                    self.close_scope();
                    return Err(err);
                }
            };

            match item {
                Some(id) if matches!(self.ast.kind(id), NodeKind::Import { .. }) => {
                    imports.push(id)
                }
                Some(id) => declarations.push(id),
                None => (),
            }
        }
        self.close_scope();

        let span = match (imports.first(), declarations.first()) {
            (Some(first), _) | (None, Some(first)) => {
                let start = self.span_of(*first);
                self.span_from(start)
            }
            (None, None) => self.tokens.peek().span,
        };
        let unit = self.make(
            NodeKind::CompilationUnit {
                imports,
                declarations,
                table,
            },
            span,
        );
        self.report_redefinitions();
        Ok(unit)
    }

    fn parse_top_level(&mut self) -> ParseResult<NodeId> {
        match self.tokens.peek().ty {
            TokenType::Import => self.parse_import(),
            TokenType::Fun | TokenType::Infix => self.parse_function(),
            _ => Err(self.unexpected("`import` or `fun`")),
        }
    }

    /// `'infix'? 'fun' name '(' arguments ')' (':' type)? (block | '=' expression ';')`
    pub(super) fn parse_function(&mut self) -> ParseResult<NodeId> {
        let start = self.tokens.peek().span;
        let infix = expect_if!(self, TokenType::Infix);
        self.consume(TokenType::Fun)?;
        let name = self.name()?;

        let table = self.open_scope();
        let result = self.parse_function_rest();
        self.close_scope();
        let (arguments, return_type, body) = result?;

        if infix && arguments.len() != 2 {
            let err = self.error(
                DiagnosticKind::Semantic,
                name.span,
                format!(
                    "infix function `{}` must declare exactly two arguments",
                    name.text
                ),
            );
            self.record_error(err);
        }

        let span = self.span_from(start);
        let function = self.make(
            NodeKind::FunctionDeclaration {
                name: name.text,
                infix,
                arguments,
                return_type,
                body: Some(body),
                table,
            },
            span,
        );
        self.report_redefinitions();
        Ok(function)
    }

    fn parse_function_rest(&mut self) -> ParseResult<(Vec<NodeId>, Option<String>, NodeId)> {
        self.consume(TokenType::LeftParen)?;
        let mut arguments = vec![];
        while !self.check(TokenType::RightParen) {
            arguments.push(self.parse_argument()?);
            if !expect_if!(self, TokenType::Comma) {
                break;
            }
        }
        self.consume(TokenType::RightParen)?;

        let return_type = if expect_if!(self, TokenType::Colon) {
            Some(self.type_name()?)
        } else {
            None
        };

        let body = match self.tokens.peek().ty {
            TokenType::LeftBrace => {
                let brace = self.tokens.advance();
                self.parse_block(brace)?
            }
            TokenType::Assign => {
                self.tokens.advance();
                let body = self.parse_expression(Precedence::Lowest)?;
                self.consume_terminator()?;
                body
            }
            _ => return Err(self.unexpected("`{` or `=`")),
        };
        Ok((arguments, return_type, body))
    }

    /// A name with an optional type and default value, or else a pattern the
    /// caller's argument is matched against.
    fn parse_argument(&mut self) -> ParseResult<NodeId> {
        let named = self.check(Category::IDENTIFIER_LIKE)
            && matches!(
                self.tokens.look_ahead(1).ty,
                TokenType::Colon | TokenType::Assign | TokenType::Comma | TokenType::RightParen
            );
        if !named {
            let pattern = self.parse_expression(Precedence::Lowest)?;
            let span = self.span_of(pattern);
            return Ok(self.make(
                NodeKind::PatternArgument {
                    pattern: Some(pattern),
                },
                span,
            ));
        }

        let name = self.name()?;
        let ty = if expect_if!(self, TokenType::Colon) {
            Some(self.type_name()?)
        } else {
            None
        };
        let kind = if expect_if!(self, TokenType::Assign) {
            let default = self.parse_expression(Precedence::Assignment)?;
            NodeKind::DefaultArgument {
                name: name.text,
                ty,
                default: Some(default),
            }
        } else {
            NodeKind::BasicArgument { name: name.text, ty }
        };

        let span = self.span_from(name.span);
        Ok(self.make(kind, span))
    }
}
