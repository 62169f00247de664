use crate::{
    ast::{
        decode_escape,
        token::{Category, Token, TokenType},
        Literal, NodeId, NodeKind, UnaryOperator,
    },
    errors::DiagnosticKind,
    span::Span,
};

use super::{ParseResult, Parser, Precedence};

/// Text collected between the interpolations of a string.
struct Chunk {
    text: String,
    span: Option<Span>,
}

impl Chunk {
    fn new() -> Chunk {
        Chunk {
            text: String::new(),
            span: None,
        }
    }

    fn push(&mut self, text: &str, span: Span) {
        self.text.push_str(text);
        self.extend(span);
    }

    fn push_char(&mut self, ch: char, span: Span) {
        self.text.push(ch);
        self.extend(span);
    }

    fn extend(&mut self, span: Span) {
        self.span = Some(match self.span {
            Some(start) => start.extend_to(&span),
            None => span,
        });
    }
}

impl Parser {
    pub(super) fn parse_literal(&mut self, token: Token) -> ParseResult<NodeId> {
        let literal = match token.ty {
            TokenType::True => Literal::Boolean(true),
            TokenType::False => Literal::Boolean(false),
            ty => match Literal::from_token(ty, &token.text) {
                Ok(literal) => literal,
                Err(msg) => return Err(self.error(DiagnosticKind::Syntax, token.span, msg)),
            },
        };
        Ok(self.make(NodeKind::Literal(literal), token.span))
    }

    pub(super) fn parse_reference(&mut self, token: Token) -> ParseResult<NodeId> {
        Ok(self.make(NodeKind::Reference { name: token.text }, token.span))
    }

    /// `( expression )`. The parentheses leave no node behind.
    pub(super) fn parse_grouping(&mut self, _: Token) -> ParseResult<NodeId> {
        let inner = self.parse_expression(Precedence::Lowest)?;
        self.consume(TokenType::RightParen)?;
        Ok(inner)
    }

    pub(super) fn parse_unary(&mut self, op: Token) -> ParseResult<NodeId> {
        let operator = match UnaryOperator::from_token(op.ty) {
            Some(operator) => operator,
            None => unreachable!("{:?} registered as a unary operator", op.ty),
        };

        if operator == UnaryOperator::Negate && self.negative_number_follows() {
            let number = self.tokens.advance();
            let text = format!("-{}", number.text);
            let span = op.span.extend_to(&number.span);
            return match Literal::from_token(number.ty, &text) {
                Ok(literal) => Ok(self.make(NodeKind::Literal(literal), span)),
                Err(msg) => Err(self.error(DiagnosticKind::Syntax, span, msg)),
            };
        }

        let operand = self.parse_expression(Precedence::Prefix)?;
        let span = op.span.extend_to(&self.span_of(operand));
        Ok(self.make(
            NodeKind::UnaryOperation {
                operator,
                operand: Some(operand),
            },
            span,
        ))
    }

    /// A number right after `-` becomes a negative literal, unless a postfix
    /// operator binds it first as in `-1.abs()`.
    fn negative_number_follows(&mut self) -> bool {
        let number = matches!(
            self.tokens.peek().ty,
            TokenType::IntLiteral
                | TokenType::LongLiteral
                | TokenType::FloatLiteral
                | TokenType::DoubleLiteral
        );
        number && !matches!(self.tokens.look_ahead(1).ty, TokenType::Dot | TokenType::LeftParen)
    }

    /// A string literal, or a template if it interpolates anything.
    ///
    /// Each `\{ ... }` placeholder is a synchronization point of its own, so a
    /// broken placeholder costs only that placeholder.
    pub(super) fn parse_string(&mut self, start: Token) -> ParseResult<NodeId> {
        let mut parts = vec![];
        let mut chunk = Chunk::new();
        let mut interpolated = false;

        loop {
            let tok = self.tokens.advance();
            match tok.ty {
                TokenType::StringContent => chunk.push(&tok.text, tok.span),
                TokenType::StringEscape => match decode_escape(&tok.text) {
                    Some(ch) => chunk.push_char(ch, tok.span),
                    None => {
                        let err = self.error(
                            DiagnosticKind::Syntax,
                            tok.span,
                            format!("invalid escape sequence `{}`", tok.text),
                        );
                        self.record_error(err);
                    }
                },
                TokenType::TemplateStart => {
                    interpolated = true;
                    self.flush(&mut chunk, &mut parts);
                    let part = self.with_synchronization(
                        Category::STRING_SYNC,
                        |_| None,
                        |p| p.parse_expression(Precedence::Lowest).map(Some),
                    )?;
                    parts.extend(part);
                    if self.match_next(TokenType::TemplateEnd).is_none()
                        && !self.check(TokenType::StringEnd)
                    {
                        return Err(self.unexpected("`}`"));
                    }
                }
                TokenType::StringEnd => break,
                TokenType::UnexpectedCharacter => {
                    let msg = tok
                        .ty
                        .unexpected_message(&tok.text)
                        .unwrap_or_else(|| str!("unexpected character"));
                    let err = self.error(DiagnosticKind::Syntax, tok.span, msg);
                    self.record_error(err);
                }
                _ => {
                    self.tokens.unconsume();
                    return Err(self.error(
                        DiagnosticKind::Syntax,
                        start.span,
                        "unterminated string literal",
                    ));
                }
            }
        }

        let span = self.span_from(start.span);
        if interpolated {
            self.flush(&mut chunk, &mut parts);
            Ok(self.make(NodeKind::StringTemplate { parts }, span))
        } else {
            Ok(self.make(NodeKind::Literal(Literal::String(chunk.text)), span))
        }
    }

    fn flush(&mut self, chunk: &mut Chunk, parts: &mut Vec<NodeId>) {
        let chunk = std::mem::replace(chunk, Chunk::new());
        if let Some(span) = chunk.span {
            parts.push(self.make(NodeKind::Literal(Literal::String(chunk.text)), span));
        }
    }
}
