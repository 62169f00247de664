#[macro_use]
mod macros;

mod atoms;
mod control;
mod decl;
mod imports;
mod ops;
mod recover;

pub use ops::Precedence;
pub use recover::Recover;

use crate::{
    ast::{
        token::{Category, Token, TokenStream, TokenType},
        Ast, NodeId, NodeKind,
    },
    errors::{Diagnostic, DiagnosticKind, Diagnostics},
    parse::lexer::{Lexer, REFERENCE},
    span::{Position, Span},
    sym::TableId,
};

use itertools::Itertools;

use super::{ParseOptions, Parsed};

pub type ParseResult<T> = Result<T, Diagnostic>;

/// Something the parser can ask the next token to be.
pub trait Expected {
    fn matches(&self, ty: TokenType) -> bool;

    /// How the expectation reads in "expected ..., but found ..." messages.
    fn describe(&self) -> String;
}

impl Expected for TokenType {
    fn matches(&self, ty: TokenType) -> bool {
        *self == ty
    }

    fn describe(&self) -> String {
        self.desc().to_string()
    }
}

impl Expected for Category {
    fn matches(&self, ty: TokenType) -> bool {
        ty.is(*self)
    }

    fn describe(&self) -> String {
        self.desc()
    }
}

impl<const N: usize> Expected for [TokenType; N] {
    fn matches(&self, ty: TokenType) -> bool {
        self.contains(&ty)
    }

    fn describe(&self) -> String {
        self.iter().map(|t| t.desc()).join(" or ")
    }
}

impl<A: Expected, B: Expected> Expected for (A, B) {
    fn matches(&self, ty: TokenType) -> bool {
        self.0.matches(ty) || self.1.matches(ty)
    }

    fn describe(&self) -> String {
        format!("{} or {}", self.0.describe(), self.1.describe())
    }
}

/// Recursive descent parser over the reference grammar.
///
/// Syntax errors travel as `Err(Diagnostic)` up to the nearest
/// synchronization point, where they are recorded and the parser skips ahead.
/// Everything recorded ends up in the [`Diagnostics`] handed back by
/// [`Parser::finish`].
pub struct Parser {
    tokens: TokenStream<'static>,
    ast: Ast,
    diagnostics: Diagnostics,
    scopes: Vec<TableId>,
    options: ParseOptions,
}

impl Parser {
    pub fn new(src: &str, source: impl Into<String>, options: ParseOptions) -> Parser {
        Parser {
            tokens: TokenStream::new(Lexer::new(src, &REFERENCE)),
            ast: Ast::new(),
            diagnostics: Diagnostics::new(source),
            scopes: vec![],
            options,
        }
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Turns the outcome of an entry rule into the result handed to callers:
    /// the tree if no error was recorded, every diagnostic otherwise.
    pub fn finish(mut self, result: ParseResult<NodeId>) -> Result<Parsed, Diagnostics> {
        let root = match result {
            Ok(root) => Some(root),
            Err(err) => {
                self.record_error(err);
                None
            }
        };

        match root {
            Some(root) if !self.diagnostics.has_errors() => Ok(Parsed {
                ast: self.ast,
                root,
                warnings: self.diagnostics,
            }),
            _ => {
                log::debug!(
                    "[parser] failed with {} error(s)",
                    self.diagnostics.error_count()
                );
                Err(self.diagnostics)
            }
        }
    }

    /// Whether the next token is what `expected` describes.
    pub fn check(&mut self, expected: impl Expected) -> bool {
        expected.matches(self.tokens.peek().ty)
    }

    /// Consumes the next token if it is what `expected` describes.
    pub fn match_next(&mut self, expected: impl Expected) -> Option<Token> {
        if self.check(&expected) {
            Some(self.tokens.advance())
        } else {
            None
        }
    }

    /// Consumes the next token, or fails with a syntax error naming what was
    /// expected instead.
    pub fn consume(&mut self, expected: impl Expected) -> ParseResult<Token> {
        if self.check(&expected) {
            Ok(self.tokens.advance())
        } else {
            Err(self.unexpected(&expected.describe()))
        }
    }

    /// A syntax error for the next token, which is not `expected`.
    pub fn unexpected(&mut self, expected: &str) -> Diagnostic {
        let tok = self.tokens.peek().clone();
        let msg = match tok.ty.unexpected_message(&tok.text) {
            Some(msg) => msg,
            None => format!("expected {}, but found {}", expected, found(&tok)),
        };
        self.error(DiagnosticKind::Syntax, tok.span, msg)
    }

    fn error(&self, kind: DiagnosticKind, pos: impl Position, msg: impl Into<String>) -> Diagnostic {
        Diagnostic::error(self.diagnostics.source(), kind, pos, msg)
    }

    fn warn(&mut self, pos: impl Position, msg: impl Into<String>) {
        self.diagnostics.warning(DiagnosticKind::Syntax, pos, msg);
    }

    pub(crate) fn record_error(&mut self, err: Diagnostic) {
        log::debug!("[record parse error] {}", err);
        let duplicate = self
            .diagnostics
            .errors()
            .last()
            .map(|last| last.span == err.span && last.msg == err.msg)
            .unwrap_or(false);
        if !duplicate {
            self.diagnostics.push(err);
        }
    }

    fn error_limit_reached(&self) -> bool {
        match self.options.max_errors {
            Some(max) => self.diagnostics.error_count() >= max,
            None => false,
        }
    }

    /// Turns the redefinitions the tree found since the last call into
    /// semantic errors at the second definition.
    fn report_redefinitions(&mut self) {
        for redef in self.ast.take_redefinitions() {
            let span = self.span_of(redef.duplicate);
            let err = self.error(
                DiagnosticKind::Semantic,
                span,
                format!("`{}` is already defined in this scope", redef.name),
            );
            self.record_error(err);
        }
    }

    fn make(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = self.ast.alloc(kind);
        self.ast.with_position(id, span)
    }

    fn span_of(&self, id: NodeId) -> Span {
        self.ast.position(id).unwrap_or_default()
    }

    /// From the start of `start` to the end of the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        start.extend_to(&self.tokens.previous().span)
    }

    fn current_scope(&self) -> Option<TableId> {
        self.scopes.last().copied()
    }

    fn open_scope(&mut self) -> TableId {
        let table = self.ast.new_table(self.current_scope());
        self.scopes.push(table);
        table
    }

    fn close_scope(&mut self) {
        self.scopes.pop();
    }

    /// Consumes a name in a position that accepts soft keywords.
    fn name(&mut self) -> ParseResult<Token> {
        self.consume(Category::IDENTIFIER_LIKE)
    }

    /// `name ('.' name)*`
    fn type_name(&mut self) -> ParseResult<String> {
        let mut path = self.name()?.text;
        while expect_if!(self, TokenType::Dot) {
            path.push('.');
            path.push_str(&self.name()?.text);
        }
        Ok(path)
    }

    /// Fails unless the whole input was consumed.
    pub fn expect_end(&mut self) -> ParseResult<()> {
        self.consume(TokenType::EndOfFile).map(|_| ())
    }
}

impl<E: Expected> Expected for &E {
    fn matches(&self, ty: TokenType) -> bool {
        (*self).matches(ty)
    }

    fn describe(&self) -> String {
        (*self).describe()
    }
}

fn found(tok: &Token) -> String {
    match tok.ty {
        TokenType::EndOfFile => str!("end of file"),
        _ => format!("`{}`", tok.text),
    }
}
