use std::collections::VecDeque;

use super::{Token, TokenType};
use crate::parse::lexer::Lexer;
use crate::span::{Point, Span};

/// Buffered view over a [`Lexer`].
///
/// Tokens are pulled on demand. Once the lexer runs dry the stream keeps
/// returning an end-of-file token placed at the end of the last real token.
pub struct TokenStream<'g> {
    lexer: Lexer<'g>,
    pending: VecDeque<Token>,
    consumed: Vec<Token>,
    last_end: Point,
}

impl<'g> TokenStream<'g> {
    pub fn new(lexer: Lexer<'g>) -> TokenStream<'g> {
        TokenStream {
            lexer,
            pending: VecDeque::new(),
            consumed: vec![],
            last_end: Point::zero(),
        }
    }

    fn pull(&mut self) -> Token {
        match self.lexer.advance() {
            Some(tok) => {
                self.last_end = tok.span.end;
                tok
            }
            None => Token::new(TokenType::EndOfFile, "", Span::from(self.last_end)),
        }
    }

    /// The token `n` positions ahead of the cursor without consuming anything.
    pub fn look_ahead(&mut self, n: usize) -> &Token {
        while self.pending.len() <= n {
            let tok = self.pull();
            self.pending.push_back(tok);
        }
        &self.pending[n]
    }

    pub fn peek(&mut self) -> &Token {
        self.look_ahead(0)
    }

    pub fn is_at_end(&mut self) -> bool {
        self.peek().ty == TokenType::EndOfFile
    }

    pub fn advance(&mut self) -> Token {
        let tok = match self.pending.pop_front() {
            Some(tok) => tok,
            None => self.pull(),
        };
        log::trace!("[tokens] consumed {:?} at {}", tok.ty, tok.span);
        self.consumed.push(tok.clone());
        tok
    }

    /// Gives the most recently consumed token back to the stream.
    ///
    /// # Panics
    ///
    /// Panics if nothing has been consumed yet.
    pub fn unconsume(&mut self) {
        match self.consumed.pop() {
            Some(tok) => {
                log::trace!("[tokens] gave back {:?} at {}", tok.ty, tok.span);
                self.pending.push_front(tok)
            }
            None => panic!("unconsume called before any token was consumed"),
        }
    }

    /// The most recently consumed token.
    ///
    /// # Panics
    ///
    /// Panics if nothing has been consumed yet.
    pub fn previous(&self) -> &Token {
        match self.consumed.last() {
            Some(tok) => tok,
            None => panic!("previous called before any token was consumed"),
        }
    }

    pub fn has_previous(&self) -> bool {
        !self.consumed.is_empty()
    }

    /// Number of tokens consumed so far, net of the ones given back.
    pub fn consumed_count(&self) -> usize {
        self.consumed.len()
    }
}

#[cfg(test)]
mod stream_tests {
    use super::TokenStream;
    use crate::ast::token::TokenType;
    use crate::parse::lexer::{Lexer, REFERENCE};
    use crate::span::Point;

    fn stream(src: &str) -> TokenStream<'static> {
        TokenStream::new(Lexer::new(src, &REFERENCE))
    }

    #[test]
    fn lookahead_does_not_consume() {
        let mut tokens = stream("a + b");
        assert_eq!(tokens.look_ahead(2).text, "b");
        assert_eq!(tokens.peek().text, "a");
        assert_eq!(tokens.advance().text, "a");
        assert_eq!(tokens.advance().ty, TokenType::Plus);
        assert_eq!(tokens.previous().ty, TokenType::Plus);
    }

    #[test]
    fn unconsume_gives_back_the_last_token() {
        let mut tokens = stream("a b");
        tokens.advance();
        tokens.advance();
        tokens.unconsume();
        assert_eq!(tokens.previous().text, "a");
        assert_eq!(tokens.advance().text, "b");
    }

    #[test]
    #[should_panic]
    fn unconsume_with_nothing_consumed() {
        stream("a").unconsume();
    }

    #[test]
    #[should_panic]
    fn previous_with_nothing_consumed() {
        stream("a").previous();
    }

    #[test]
    fn end_of_file_repeats_at_the_last_token_end() {
        let mut tokens = stream("ab  ");
        tokens.advance();
        for _ in 0..3 {
            let eof = tokens.advance();
            assert_eq!(eof.ty, TokenType::EndOfFile);
            assert_eq!(eof.span.start, Point::new(0, 2, 2));
        }
        assert!(tokens.is_at_end());
    }

    #[test]
    fn empty_input_has_end_of_file_at_zero() {
        let mut tokens = stream("");
        let eof = tokens.advance();
        assert_eq!(eof.ty, TokenType::EndOfFile);
        assert_eq!(eof.span.start, Point::zero());
    }
}
