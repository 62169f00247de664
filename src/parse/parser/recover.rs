use crate::ast::token::TokenType;

use super::{Expected, ParseResult, Parser};

pub trait Recover<T> {
    /// On error, records it, skips ahead to `stop` and returns `fallback`'s
    /// value. `mark` is the consumed token count where the failed construct
    /// began. Still fails when recovery is switched off or the error limit
    /// was reached.
    fn recover_with(
        self,
        parser: &mut Parser,
        mark: usize,
        stop: impl Expected,
        fallback: impl FnOnce(&mut Parser) -> T,
    ) -> ParseResult<T>;
}

impl<T> Recover<T> for ParseResult<T> {
    fn recover_with(
        self,
        parser: &mut Parser,
        mark: usize,
        stop: impl Expected,
        fallback: impl FnOnce(&mut Parser) -> T,
    ) -> ParseResult<T> {
        let err = match self {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !parser.options.recover {
            return Err(err);
        }

        parser.record_error(err.clone());
        if parser.error_limit_reached() {
            log::debug!("[parser] error limit reached, giving up");
            return Err(err);
        }

        parser.synchronize(&stop, mark);
        Ok(fallback(parser))
    }
}

impl Parser {
    /// Runs `action` as a synchronization point: a syntax error inside it is
    /// recorded and the parser resumes after the broken construct with
    /// `on_fail`'s value in its place.
    pub fn with_synchronization<T>(
        &mut self,
        stop: impl Expected,
        on_fail: impl FnOnce(&mut Parser) -> T,
        action: impl FnOnce(&mut Parser) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let mark = self.tokens.consumed_count();
        action(self).recover_with(self, mark, stop, on_fail)
    }

    /// Skips tokens after an error. Skipping ends after a `;`, before a token
    /// matching `stop`, or at the end of the input. Braces opened while
    /// skipping are skipped as a whole.
    ///
    /// Unless tokens were consumed since `mark`, at least one token is
    /// skipped so the caller's loop moves on.
    pub(crate) fn synchronize(&mut self, stop: &impl Expected, mark: usize) {
        let progressed = self.tokens.consumed_count() > mark;
        let mut depth = 0usize;
        let mut skipped = 0usize;
        loop {
            let ty = self.tokens.peek().ty;
            let may_stop = progressed || skipped > 0;
            if may_stop && (ty == TokenType::EndOfFile || (depth == 0 && stop.matches(ty))) {
                break;
            }

            let tok = self.tokens.advance();
            skipped += 1;
            match tok.ty {
                TokenType::EndOfFile => break,
                TokenType::Semicolon if depth == 0 => break,
                TokenType::LeftBrace => depth += 1,
                TokenType::RightBrace => depth = depth.saturating_sub(1),
                _ => (),
            }
        }
        log::debug!(
            "[parser] skipped {} token(s), resuming before {}",
            skipped,
            self.tokens.peek().ty
        );
    }
}
