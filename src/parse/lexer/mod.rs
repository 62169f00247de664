pub mod fragment;
mod grammar;
mod scanner;

pub use grammar::{fixed_tokens, tokenize, REFERENCE};
pub use scanner::{Matched, Scanner};

use std::fmt;

use fragment::Fragment;

use crate::ast::token::{Token, TokenType};
use crate::span::Span;

/// Index of a [`LexerState`] inside its [`Grammar`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateId(usize);

/// Decides what a matched fragment becomes. Returning `None` drops the match
/// (whitespace, comments); the callback may also push or pop lexer states.
pub type Callback = Box<dyn Fn(&str, &mut StateStack) -> Option<TokenType> + Send + Sync>;

pub fn emit(ty: TokenType) -> Callback {
    Box::new(move |_: &str, _: &mut StateStack| Some(ty))
}

pub fn skip() -> Callback {
    Box::new(|_: &str, _: &mut StateStack| None)
}

/// Emits `ty` and enters `state`.
pub fn push(ty: TokenType, state: StateId) -> Callback {
    Box::new(move |_: &str, stack: &mut StateStack| {
        stack.push(state);
        Some(ty)
    })
}

/// Emits `ty` and returns to the enclosing state.
pub fn pop(ty: TokenType) -> Callback {
    Box::new(move |_: &str, stack: &mut StateStack| {
        stack.pop();
        Some(ty)
    })
}

pub struct Rule {
    fragment: Fragment,
    callback: Callback,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Rule")
            .field("fragment", &self.fragment)
            .finish()
    }
}

#[derive(Debug)]
pub struct LexerState {
    name: String,
    rules: Vec<Rule>,
    extends: Vec<StateId>,
}

impl LexerState {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The active lexer states, innermost last. The root state is never popped.
#[derive(Clone, Debug)]
pub struct StateStack {
    states: Vec<StateId>,
}

impl StateStack {
    pub fn new(root: StateId) -> StateStack {
        StateStack { states: vec![root] }
    }

    pub fn current(&self) -> StateId {
        self.states[self.states.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.states.len()
    }

    pub fn push(&mut self, state: StateId) {
        self.states.push(state);
    }

    pub fn pop(&mut self) -> Option<StateId> {
        if self.states.len() > 1 {
            self.states.pop()
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub struct Grammar {
    states: Vec<LexerState>,
    initial: StateId,
}

impl Grammar {
    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn state(&self, id: StateId) -> &LexerState {
        &self.states[id.0]
    }

    fn match_state(
        &self,
        id: StateId,
        scanner: &mut Scanner,
        stack: &mut StateStack,
    ) -> Option<Outcome> {
        let state = self.state(id);
        for rule in state.rules.iter() {
            let (span, text) = match rule.fragment.matches(scanner) {
                Some(m) => m,
                None => continue,
            };

            // nothing was consumed, so nothing to emit
            if span.is_empty() {
                continue;
            }

            return Some(match (rule.callback)(&text, stack) {
                Some(ty) => Outcome::Token(Token::new(ty, text, span)),
                None => Outcome::Skipped,
            });
        }

        state
            .extends
            .iter()
            .find_map(|ext| self.match_state(*ext, scanner, stack))
    }
}

enum Outcome {
    Token(Token),
    Skipped,
}

/// Declares the states of a [`Grammar`]. States are declared first so rules
/// can refer to states that get their own rules later.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    states: Vec<LexerState>,
}

impl GrammarBuilder {
    pub fn new() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    pub fn declare(&mut self, name: &str) -> StateId {
        self.states.push(LexerState {
            name: name.to_string(),
            rules: vec![],
            extends: vec![],
        });
        StateId(self.states.len() - 1)
    }

    pub fn rule(&mut self, state: StateId, fragment: Fragment, callback: Callback) -> &mut Self {
        self.states[state.0].rules.push(Rule { fragment, callback });
        self
    }

    /// Makes `state` fall back to the rules of `parent` when none of its own
    /// rules match.
    pub fn extend(&mut self, state: StateId, parent: StateId) -> &mut Self {
        self.states[state.0].extends.push(parent);
        self
    }

    pub fn build(self, initial: StateId) -> Grammar {
        Grammar {
            states: self.states,
            initial,
        }
    }
}

pub struct Lexer<'g> {
    scanner: Scanner,
    grammar: &'g Grammar,
    stack: StateStack,
}

impl<'g> Lexer<'g> {
    pub fn new(src: &str, grammar: &'g Grammar) -> Lexer<'g> {
        Lexer {
            scanner: Scanner::new(src),
            grammar,
            stack: StateStack::new(grammar.initial()),
        }
    }

    pub fn state_name(&self) -> &str {
        self.grammar.state(self.stack.current()).name()
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Produces the next token, or `None` once the input is exhausted.
    pub fn advance(&mut self) -> Option<Token> {
        while self.scanner.has_more() {
            let depth = self.stack.depth();
            let outcome =
                self.grammar
                    .match_state(self.stack.current(), &mut self.scanner, &mut self.stack);

            if self.stack.depth() != depth {
                log::debug!(
                    "[lexer] now in state `{}` (depth {}) at {}",
                    self.state_name(),
                    self.stack.depth(),
                    self.scanner.point()
                );
            }

            match outcome {
                Some(Outcome::Token(tok)) => {
                    log::trace!("[lexer] {:?} {:?} at {}", tok.ty, tok.text, tok.span);
                    return Some(tok);
                }
                Some(Outcome::Skipped) => continue,
                None => return Some(self.unexpected_character()),
            }
        }
        None
    }

    fn unexpected_character(&mut self) -> Token {
        let start = self.scanner.point();
        let text = self
            .scanner
            .peek_char()
            .map(|c| c.to_string())
            .unwrap_or_default();
        self.scanner.advance(1);
        Token::new(
            TokenType::UnexpectedCharacter,
            text,
            Span::new(start, self.scanner.point()),
        )
    }
}

impl<'g> Iterator for Lexer<'g> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.advance()
    }
}

#[cfg(test)]
mod lexer_tests {
    use super::fragment::{literal, regex};
    use super::*;

    fn types(tokens: &[Token]) -> Vec<TokenType> {
        tokens.iter().map(|t| t.ty).collect()
    }

    /// `a` switches into a state that only knows `b` and leaves on `.`
    fn toy_grammar() -> Grammar {
        let mut g = GrammarBuilder::new();
        let root = g.declare("root");
        let inner = g.declare("inner");
        g.rule(root, regex(" +"), skip())
            .rule(root, literal("a"), push(TokenType::LeftBrace, inner))
            .rule(root, literal("x"), emit(TokenType::Identifier));
        g.rule(inner, literal("b"), emit(TokenType::StringContent))
            .rule(inner, literal("."), pop(TokenType::RightBrace))
            .extend(inner, root);
        g.build(root)
    }

    #[test]
    fn skipped_matches_do_not_end_the_input() {
        let grammar = toy_grammar();
        let tokens = Lexer::new("   x   x", &grammar).collect::<Vec<_>>();
        assert_eq!(types(&tokens), vec![TokenType::Identifier, TokenType::Identifier]);
        assert_eq!(tokens[1].span.start.column, 7);
    }

    #[test]
    fn states_push_pop_and_fall_back() {
        let grammar = toy_grammar();
        let mut lexer = Lexer::new("ab x.x", &grammar);
        assert_eq!(lexer.advance().unwrap().ty, TokenType::LeftBrace);
        assert_eq!(lexer.state_name(), "inner");
        assert_eq!(lexer.advance().unwrap().ty, TokenType::StringContent);
        // `x` is only known to the root state
        assert_eq!(lexer.advance().unwrap().ty, TokenType::Identifier);
        assert_eq!(lexer.advance().unwrap().ty, TokenType::RightBrace);
        assert_eq!(lexer.state_name(), "root");
        assert_eq!(lexer.advance().unwrap().ty, TokenType::Identifier);
        assert_eq!(lexer.advance(), None);
    }

    #[test]
    fn unknown_input_is_an_error_token() {
        let grammar = toy_grammar();
        let tokens = Lexer::new("x?x", &grammar).collect::<Vec<_>>();
        assert_eq!(
            types(&tokens),
            vec![
                TokenType::Identifier,
                TokenType::UnexpectedCharacter,
                TokenType::Identifier
            ]
        );
        assert_eq!(tokens[1].text, "?");
    }

    #[test]
    fn root_state_is_never_popped() {
        let mut stack = StateStack::new(StateId(0));
        assert_eq!(stack.pop(), None);
        stack.push(StateId(1));
        assert_eq!(stack.pop(), Some(StateId(1)));
        assert_eq!(stack.current(), StateId(0));
    }

    #[test]
    fn zero_width_matches_are_ignored() {
        let mut g = GrammarBuilder::new();
        let root = g.declare("root");
        g.rule(root, regex("z*"), emit(TokenType::Identifier))
            .rule(root, literal("q"), emit(TokenType::Comma));
        let grammar = g.build(root);
        let tokens = Lexer::new("q", &grammar).collect::<Vec<_>>();
        assert_eq!(types(&tokens), vec![TokenType::Comma]);
    }
}
