use std::rc::Rc;

use regex::Regex;

use crate::span::{Point, Span};

/// A cursor over source text.
///
/// Cloning a scanner (see [`Scanner::snapshot`]) shares the text and copies
/// only the cursor, which is what speculative matching relies on: a fragment
/// works on a snapshot and the committed scanner only moves once the whole
/// match succeeded.
#[derive(Clone, Debug)]
pub struct Scanner {
    src: Rc<str>,
    pos: Point,
}

pub type Matched = (Span, String);

impl Scanner {
    pub fn new(src: &str) -> Scanner {
        Scanner {
            src: Rc::from(src),
            pos: Point::zero(),
        }
    }

    pub fn has_more(&self) -> bool {
        self.pos.offset < self.src.len()
    }

    pub fn point(&self) -> Point {
        self.pos
    }

    /// The text that has not been consumed yet.
    pub fn rest(&self) -> &str {
        &self.src[self.pos.offset..]
    }

    pub fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Moves the cursor `n` characters forward.
    ///
    /// # Panics
    ///
    /// Panics when fewer than `n` characters remain.
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            let ch = match self.peek_char() {
                Some(ch) => ch,
                None => panic!("scanner advanced past the end of input at {}", self.pos),
            };

            if ch == '\n' {
                self.pos.line += 1;
                self.pos.column = 0;
            } else {
                self.pos.column += 1;
            }
            self.pos.offset += ch.len_utf8();
        }
    }

    /// Consumes the next `len` characters if there are that many and `pred`
    /// accepts them. Either the whole segment is consumed or nothing is.
    pub fn try_consume_segment(
        &mut self,
        len: usize,
        pred: impl FnOnce(&str) -> bool,
    ) -> Option<Matched> {
        let rest = self.rest();
        let end = match rest.char_indices().nth(len) {
            Some((idx, _)) => idx,
            None if rest.chars().count() == len => rest.len(),
            None => return None,
        };

        let segment = &rest[..end];
        if !pred(segment) {
            return None;
        }

        let text = segment.to_string();
        Some(self.commit(len, text))
    }

    /// Consumes the match of `regex` if it starts exactly at the cursor.
    pub fn try_consume_regex(&mut self, regex: &Regex) -> Option<Matched> {
        let m = regex.find(self.rest())?;
        if m.start() != 0 {
            return None;
        }

        let text = m.as_str().to_string();
        let len = text.chars().count();
        Some(self.commit(len, text))
    }

    fn commit(&mut self, len: usize, text: String) -> Matched {
        let start = self.pos;
        self.advance(len);
        (Span::new(start, self.pos), text)
    }

    /// An independent cursor over the same text.
    pub fn snapshot(&self) -> Scanner {
        self.clone()
    }

    /// Moves this cursor to wherever `snapshot` is.
    pub fn resume_from_snapshot(&mut self, snapshot: &Scanner) {
        debug_assert!(
            Rc::ptr_eq(&self.src, &snapshot.src),
            "resumed from a snapshot of a different source"
        );
        self.pos = snapshot.pos;
    }
}

#[cfg(test)]
mod scanner_tests {
    use super::Scanner;
    use crate::span::Point;
    use regex::Regex;

    #[test]
    fn advance_tracks_lines_and_columns() {
        let mut s = Scanner::new("ab\ncd");
        s.advance(2);
        assert_eq!(s.point(), Point::new(0, 2, 2));
        s.advance(1);
        assert_eq!(s.point(), Point::new(1, 0, 3));
        s.advance(2);
        assert_eq!(s.point(), Point::new(1, 2, 5));
        assert!(!s.has_more());
    }

    #[test]
    fn offsets_count_bytes_and_columns_count_chars() {
        let mut s = Scanner::new("é=1");
        s.advance(1);
        assert_eq!(s.point(), Point::new(0, 1, 2));
        assert_eq!(s.rest(), "=1");
    }

    #[test]
    #[should_panic]
    fn advancing_past_the_end_is_a_bug() {
        let mut s = Scanner::new("a");
        s.advance(2);
    }

    #[test]
    fn segments_are_all_or_nothing() {
        let mut s = Scanner::new("fun main");
        assert!(s.try_consume_segment(3, |seg| seg == "val").is_none());
        assert_eq!(s.point(), Point::zero());

        let (span, text) = s.try_consume_segment(3, |seg| seg == "fun").unwrap();
        assert_eq!(text, "fun");
        assert_eq!(span.range(), 0..3);

        // not enough input left
        assert!(s.try_consume_segment(10, |_| true).is_none());
        assert_eq!(s.point().offset, 3);

        // the whole rest is fine
        assert!(s.try_consume_segment(5, |_| true).is_some());
        assert!(!s.has_more());
    }

    #[test]
    fn regex_matches_only_at_the_cursor() {
        let digits = Regex::new("[0-9]+").unwrap();
        let mut s = Scanner::new("ab12");
        assert!(s.try_consume_regex(&digits).is_none());
        s.advance(2);
        let (span, text) = s.try_consume_regex(&digits).unwrap();
        assert_eq!(text, "12");
        assert_eq!(span.start, Point::new(0, 2, 2));
    }

    #[test]
    fn snapshots_share_text_but_not_cursor() {
        let mut s = Scanner::new("hello");
        let mut snap = s.snapshot();
        snap.advance(3);
        assert_eq!(s.point().offset, 0);
        s.resume_from_snapshot(&snap);
        assert_eq!(s.rest(), "lo");
    }
}
