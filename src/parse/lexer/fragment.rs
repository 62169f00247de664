use regex::Regex;

use super::scanner::{Matched, Scanner};
use crate::span::Span;

/// A composable matcher over a [`Scanner`].
///
/// Every fragment is atomic: on success the scanner is advanced past the
/// matched text, on failure it is left exactly where it was.
#[derive(Clone, Debug)]
pub enum Fragment {
    Literal(String),
    Regex(Regex),
    Composite(Box<Fragment>, Box<Fragment>),
    Alternative(Box<Fragment>, Box<Fragment>),
    ZeroOrMore(Box<Fragment>),
    OneOrMore(Box<Fragment>),
}

pub fn literal(text: impl Into<String>) -> Fragment {
    Fragment::Literal(text.into())
}

/// A fragment matching `pattern` anchored at the cursor.
///
/// # Panics
///
/// Panics if `pattern` is not a valid regular expression. Patterns are part
/// of a grammar definition, so this is a programming error.
pub fn regex(pattern: &str) -> Fragment {
    match Regex::new(&format!("^(?:{})", pattern)) {
        Ok(re) => Fragment::Regex(re),
        Err(e) => panic!("invalid fragment pattern `{}`: {}", pattern, e),
    }
}

pub fn composite(first: Fragment, second: Fragment) -> Fragment {
    Fragment::Composite(Box::new(first), Box::new(second))
}

pub fn alternative(first: Fragment, second: Fragment) -> Fragment {
    Fragment::Alternative(Box::new(first), Box::new(second))
}

pub fn zero_or_more(fragment: Fragment) -> Fragment {
    Fragment::ZeroOrMore(Box::new(fragment))
}

pub fn one_or_more(fragment: Fragment) -> Fragment {
    Fragment::OneOrMore(Box::new(fragment))
}

pub fn optional(fragment: Fragment) -> Fragment {
    alternative(fragment, literal(""))
}

/// Left-nested composite of all `fragments`.
pub fn sequence(fragments: impl IntoIterator<Item = Fragment>) -> Fragment {
    let mut iter = fragments.into_iter();
    let first = iter.next().unwrap_or_else(|| literal(""));
    iter.fold(first, composite)
}

impl Fragment {
    pub fn matches(&self, scanner: &mut Scanner) -> Option<Matched> {
        match self {
            Fragment::Literal(text) => {
                let len = text.chars().count();
                scanner.try_consume_segment(len, |seg| seg == text)
            }
            Fragment::Regex(re) => scanner.try_consume_regex(re),
            Fragment::Composite(first, second) => {
                let mut snapshot = scanner.snapshot();
                let (a_span, a_text) = first.matches(&mut snapshot)?;
                let (b_span, b_text) = second.matches(&mut snapshot)?;
                scanner.resume_from_snapshot(&snapshot);
                Some((a_span.extend_to(&b_span), a_text + &b_text))
            }
            Fragment::Alternative(first, second) => first
                .matches(scanner)
                .or_else(|| second.matches(scanner)),
            Fragment::ZeroOrMore(inner) => {
                let empty = (Span::from(scanner.point()), String::new());
                Some(repeat(inner, scanner, empty))
            }
            Fragment::OneOrMore(inner) => {
                let first = inner.matches(scanner)?;
                Some(repeat(inner, scanner, first))
            }
        }
    }
}

fn repeat(inner: &Fragment, scanner: &mut Scanner, (mut span, mut text): Matched) -> Matched {
    while let Some((next, more)) = inner.matches(scanner) {
        // an empty iteration would match forever
        if next.is_empty() {
            break;
        }
        span = span.extend_to(&next);
        text.push_str(&more);
    }
    (span, text)
}

#[cfg(test)]
mod fragment_tests {
    use super::*;
    use crate::span::Point;

    fn run(fragment: &Fragment, src: &str) -> (Option<String>, usize) {
        let mut s = Scanner::new(src);
        let m = fragment.matches(&mut s).map(|(_, text)| text);
        (m, s.point().offset)
    }

    #[test]
    fn literal_is_case_sensitive() {
        let f = literal("fun");
        assert_eq!(run(&f, "fun x"), (Some("fun".into()), 3));
        assert_eq!(run(&f, "Fun x"), (None, 0));
        assert_eq!(run(&f, "fu"), (None, 0));
    }

    #[test]
    fn regex_is_anchored() {
        let f = regex("[0-9]+");
        assert_eq!(run(&f, "42a"), (Some("42".into()), 2));
        assert_eq!(run(&f, "a42"), (None, 0));
    }

    #[test]
    fn composite_commits_only_on_full_success() {
        let f = composite(regex("[0-9]+"), literal("L"));
        assert_eq!(run(&f, "12L"), (Some("12L".into()), 3));
        assert_eq!(run(&f, "12x"), (None, 0));

        let mut s = Scanner::new("a\nbc");
        let (span, _) = composite(literal("a\n"), literal("b"))
            .matches(&mut s)
            .unwrap();
        assert_eq!(span.start, Point::zero());
        assert_eq!(span.end, Point::new(1, 1, 3));
    }

    #[test]
    fn alternative_retries_from_the_original_position() {
        let f = alternative(composite(literal("a"), literal("b")), literal("ac"));
        assert_eq!(run(&f, "ac"), (Some("ac".into()), 2));
    }

    #[test]
    fn zero_or_more_never_fails() {
        let f = zero_or_more(literal("ab"));
        assert_eq!(run(&f, "ababa"), (Some("abab".into()), 4));

        let mut s = Scanner::new("xyz");
        let (span, text) = f.matches(&mut s).unwrap();
        assert_eq!(text, "");
        assert!(span.is_empty());
        assert_eq!(span.start, Point::zero());
    }

    #[test]
    fn one_or_more_needs_a_first_match() {
        let f = one_or_more(literal("ab"));
        assert_eq!(run(&f, "abab!"), (Some("abab".into()), 4));
        assert_eq!(run(&f, "!"), (None, 0));
    }

    #[test]
    fn repetition_of_an_empty_match_terminates() {
        let f = zero_or_more(optional(literal("a")));
        assert_eq!(run(&f, "aab"), (Some("aa".into()), 2));
        assert_eq!(run(&f, "b"), (Some("".into()), 0));
    }

    #[test]
    fn sequence_chains_left_to_right() {
        let f = sequence(vec![literal("a"), optional(literal("b")), literal("c")]);
        assert_eq!(run(&f, "abc"), (Some("abc".into()), 3));
        assert_eq!(run(&f, "ac"), (Some("ac".into()), 2));
        assert_eq!(run(&f, "ab"), (None, 0));
    }
}
