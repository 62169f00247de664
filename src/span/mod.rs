mod source;

pub use source::{FileSource, ReplSource, Source, TextSource};

use std::{cmp::Ordering, fmt, ops::Range};

use serde::{Deserialize, Serialize};

/// A location in source text. `line` and `column` are 0-based, `offset` is the
/// absolute byte offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Point,
    pub end: Point,
}

/// Anything that can be located in the source: a single [`Point`] or a [`Span`].
pub trait Position {
    fn span(&self) -> Span;

    fn start(&self) -> Point {
        self.span().start
    }

    fn end(&self) -> Point {
        self.span().end
    }
}

impl Point {
    pub fn new(line: usize, column: usize, offset: usize) -> Point {
        Point {
            line,
            column,
            offset,
        }
    }

    pub fn zero() -> Point {
        Point::default()
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.line, self.column).cmp(&(other.line, other.column))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

impl Position for Point {
    fn span(&self) -> Span {
        Span::from(*self)
    }
}

impl Span {
    pub fn new(start: Point, end: Point) -> Span {
        debug_assert!(start <= end, "span start {} is after its end {}", start, end);
        Span { start, end }
    }

    pub fn lines(&self) -> usize {
        (self.end.line - self.start.line) + 1
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The absolute offset range `[start, end)` covered by this span.
    pub fn range(&self) -> Range<usize> {
        self.start.offset..self.end.offset
    }

    /// Create a new span with the start of this one and end of another one
    pub fn extend_to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }
}

impl PartialOrd for Span {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Span {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.start, self.end).cmp(&(other.start, other.end))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

impl From<Point> for Span {
    fn from(p: Point) -> Span {
        Span { start: p, end: p }
    }
}

impl Position for Span {
    fn span(&self) -> Span {
        *self
    }
}

#[cfg(test)]
mod span_tests {
    use super::{Point, Position, Span};

    #[test]
    fn points_order_by_line_then_column() {
        let a = Point::new(0, 9, 9);
        let b = Point::new(1, 0, 10);
        let c = Point::new(1, 2, 12);
        assert!(a < b);
        assert!(b < c);

        // the offset takes no part in the ordering
        assert_eq!(
            Point::new(2, 3, 0).cmp(&Point::new(2, 3, 40)),
            std::cmp::Ordering::Equal
        );
    }

    #[test]
    fn spans_order_by_start_then_end() {
        let short = Span::new(Point::new(0, 0, 0), Point::new(0, 1, 1));
        let long = Span::new(Point::new(0, 0, 0), Point::new(0, 4, 4));
        let later = Span::new(Point::new(0, 1, 1), Point::new(0, 2, 2));
        assert!(short < long);
        assert!(long < later);
    }

    #[test]
    fn point_is_a_zero_width_position() {
        let p = Point::new(3, 4, 20);
        let span = p.span();
        assert_eq!(span.start, p);
        assert_eq!(span.end, p);
        assert!(span.is_empty());
        assert_eq!(span.range(), 20..20);
        assert_eq!(p.to_string(), "4:5");
    }

    #[test]
    fn extend_to_covers_both_spans() {
        let a = Span::new(Point::new(0, 0, 0), Point::new(0, 2, 2));
        let b = Span::new(Point::new(1, 0, 5), Point::new(1, 3, 8));
        let joined = a.extend_to(&b);
        assert_eq!(joined.start(), a.start);
        assert_eq!(joined.end(), b.end);
        assert_eq!(joined.lines(), 2);
        assert_eq!(joined.len(), 8);
    }
}
