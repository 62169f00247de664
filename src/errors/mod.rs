use crate::span::{Position, Span};

use colored::*;
use serde::{Deserialize, Serialize};
use std::{fmt, io};

#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    Syntax,
    Semantic,
    Type,
    IO,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Severity::Warning => "warning",
                Severity::Error => "error",
            }
        )
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DiagnosticKind::Syntax => "syntax",
                DiagnosticKind::Semantic => "semantic",
                DiagnosticKind::Type => "type",
                DiagnosticKind::IO => "i/o",
            }
        )
    }
}

/// A single problem found while reading a source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub source: String,
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub span: Span,
    pub msg: String,
}

impl Diagnostic {
    pub fn error(
        source: impl Into<String>,
        kind: DiagnosticKind,
        position: impl Position,
        msg: impl Into<String>,
    ) -> Diagnostic {
        Diagnostic {
            source: source.into(),
            severity: Severity::Error,
            kind,
            span: position.span(),
            msg: msg.into(),
        }
    }

    pub fn warning(
        source: impl Into<String>,
        kind: DiagnosticKind,
        position: impl Position,
        msg: impl Into<String>,
    ) -> Diagnostic {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(source, kind, position, msg)
        }
    }

    pub fn io(source: impl Into<String>, err: &io::Error) -> Diagnostic {
        Diagnostic::error(source, DiagnosticKind::IO, Span::default(), err.to_string())
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Print the diagnostic to stderr, underlining the offending part of `text`.
    pub fn emit(&self, text: &str) {
        let header = format!("{}[{}]:", self.severity, self.kind);
        let header = match self.severity {
            Severity::Error => header.bold().red(),
            Severity::Warning => header.bold().yellow(),
        };
        eprintln!("{} {}", header, self.msg.bold());

        let arrow = "-->".bold();
        let line = match text.lines().nth(self.span.start.line) {
            Some(line) => line,
            None => {
                eprintln!(" {} {}", arrow, self.source);
                return;
            }
        };

        let lineno = (self.span.start.line + 1).to_string();
        let spacing = " ".repeat(lineno.len() + 1);
        let pipe = "|".bold();
        eprintln!("{}{} {}:{}", spacing, arrow, self.source, self.span);
        eprintln!("{}{}", spacing, pipe);
        eprintln!("{} {} {}", lineno.bold(), pipe, line);

        let width = if self.span.lines() == 1 {
            self.span.len().max(1)
        } else {
            line.chars().count().saturating_sub(self.span.start.column).max(1)
        };
        let indent = " ".repeat(self.span.start.column);
        eprintln!("{}{} {}{}", spacing, pipe, indent, "^".repeat(width).bold().red());
        eprintln!()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {} ({}:{})",
            self.severity, self.kind, self.msg, self.source, self.span
        )
    }
}

impl std::error::Error for Diagnostic {}

impl From<io::Error> for Diagnostic {
    fn from(err: io::Error) -> Diagnostic {
        Diagnostic::io(String::new(), &err)
    }
}

/// Every diagnostic recorded for one source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    source: String,
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(source: impl Into<String>) -> Diagnostics {
        Diagnostics {
            source: source.into(),
            records: vec![],
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::debug!("[diagnostics] {}", diagnostic);
        self.records.push(diagnostic);
    }

    pub fn error(&mut self, kind: DiagnosticKind, position: impl Position, msg: impl Into<String>) {
        let d = Diagnostic::error(self.source.clone(), kind, position, msg);
        self.push(d);
    }

    pub fn warning(
        &mut self,
        kind: DiagnosticKind,
        position: impl Position,
        msg: impl Into<String>,
    ) {
        let d = Diagnostic::warning(self.source.clone(), kind, position, msg);
        self.push(d);
    }

    pub fn has_errors(&self) -> bool {
        self.records.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.records.iter().filter(|d| d.is_error()).count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(|d| !d.is_error())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn emit(&self, text: &str) {
        for d in self.records.iter() {
            d.emit(text);
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.records.iter() {
            writeln!(f, "{}", d)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(d: Diagnostic) -> Diagnostics {
        Diagnostics {
            source: d.source.clone(),
            records: vec![d],
        }
    }
}

#[cfg(test)]
mod diagnostics_tests {
    use super::{DiagnosticKind, Diagnostics, Severity};
    use crate::span::{Point, Span};

    #[test]
    fn warnings_alone_do_not_fail() {
        let mut diags = Diagnostics::new("test");
        diags.warning(DiagnosticKind::Syntax, Point::zero(), "redundant alias");
        assert!(!diags.has_errors());
        assert_eq!(diags.warnings().count(), 1);

        diags.error(
            DiagnosticKind::Semantic,
            Span::new(Point::new(0, 1, 1), Point::new(0, 3, 3)),
            "`x` is already defined in this scope",
        );
        assert!(diags.has_errors());
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn display_names_severity_kind_and_location() {
        let mut diags = Diagnostics::new("main.sprig");
        diags.error(DiagnosticKind::Syntax, Point::new(1, 4, 9), "expected `)`");
        let d = diags.iter().next().unwrap();
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.to_string(), "error[syntax]: expected `)` (main.sprig:2:5)");
    }
}
