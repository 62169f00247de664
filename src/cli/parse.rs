use std::time::Instant;

use structopt::StructOpt;

use crate::{
    errors::Diagnostic,
    parse::{self, ParseOptions},
    span::{Source, TextSource},
};

use super::InputOptions;

#[derive(Debug, StructOpt)]
pub struct ParseCommand {
    #[structopt(flatten)]
    input: InputOptions,

    #[structopt(long, help = "parses a single expression")]
    expr: bool,

    #[structopt(long, conflicts_with = "expr", help = "parses a single statement")]
    statement: bool,

    #[structopt(long, help = "stops at the first syntax error")]
    no_recover: bool,

    #[structopt(long, help = "gives up after this many errors")]
    max_errors: Option<usize>,

    #[structopt(long, help = "prints source text instead of the tree")]
    render: bool,
}

/// Reads `source` once. Diagnostics point into the text, so the same text
/// feeds both the parse and the snippets.
fn buffered(source: &dyn Source) -> Result<(TextSource, String), Diagnostic> {
    let description = source.description();
    match source.read_content() {
        Ok(text) => Ok((TextSource::new(description, text.clone()), text)),
        Err(err) => Err(Diagnostic::io(description, &err)),
    }
}

pub(super) fn action(cmd: ParseCommand) -> bool {
    let source = match cmd.input.source() {
        Ok(source) => source,
        Err(err) => {
            log::error!("could not read standard input: {}", err.msg);
            return false;
        }
    };

    let (source, text) = match buffered(source.as_ref()) {
        Ok(buffered) => buffered,
        Err(err) => {
            err.emit("");
            return false;
        }
    };

    let options = ParseOptions {
        recover: !cmd.no_recover,
        max_errors: cmd.max_errors,
    };

    let start_time = Instant::now();
    log::info!("parsing {}", source.description());
    let result = if cmd.expr {
        parse::parse_expression_with(&source, &options)
    } else if cmd.statement {
        parse::parse_statement_with(&source, &options)
    } else {
        parse::parse_compilation_unit_with(&source, &options)
    };

    match result {
        Ok(parsed) => {
            parsed.warnings.emit(&text);
            if cmd.render {
                println!("{}", parsed.ast.render(parsed.root));
            } else {
                println!("{}", parsed.ast.dump(parsed.root));
            }
            log::info!("parsed in {:?}", start_time.elapsed());
            true
        }
        Err(errs) => {
            errs.emit(&text);
            log::error!("{} errors emitted", errs.error_count());
            false
        }
    }
}

#[cfg(test)]
mod buffered_tests {
    use std::cell::Cell;
    use std::io;

    use super::buffered;
    use crate::errors::DiagnosticKind;
    use crate::parse;
    use crate::span::Source;

    struct CountingSource {
        reads: Cell<usize>,
        fail: bool,
    }

    impl Source for CountingSource {
        fn description(&self) -> String {
            str!("counting.sprig")
        }

        fn read_content(&self) -> io::Result<String> {
            self.reads.set(self.reads.get() + 1);
            if self.fail {
                Err(io::Error::new(io::ErrorKind::NotFound, "gone"))
            } else {
                Ok(str!("fun main() = 1;"))
            }
        }
    }

    #[test]
    fn source_is_read_once() {
        let source = CountingSource {
            reads: Cell::new(0),
            fail: false,
        };
        let (text_source, text) = buffered(&source).unwrap();
        let parsed = parse::parse_compilation_unit(&text_source).unwrap();
        assert_eq!(text, "fun main() = 1;");
        assert_eq!(text_source.description(), "counting.sprig");
        assert_eq!(parsed.ast.render(parsed.root), "fun main() = 1;");
        assert_eq!(source.reads.get(), 1);
    }

    #[test]
    fn unreadable_source_is_an_io_diagnostic() {
        let source = CountingSource {
            reads: Cell::new(0),
            fail: true,
        };
        let err = buffered(&source).unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::IO);
        assert_eq!(err.source, "counting.sprig");
    }
}
