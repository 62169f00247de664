pub mod lexer;
pub mod parser;

pub use lexer::{tokenize, Lexer};
pub use parser::{ParseResult, Parser, Precedence};

use crate::{
    ast::{Ast, NodeId},
    errors::{Diagnostic, Diagnostics},
    span::Source,
};

#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Resume after syntax errors to report as many as possible. When off,
    /// the first syntax error ends the parse.
    pub recover: bool,
    /// Give up once this many errors were recorded.
    pub max_errors: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> ParseOptions {
        ParseOptions {
            recover: true,
            max_errors: None,
        }
    }
}

/// A successfully parsed source.
#[derive(Debug)]
pub struct Parsed {
    pub ast: Ast,
    pub root: NodeId,
    pub warnings: Diagnostics,
}

pub fn parse_compilation_unit(source: &dyn Source) -> Result<Parsed, Diagnostics> {
    parse_compilation_unit_with(source, &ParseOptions::default())
}

pub fn parse_compilation_unit_with(
    source: &dyn Source,
    options: &ParseOptions,
) -> Result<Parsed, Diagnostics> {
    run(source, options, |p| p.parse_compilation_unit())
}

pub fn parse_expression(source: &dyn Source) -> Result<Parsed, Diagnostics> {
    parse_expression_with(source, &ParseOptions::default())
}

/// A single expression that has to span the whole source.
pub fn parse_expression_with(
    source: &dyn Source,
    options: &ParseOptions,
) -> Result<Parsed, Diagnostics> {
    run(source, options, |p| {
        let expr = p.parse_expression(Precedence::Lowest)?;
        p.expect_end()?;
        Ok(expr)
    })
}

pub fn parse_statement(source: &dyn Source) -> Result<Parsed, Diagnostics> {
    parse_statement_with(source, &ParseOptions::default())
}

/// A single statement that has to span the whole source.
pub fn parse_statement_with(
    source: &dyn Source,
    options: &ParseOptions,
) -> Result<Parsed, Diagnostics> {
    run(source, options, |p| {
        let stmt = p.parse_statement()?;
        p.expect_end()?;
        Ok(stmt)
    })
}

fn run(
    source: &dyn Source,
    options: &ParseOptions,
    entry: impl FnOnce(&mut Parser) -> ParseResult<NodeId>,
) -> Result<Parsed, Diagnostics> {
    let description = source.description();
    let src = match source.read_content() {
        Ok(src) => src,
        Err(err) => {
            log::debug!("[parse] could not read {}: {}", description, err);
            return Err(Diagnostics::from(Diagnostic::io(description, &err)));
        }
    };

    log::debug!("[parse] {} ({} bytes)", description, src.len());
    let mut parser = Parser::new(&src, description, options.clone());
    let result = entry(&mut parser);
    parser.finish(result)
}
