#![cfg(test)]

use sprig::{
    ast::{Ast, NodeId},
    errors::Diagnostics,
    parse::{self, Parsed},
    span::TextSource,
};

#[allow(dead_code)]
pub fn enable_debug_logs() {
    fern::Dispatch::new()
        .level(log::LevelFilter::Debug)
        .chain(std::io::stderr())
        .apply()
        .unwrap();
}

#[allow(dead_code)]
pub fn unit(src: &str) -> Parsed {
    match parse::parse_compilation_unit(&TextSource::new("test.sprig", src)) {
        Ok(parsed) => parsed,
        Err(errs) => panic!("could not parse:\n{}\n{}", src, errs),
    }
}

#[allow(dead_code)]
pub fn unit_errors(src: &str) -> Diagnostics {
    match parse::parse_compilation_unit(&TextSource::new("test.sprig", src)) {
        Ok(parsed) => panic!("expected errors, got:\n{}", parsed.ast.dump(parsed.root)),
        Err(errs) => errs,
    }
}

#[allow(dead_code)]
pub fn expression(src: &str) -> Result<(Ast, NodeId), Diagnostics> {
    parse::parse_expression(&TextSource::anonymous(src)).map(|parsed| (parsed.ast, parsed.root))
}
