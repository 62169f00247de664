mod utils;

use std::io::Write;

use sprig::{
    ast::{ListName, NodeKind},
    errors::{DiagnosticKind, Severity},
    parse::{self, ParseOptions},
    span::{FileSource, ReplSource, Source, TextSource},
};

use utils::{unit, unit_errors};

const PROGRAM: &str = r#"
import "std/io" { print, Writer as Out }

// greets everybody on the list
fun greet(name: String, greeting: String = "hello"): String {
    val line = "\{greeting}, \{name}!";
    print(line);
    return line;
}

infix fun times(a: Int, b: Int): Int = a * b;

fun fact(0) = 1;
fun fact(n) = n times fact(n - 1);

fun main() {
    var total = 0;
    total += 2 times 3;
    if (total > 5) {
        greet("world")
    } else {
        greet("nobody", greeting = "bye")
    }
}
"#;

#[test]
fn parses_a_whole_program() {
    let parsed = unit(PROGRAM);
    assert!(parsed.warnings.is_empty(), "{}", parsed.warnings);

    let imports = parsed.ast.list(parsed.root, ListName::Imports);
    let decls = parsed.ast.list(parsed.root, ListName::Declarations);
    assert_eq!(imports.len(), 1);
    assert_eq!(decls.len(), 5);
    assert!(parsed.ast.parent_mismatches(parsed.root).is_empty());

    let names = decls
        .iter()
        .map(|d| match parsed.ast.kind(*d) {
            NodeKind::FunctionDeclaration { name, .. } => name.as_str(),
            other => panic!("unexpected declaration {:?}", other),
        })
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["greet", "times", "fact", "fact", "main"]);
}

#[test]
fn rendered_program_parses_to_the_same_tree() {
    let first = unit(PROGRAM);
    let text = first.ast.render(first.root);
    let second = unit(&text);
    assert!(
        first.ast.equivalent(first.root, &second.ast, second.root),
        "rendered as:\n{}",
        text
    );
}

#[test]
fn all_errors_are_reported_together() {
    let errs = unit_errors(
        r#"
fun a() { val = 1; }
fun b() { return ); }
fun a() = 1;
"#,
    );
    let kinds = errs.iter().map(|d| d.kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::Syntax,
            DiagnosticKind::Syntax,
            DiagnosticKind::Semantic
        ]
    );
    assert!(errs.iter().all(|d| d.source == "test.sprig"));
    assert!(errs.iter().all(|d| d.severity == Severity::Error));
}

#[test]
fn statement_entry_point() {
    let parsed = parse::parse_statement(&ReplSource::new(3, "val answer = 6 * 7"))
        .expect("statement");
    assert_eq!(parsed.ast.render(parsed.root), "val answer = (6 * 7);");

    let errs = parse::parse_statement(&ReplSource::new(4, "val = 1;")).unwrap_err();
    assert_eq!(errs.source(), "<repl:4>");
    assert_eq!(errs.error_count(), 1);
}

#[test]
fn file_sources() {
    let path = std::env::temp_dir().join(format!("sprig-entry-{}.sprig", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "fun main() = 1;").unwrap();
    drop(file);

    let source = FileSource::new(&path);
    let parsed = parse::parse_compilation_unit(&source).expect("file parses");
    assert_eq!(parsed.ast.list(parsed.root, ListName::Declarations).len(), 1);
    std::fs::remove_file(&path).unwrap();

    let errs = parse::parse_compilation_unit(&source).unwrap_err();
    let errs = errs.iter().collect::<Vec<_>>();
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].kind, DiagnosticKind::IO);
    assert_eq!(errs[0].source, source.description());
}

#[test]
fn options_are_honored() {
    let src = TextSource::anonymous("fun 1() {}\nfun 2() {}\nfun 3() {}\nfun ok() {}");
    let strict = ParseOptions {
        recover: false,
        ..ParseOptions::default()
    };
    assert_eq!(
        parse::parse_compilation_unit_with(&src, &strict)
            .unwrap_err()
            .error_count(),
        1
    );

    let capped = ParseOptions {
        max_errors: Some(2),
        ..ParseOptions::default()
    };
    assert_eq!(
        parse::parse_compilation_unit_with(&src, &capped)
            .unwrap_err()
            .error_count(),
        2
    );
}

#[test]
fn empty_source() {
    let parsed = unit("  // nothing here\n");
    assert!(parsed.ast.list(parsed.root, ListName::Imports).is_empty());
    assert!(parsed.ast.list(parsed.root, ListName::Declarations).is_empty());

    let errs = parse::parse_expression(&TextSource::anonymous("")).unwrap_err();
    assert_eq!(
        errs.iter().map(|d| d.msg.as_str()).collect::<Vec<_>>(),
        vec!["expected expression, but found end of file"]
    );
}
