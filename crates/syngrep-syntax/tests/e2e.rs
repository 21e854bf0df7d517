//! End-to-end tests for syngrep-syntax through the public API.
//!
//! These exercise the full compile-then-search pipeline across the supported
//! languages, covering the behaviour the crate documents: wildcard binding
//! consistency, any-count runs, regex constraints, and error reporting.

use rstest::{fixture, rstest};

use syngrep_syntax::{
    CompiledPattern, ParseResult, Parser, SupportedLanguage, SyntaxError, search,
};

fn parse(language: SupportedLanguage, source: &str) -> ParseResult {
    let mut parser = Parser::new(language).unwrap_or_else(|err| panic!("parser init: {err}"));
    parser
        .parse(source)
        .unwrap_or_else(|err| panic!("parse: {err}"))
}

/// Fixture providing a parsed Rust corpus with a few call shapes.
#[fixture]
fn rust_calls() -> ParseResult {
    parse(
        SupportedLanguage::Rust,
        "fn main() { f(); f(1); f(1, 2, 3); g(1); }",
    )
}

#[rstest]
fn any_count_wildcard_matches_every_arity(rust_calls: ParseResult) {
    let pattern = CompiledPattern::compile("f($*_)", SupportedLanguage::Rust)
        .unwrap_or_else(|err| panic!("compile: {err}"));

    let texts: Vec<&str> = search(&pattern, &rust_calls)
        .iter()
        .map(syngrep_syntax::Match::text)
        .collect();
    assert_eq!(texts, vec!["f()", "f(1)", "f(1, 2, 3)"]);
}

#[rstest]
fn matches_report_file_positions(rust_calls: ParseResult) {
    let pattern = CompiledPattern::compile("g($_)", SupportedLanguage::Rust)
        .unwrap_or_else(|err| panic!("compile: {err}"));

    let matches = search(&pattern, &rust_calls);
    assert_eq!(matches.len(), 1);
    let Some(m) = matches.first() else {
        panic!("should match");
    };
    assert_eq!(m.start_position().line, 1);
    assert!(m.start_position().column > 1);
}

#[rstest]
#[case(SupportedLanguage::Rust, "fn main() { a.b = a; }", "$x.$_ = $x", 1)]
#[case(SupportedLanguage::Rust, "fn main() { a.b = c; }", "$x.$_ = $x", 0)]
#[case(SupportedLanguage::Python, "a = f(a)\n", "f($x)", 1)]
#[case(SupportedLanguage::TypeScript, "f(a, a);\n", "f($x, $x)", 1)]
#[case(SupportedLanguage::TypeScript, "f(a, b);\n", "f($x, $x)", 0)]
fn name_consistency_across_languages(
    #[case] language: SupportedLanguage,
    #[case] source: &str,
    #[case] pattern: &str,
    #[case] expected: usize,
) {
    let corpus = parse(language, source);
    let compiled = CompiledPattern::compile(pattern, language)
        .unwrap_or_else(|err| panic!("compile: {err}"));
    assert_eq!(search(&compiled, &corpus).len(), expected);
}

#[rstest]
fn regex_constrained_wildcards_select_by_name(rust_calls: ParseResult) {
    let pattern = CompiledPattern::compile("$(_, /f|g/)($*_)", SupportedLanguage::Rust)
        .unwrap_or_else(|err| panic!("compile: {err}"));
    assert_eq!(search(&pattern, &rust_calls).len(), 4);

    let only_g = CompiledPattern::compile("$(_, /g/)($*_)", SupportedLanguage::Rust)
        .unwrap_or_else(|err| panic!("compile: {err}"));
    assert_eq!(search(&only_g, &rust_calls).len(), 1);
}

#[test]
fn compiled_patterns_are_shareable_across_threads() {
    let pattern = CompiledPattern::compile("f($*_)", SupportedLanguage::Rust)
        .unwrap_or_else(|err| panic!("compile: {err}"));

    std::thread::scope(|scope| {
        for source in ["fn a() { f(1); }", "fn b() { f(2, 3); }"] {
            let pattern = &pattern;
            scope.spawn(move || {
                let corpus = parse(SupportedLanguage::Rust, source);
                assert_eq!(search(pattern, &corpus).len(), 1);
            });
        }
    });
}

#[test]
fn tokenize_errors_carry_original_positions() {
    let Err(err) = CompiledPattern::compile("foo($", SupportedLanguage::Rust) else {
        panic!("should fail");
    };
    assert!(matches!(err, SyntaxError::Tokenize { .. }));
    let Some(position) = err.position() else {
        panic!("tokenize errors carry a position");
    };
    assert_eq!(position.line, 1);
    assert_eq!(position.column, 5);
}

#[test]
fn compile_errors_are_corrected_for_wildcard_inflation() {
    // The pattern is ten bytes; whatever the grammar blames, the reported
    // column must stay within the original text even though the encoded
    // wildcard is eleven bytes longer.
    let Err(err) = CompiledPattern::compile("$x + foo(", SupportedLanguage::Rust) else {
        panic!("should fail");
    };
    let Some(position) = err.position() else {
        panic!("compile errors carry a position");
    };
    assert_eq!(position.line, 1);
    assert!(
        position.column <= 12,
        "column {} reported against the rewritten text",
        position.column
    );
}

#[test]
fn zero_wildcard_patterns_degrade_to_structural_equality() {
    let corpus = parse(
        SupportedLanguage::Rust,
        "fn main() { baz(1, 2); baz(2, 1); }",
    );
    let pattern = CompiledPattern::compile("baz(1, 2)", SupportedLanguage::Rust)
        .unwrap_or_else(|err| panic!("compile: {err}"));

    let matches = search(&pattern, &corpus);
    assert_eq!(matches.len(), 1);
    let Some(m) = matches.first() else {
        panic!("should match");
    };
    assert_eq!(m.text(), "baz(1, 2)");
}
