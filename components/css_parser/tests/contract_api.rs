//! Contract tests for the css_parser API

use core_types::{Diagnostics, ErrorCode};
use css_parser::{minify, parse, tokenize, Item, StyleGenerator, StyleSettings, TokenKind};
use js_parser::ScriptSettings;
use proptest::prelude::*;

fn run(source: &str) -> (String, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let output = minify(source, &StyleSettings::default(), &ScriptSettings::default(), &mut diagnostics);
    (output, diagnostics)
}

// =============================================================================
// Stage Contract Tests
// =============================================================================

#[test]
fn test_tokenize_parse_generate() {
    let mut diagnostics = Diagnostics::new();
    let sheet = parse(tokenize("p { padding: 0.5em 0em }", None), &mut diagnostics);
    assert!(matches!(sheet.items.as_slice(), [Item::Rule(_)]));
    let settings = StyleSettings::default();
    let script = ScriptSettings::default();
    let output = StyleGenerator::new(&settings, &script, &mut diagnostics).generate(&sheet);
    assert_eq!(output, "p{padding:.5em 0}");
}

#[test]
fn test_tokenizer_reaches_eof() {
    let mut tokenizer = tokenize("a{}", None);
    let mut count = 0;
    while tokenizer.next_token().kind != TokenKind::Eof {
        count += 1;
    }
    assert_eq!(count, 3);
}

#[test]
fn test_file_name_in_diagnostics() {
    let mut diagnostics = Diagnostics::new();
    let settings = StyleSettings::default().with_file_name("theme.css");
    minify("a{color:red}}", &settings, &ScriptSettings::default(), &mut diagnostics);
    let reported: Vec<String> = diagnostics.iter().map(ToString::to_string).collect();
    assert_eq!(reported, vec!["theme.css(1,13-1,14): error UnbalancedBrace: Unexpected '}'".to_string()]);
}

// =============================================================================
// Minification Scenarios
// =============================================================================

#[test]
fn test_typical_stylesheet() {
    let source = "/* layout */\n\
                  body {\n    margin: 0px;\n    font: 14px/1.4 \"Helvetica Neue\", Arial;\n}\n\n\
                  .nav > li:hover a { color: #FF0000; background-color: rgb(0, 0, 0); }\n\
                  .empty { }\n";
    let (output, diagnostics) = run(source);
    assert_eq!(
        output,
        "body{margin:0;font:14px/1.4 \"Helvetica Neue\",Arial}.nav>li:hover a{color:#f00;background-color:#000}"
    );
    assert!(diagnostics.is_empty());
}

#[test]
fn test_errors_do_not_stop_minification() {
    let (output, diagnostics) = run("a { color red; top: 1px }\nb { left: 0 }\n}");
    assert_eq!(output, "a{top:1px}b{left:0}");
    let codes: Vec<ErrorCode> = diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::UnexpectedStyleToken, ErrorCode::UnbalancedBrace]);
}

#[test]
fn test_expression_errors_are_reported_on_stylesheet_lines() {
    let (output, diagnostics) = run("a {\n  width: expression(1 +);\n}");
    assert_eq!(output, "a{width:expression(1 +)}");
    assert!(diagnostics.iter().any(|d| d.is_error() && d.start_line == 2));
}

// =============================================================================
// Properties
// =============================================================================

fn declaration() -> impl Strategy<Value = String> {
    let property = prop::sample::select(vec!["color", "margin", "padding", "width", "flex", "opacity"]);
    let value = prop::sample::select(vec![
        "0px", "0.50", "#AABBCC", "rgb(255, 255, 255)", "1px solid red", "calc(100% - 0px)", "1 1 0px",
        "auto", "10.0em",
    ]);
    (property, value, any::<bool>()).prop_map(|(property, value, important)| {
        format!("{}: {}{}", property, value, if important { " !important" } else { "" })
    })
}

fn rule() -> impl Strategy<Value = String> {
    let selector = prop::sample::select(vec!["a", "ul > li", ".x .y", "#main", "a:hover, b"]);
    (selector, prop::collection::vec(declaration(), 0..4))
        .prop_map(|(selector, declarations)| format!("{} {{ {} }}", selector, declarations.join("; ")))
}

proptest! {
    #[test]
    fn prop_minify_is_idempotent(rules in prop::collection::vec(rule(), 0..6)) {
        let source = rules.join("\n");
        let (once, diagnostics) = run(&source);
        prop_assert!(diagnostics.is_empty());
        let (twice, _) = run(&once);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_arbitrary_input_never_panics(source in "[a-z{};:#.0-9 '\"/*()!@-]{0,60}") {
        let _ = run(&source);
    }
}
