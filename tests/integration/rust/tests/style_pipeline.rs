//! Stylesheet pipeline and its hand-off to the script pipeline

use core_types::{Diagnostics, ErrorCode};
use css_parser::{parse, tokenize, StyleGenerator, StyleSettings};
use js_parser::ScriptSettings;
use minifier::{minify_css, Minifier, Outcome};

/// Test: stage-by-stage run matches the facade
#[test]
fn test_stages_match_facade() {
    let source = "/*! theme */\n@media screen and (max-width: 600px) {\n  .col { width: 100.0%; padding: 0px 0.5em; }\n}\n";
    let settings = StyleSettings::default();
    let script = ScriptSettings::default();
    let mut diagnostics = Diagnostics::new();

    let tokenizer = tokenize(source, None).with_important_comments(true);
    let sheet = parse(tokenizer, &mut diagnostics);
    let staged = StyleGenerator::new(&settings, &script, &mut diagnostics).generate(&sheet);

    assert_eq!(staged, minify_css(source).output);
    assert!(diagnostics.is_empty());
}

/// Test: expression values go through the script minifier
#[test]
fn test_expression_values_minified() {
    let result = minify_css("p { height: expression( this.parentNode.offsetHeight / 2 + \"px\" ); }");
    assert_eq!(result.output, "p{height:expression(this.parentNode.offsetHeight/2+\"px\")}");
    assert_eq!(result.status, Outcome::Success);
}

/// Test: script errors inside a stylesheet point at stylesheet lines
#[test]
fn test_expression_error_positions() {
    let mut minifier = Minifier::new().with_file_name("legacy.css");
    let result = minifier.minify_stylesheet(
        "a { color: red; }\nb {\n  width: expression(1 +);\n}\n",
        &StyleSettings::default(),
        &ScriptSettings::default(),
    );
    assert_eq!(result.output, "a{color:red}b{width:expression(1 +)}");
    assert!(result.errors().count() > 0);
    assert!(result
        .errors()
        .any(|error| error.file_name == "legacy.css" && error.start_line == 3));
}

/// Test: expression minification can be switched off
#[test]
fn test_expression_minification_toggle() {
    let settings = StyleSettings {
        minify_expressions: false,
        ..StyleSettings::default()
    };
    let result = Minifier::new().minify_stylesheet(
        "p { top: expression( a + b ) }",
        &settings,
        &ScriptSettings::default(),
    );
    assert_eq!(result.output, "p{top:expression(a + b)}");
}

/// Test: recovery keeps later rules
#[test]
fn test_recovery_keeps_later_rules() {
    let result = minify_css("a { : red; color: blue }\n}\nb { margin: 0 0 0 0 }");
    assert_eq!(result.output, "a{color:blue}b{margin:0 0 0 0}");
    let codes: Vec<ErrorCode> = result.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::UnexpectedStyleToken, ErrorCode::UnbalancedBrace]);
}
