//! End-to-end behavior of the minifier facade

use core_types::{Diagnostics, ErrorCode};
use js_parser::{declare_scopes, parse, resolve_references, tokenize, ScopeId};
use minifier::{minify_javascript, Minifier, Outcome, ScriptSettings, StyleSettings};
use proptest::prelude::*;

// =============================================================================
// Script Scenarios
// =============================================================================

#[test]
fn test_block_var_shares_global_field() {
    let source = "var x = 1; { var x = 2; }";
    let result = minify_javascript(source);
    assert_eq!(result.output, "var x=1;{var x=2}");
    assert!(result.diagnostics.is_empty());

    let settings = ScriptSettings::default();
    let mut diagnostics = Diagnostics::new();
    let mut program = parse(tokenize(source, None), &settings, &mut diagnostics);
    let mut tree = declare_scopes(&mut program, &settings, &mut diagnostics);
    resolve_references(&mut program, &mut tree, &settings, &mut diagnostics);
    let named_x = tree.fields().filter(|(_, field)| field.name == "x").count();
    assert_eq!(named_x, 1);
    assert!(tree.scope(ScopeId::GLOBAL).get("x").is_some());
}

#[test]
fn test_blocks_kept_as_written() {
    let result = minify_javascript("function f(){ if(true){ return 1 } }");
    assert_eq!(result.output, "function f(){if(true){return 1}}");
    assert_eq!(result.status, Outcome::Success);
}

#[test]
fn test_unterminated_string_recovers() {
    let result = minify_javascript("x = \"abc\ny();\nz();");
    assert_eq!(result.output, "y();z()");
    assert_eq!(result.diagnostics.len(), 1);
    let error = &result.diagnostics[0];
    assert_eq!(error.severity, 0);
    assert_eq!(error.code, ErrorCode::UnterminatedString);
    assert_eq!((error.start_line, error.start_column), (1, 5));
}

#[test]
fn test_undeclared_warnings_need_a_higher_level() {
    let mut minifier = Minifier::new().with_warning_level(3);
    let result = minifier.minify_script("x = \"abc\ny();\nz();", &ScriptSettings::default());
    let codes: Vec<ErrorCode> = result.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes[0], ErrorCode::UnterminatedString);
    assert!(codes.len() > 1);
    assert!(codes[1..].iter().all(|code| *code == ErrorCode::UndeclaredVariable));
    assert_eq!(result.errors().count(), 1);
}

#[test]
fn test_defines_reach_the_preprocessor() {
    let source = "///#IFDEF DEBUG\nconsole.log('debug');\n///#ENDIF\nrun();";
    assert_eq!(minify_javascript(source).output, "run()");
    let settings = ScriptSettings::default().with_define("DEBUG", "");
    let result = Minifier::new().minify_script(source, &settings);
    assert_eq!(result.output, "console.log(\"debug\");run()");
}

#[test]
fn test_important_comment_survives() {
    let result = minify_javascript("/*! (c) Corten */\n// gone\nvar a = 1;");
    assert_eq!(result.output, "/*! (c) Corten */\nvar a=1");
}

// =============================================================================
// JSON Scenarios
// =============================================================================

#[test]
fn test_json_reserialized_compactly() {
    let result = Minifier::new().minify_script("{\"a\": 1, \"b\": [1,2,3]}", &ScriptSettings::json());
    assert_eq!(result.output, "{\"a\":1,\"b\":[1,2,3]}");
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.status, Outcome::Success);
}

#[test]
fn test_json_function_value_is_fatal() {
    let mut minifier = Minifier::new();
    let result = minifier.minify_script("{\"a\": function(){}}", &ScriptSettings::json());
    assert_eq!(result.output, "");
    assert_eq!(result.status, Outcome::Fatal);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "function expression is not a valid JSON value");
    assert_eq!(minifier.errors().len(), 1);
}

// =============================================================================
// Stylesheet Scenarios
// =============================================================================

#[test]
fn test_stylesheet_expression_uses_script_pipeline() {
    let result = Minifier::new().minify_stylesheet(
        "div { width: expression( document.body.clientWidth > 800 ? \"800px\" : \"auto\" ); }",
        &StyleSettings::default(),
        &ScriptSettings::default(),
    );
    assert_eq!(result.output, "div{width:expression(document.body.clientWidth>800?\"800px\":\"auto\")}");
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_stylesheet_warning_level_override() {
    let mut minifier = Minifier::new().with_warning_level(3);
    let result = minifier.minify_stylesheet(
        "a { width: expression(size()) }",
        &StyleSettings::default(),
        &ScriptSettings::default(),
    );
    assert_eq!(result.output, "a{width:expression(size())}");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, ErrorCode::UndeclaredVariable);
}

// =============================================================================
// Properties
// =============================================================================

fn statement() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "var total = 0;",
        "function add(first, second) { return first + second; }",
        "if (total > 1) { total = add(total, 2); } else total--;",
        "for (var i = 0; i < 10; i++) { total += i * 0.50; }",
        "var label = 'it\\'s';",
        "(function (w) { var inner = w.x; return inner; })(this);",
        "var list = [1, , 3], map = { a: 1, 'b c': 2 };",
        "try { add(1) } catch (err) { total = err; } finally { total = 1e3; }",
    ])
    .prop_map(str::to_string)
}

proptest! {
    #[test]
    fn prop_script_minify_is_idempotent(statements in prop::collection::vec(statement(), 0..8)) {
        let source = statements.join("\n");
        let once = minify_javascript(&source);
        prop_assert!(once.is_success());
        prop_assert_eq!(once.errors().count(), 0);
        let twice = minify_javascript(&once.output);
        prop_assert_eq!(twice.output, once.output);
    }

    #[test]
    fn prop_arbitrary_script_never_panics(source in "[a-z0-9{}();=+'\"/*!,. \n-]{0,60}") {
        let _ = minify_javascript(&source);
    }
}
