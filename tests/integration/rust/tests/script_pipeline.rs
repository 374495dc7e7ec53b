//! Script pipeline across component boundaries
//!
//! Preprocessor, lexer, parser, scope analysis and both output visitors,
//! driven both stage by stage and through the minifier facade.

use core_types::{Diagnostics, ErrorCode};
use js_parser::{
    declare_scopes, parse, preprocess, rename_locals, resolve_references, tokenize, CodeGenerator,
    JsonGenerator, ScriptSettings,
};
use minifier::{minify_javascript, Minifier, Outcome};

/// Test: stage-by-stage run matches the facade
#[test]
fn test_stages_match_facade() {
    let source = "///#IFDEF DEBUG\ntrace();\n///#ENDIF\nfunction size(list) {\n  return list.length + list[0];\n}";
    let settings = ScriptSettings::default();
    let mut diagnostics = Diagnostics::new();

    let preprocessed = preprocess(source, &settings, &mut diagnostics);
    let mut program = parse(tokenize(&preprocessed.text, None), &settings, &mut diagnostics);
    let mut tree = declare_scopes(&mut program, &settings, &mut diagnostics);
    resolve_references(&mut program, &mut tree, &settings, &mut diagnostics);
    rename_locals(&mut tree);
    let staged = CodeGenerator::new(&settings, Some(&tree)).generate(&program);

    assert_eq!(staged, minify_javascript(source).output);
    assert_eq!(staged, "function size(a){return a.length+a[0]}");
    assert!(diagnostics.iter().all(|d| !d.is_error()));
}

/// Test: positions survive inactive preprocessor regions
#[test]
fn test_positions_survive_preprocessing() {
    let source = "///#IFDEF DEBUG\nlog();\n///#ENDIF\nvar s = 'open\n;";
    let result = minify_javascript(source);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, ErrorCode::UnterminatedString);
    assert_eq!((result.diagnostics[0].start_line, result.diagnostics[0].start_column), (4, 9));
}

/// Test: errors in one statement leave the rest intact
#[test]
fn test_fault_isolation_across_functions() {
    let source = "function ok(a) { return a; }\nfunction bad() { return 1 +; }\nok(2);";
    let result = minify_javascript(source);
    assert_eq!(result.status, Outcome::Success);
    assert!(result.output.starts_with("function ok(a){return a}"));
    assert!(result.output.ends_with("ok(2)"));
    assert_eq!(result.errors().count(), 1);
    assert_eq!(result.diagnostics[0].start_line, 2);
}

/// Test: JSON visitor over the shared parser
#[test]
fn test_json_visitor_shares_parser() {
    let settings = ScriptSettings::json();
    let mut diagnostics = Diagnostics::new();
    let program = parse(
        tokenize("{ \"name\": \"corten\", \"tags\": [ \"a\", \"b\" ], \"ratio\": 0.50, \"ok\": true }", None),
        &settings,
        &mut diagnostics,
    );
    let output = JsonGenerator::new(&mut diagnostics).generate(&program);
    assert_eq!(output, "{\"name\":\"corten\",\"tags\":[\"a\",\"b\"],\"ratio\":0.5,\"ok\":true}");
    assert!(diagnostics.is_empty());

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["tags"][1], "b");
}

/// Test: JSON rejection leads with a fatal entry
#[test]
fn test_json_rejection_is_fatal() {
    let mut minifier = Minifier::new().with_file_name("data.json");
    let result = minifier.minify_script("[1, 2, f()]", &ScriptSettings::json());
    assert_eq!(result.status, Outcome::Fatal);
    assert!(result.output.is_empty());
    assert!(result.diagnostics[0].is_fatal());
    assert_eq!(result.diagnostics[0].file_name, "data.json");
}

/// Test: one minifier, several inputs, no leaking state
#[test]
fn test_minifier_reuse() {
    let mut minifier = Minifier::new();
    let settings = ScriptSettings::default();

    let first = minifier.minify_script("var a = ;", &settings);
    assert_eq!(first.errors().count(), 1);
    let second = minifier.minify_script("var a = 1;", &settings);
    assert!(second.diagnostics.is_empty());
    assert_eq!(second.output, "var a=1");
    assert!(minifier.error_list().is_empty());
}
