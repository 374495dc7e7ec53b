//! End-to-End CLI Integration Tests
//!
//! Drives the CLI library from parsed arguments to files on disk.

use clap::Parser as ClapParser;
use minify_cli::{render_diagnostics, Cli, Runner};
use std::fs;
use tempfile::TempDir;

fn run(args: &[&str]) -> minifier::MinifyResult {
    let cli = Cli::try_parse_from(args).expect("arguments should parse");
    let mut runner = Runner::from_cli(&cli).expect("runner should build");
    runner.execute(&cli).expect("run should succeed")
}

/// Test: script with defines and renaming disabled
#[test]
fn test_e2e_script_with_flags() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("app.js");
    let output = dir.path().join("out.js");
    fs::write(&input, "///#IFDEF DEBUG\nreport(level);\n///#ENDIF\nfunction start(level) {\n  run(level);\n}\n").unwrap();

    let result = run(&[
        "corten-minify",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--no-rename",
        "-D",
        "DEBUG",
    ]);

    assert!(result.is_success());
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "report(level);function start(level){run(level)}"
    );
}

/// Test: warning level flag surfaces undeclared names with the file path
#[test]
fn test_e2e_warning_level_and_json_report() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("lib.js");
    let output = dir.path().join("lib.min.js");
    fs::write(&input, "helper();\n").unwrap();

    let result = run(&[
        "corten-minify",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "-w",
        "3",
    ]);

    assert_eq!(result.diagnostics.len(), 1);
    let text = render_diagnostics(&result, false).unwrap();
    assert!(text.contains("lib.js(1,1-1,7): warning UndeclaredVariable"));

    let json = render_diagnostics(&result, true).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[0]["code"], "UndeclaredVariable");
    assert_eq!(parsed[0]["severity"], 3);
}

/// Test: JSON extension selects JSON re-serialization
#[test]
fn test_e2e_json_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("package.json");
    let output = dir.path().join("package.min.json");
    fs::write(&input, "{\n  \"name\": \"corten\",\n  \"version\": \"0.1.0\"\n}\n").unwrap();

    run(&["corten-minify", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);

    assert_eq!(fs::read_to_string(&output).unwrap(), "{\"name\":\"corten\",\"version\":\"0.1.0\"}");
}

/// Test: pretty stylesheet output from a config file
#[test]
fn test_e2e_stylesheet_config_pretty() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("site.css");
    let output = dir.path().join("site.out.css");
    let settings = dir.path().join("settings.json");
    fs::write(&input, "a { color: #FFFFFF }").unwrap();
    fs::write(&settings, r#"{"style": {"shortenColors": false}}"#).unwrap();

    run(&[
        "corten-minify",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--config",
        settings.to_str().unwrap(),
        "--pretty",
    ]);

    assert_eq!(fs::read_to_string(&output).unwrap(), "a{\n  color:#FFFFFF;\n}");
}
