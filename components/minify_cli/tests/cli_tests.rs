//! CLI argument parsing and file round trips

use clap::Parser as ClapParser;
use minify_cli::{Cli, CliError, Config, InputKind, Runner};
use std::fs;
use tempfile::TempDir;

/// Test parsing no arguments (default behavior)
#[test]
fn cli_parse_no_args() {
    let cli = Cli::try_parse_from(["corten-minify"]).unwrap();

    assert_eq!(cli.file, None);
    assert_eq!(cli.output, None);
    assert_eq!(cli.warning_level, None);
    assert!(!cli.no_rename);
    assert!(!cli.verbose);
    assert!(!cli.diagnostics_json);
    assert_eq!(cli.input_kind(), InputKind::Script);
}

/// Test parsing every long option together
#[test]
fn cli_parse_all_options() {
    let cli = Cli::try_parse_from([
        "corten-minify",
        "in.js",
        "--output",
        "out.js",
        "--config",
        "settings.json",
        "--warning-level",
        "3",
        "--no-rename",
        "--pretty",
        "--preprocess-only",
        "--define",
        "DEBUG",
        "--diagnostics-json",
        "--verbose",
    ])
    .unwrap();

    assert_eq!(cli.file.as_deref(), Some(std::path::Path::new("in.js")));
    assert_eq!(cli.output.as_deref(), Some(std::path::Path::new("out.js")));
    assert_eq!(cli.warning_level, Some(3));
    assert_eq!(cli.defines, vec!["DEBUG".to_string()]);
    assert!(cli.no_rename && cli.pretty && cli.preprocess_only && cli.diagnostics_json && cli.verbose);
}

/// Test an invalid warning level
#[test]
fn cli_parse_rejects_non_numeric_level() {
    assert!(Cli::try_parse_from(["corten-minify", "-w", "high"]).is_err());
}

/// Test minifying a script file into an output file
#[test]
fn execute_script_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("app.js");
    let output = dir.path().join("app.min.js");
    fs::write(&input, "function greet(name) {\n  return 'hi ' + name;\n}\n").unwrap();

    let cli = Cli::try_parse_from([
        "corten-minify",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ])
    .unwrap();
    let mut runner = Runner::from_cli(&cli).unwrap();
    let result = runner.execute(&cli).unwrap();

    assert!(result.is_success());
    assert_eq!(fs::read_to_string(&output).unwrap(), "function greet(a){return\"hi \"+a}");
}

/// Test that a .css extension selects the stylesheet pipeline
#[test]
fn execute_stylesheet_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("site.css");
    let output = dir.path().join("site.min.css");
    fs::write(&input, "h1 {\n  color: #FF0000;\n  margin: 0px auto;\n}\n").unwrap();

    let cli = Cli::try_parse_from([
        "corten-minify",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ])
    .unwrap();
    let mut runner = Runner::from_cli(&cli).unwrap();
    runner.execute(&cli).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "h1{color:#f00;margin:0 auto}");
}

/// Test that a fatal JSON result leaves no output file behind
#[test]
fn execute_fatal_json_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("data.json");
    let output = dir.path().join("data.min.json");
    fs::write(&input, "{\"handler\": function () {}}").unwrap();

    let cli = Cli::try_parse_from([
        "corten-minify",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ])
    .unwrap();
    let mut runner = Runner::from_cli(&cli).unwrap();
    let result = runner.execute(&cli).unwrap();

    assert!(!result.is_success());
    assert!(result.diagnostics[0].to_string().contains("data.json"));
    assert!(!output.exists());
}

/// Test loading settings from a config file
#[test]
fn config_file_settings_apply() {
    let dir = TempDir::new().unwrap();
    let settings = dir.path().join("settings.json");
    fs::write(&settings, r#"{"script": {"localRenaming": false}}"#).unwrap();

    let cli = Cli::try_parse_from(["corten-minify", "--config", settings.to_str().unwrap()]).unwrap();
    let mut runner = Runner::from_cli(&cli).unwrap();

    assert_eq!(runner.minify("function f(value) { return value; }").output, "function f(value){return value}");
}

/// Test a malformed config file
#[test]
fn config_file_errors_are_reported() {
    let dir = TempDir::new().unwrap();
    let settings = dir.path().join("broken.json");
    fs::write(&settings, "{ not json").unwrap();

    let err = Config::load(&settings).unwrap_err();
    assert!(matches!(err, CliError::Config { .. }));
}

/// Test a missing input file
#[test]
fn execute_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.js");
    let cli = Cli::try_parse_from(["corten-minify", missing.to_str().unwrap()]).unwrap();
    let mut runner = Runner::from_cli(&cli).unwrap();

    assert!(matches!(runner.execute(&cli), Err(CliError::Io(_))));
}
