//! Command-line arguments

use clap::Parser as ClapParser;
use std::path::{Path, PathBuf};

/// Which pipeline handles the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Script pipeline, normal output
    Script,
    /// Script pipeline, JSON validation and re-serialization
    Json,
    /// Stylesheet pipeline
    Style,
}

/// Corten minifier for scripts, JSON and stylesheets
#[derive(Debug, ClapParser)]
#[command(name = "corten-minify")]
#[command(version = "0.1.0")]
#[command(about = "Minify JavaScript, JSON and CSS", long_about = None)]
pub struct Cli {
    /// Input file; standard input when omitted
    pub file: Option<PathBuf>,

    /// Write output here instead of standard output
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Treat the input as a stylesheet
    #[arg(long, conflicts_with = "json")]
    pub css: bool,

    /// Treat the input as a single JSON value
    #[arg(long)]
    pub json: bool,

    /// JSON settings file with optional `script` and `style` sections
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Keep diagnostics with severity up to this level
    #[arg(short, long)]
    pub warning_level: Option<u32>,

    /// Keep local names as written
    #[arg(long)]
    pub no_rename: bool,

    /// Multi-line output
    #[arg(long)]
    pub pretty: bool,

    /// Stop after the preprocessor
    #[arg(long)]
    pub preprocess_only: bool,

    /// Preprocessor symbol, as NAME or NAME=VALUE
    #[arg(short = 'D', long = "define", value_name = "NAME[=VALUE]")]
    pub defines: Vec<String>,

    /// Print diagnostics as JSON
    #[arg(long)]
    pub diagnostics_json: bool,

    /// Log pipeline stages to standard error
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Pipeline for this invocation. Flags win over the file extension.
    pub fn input_kind(&self) -> InputKind {
        if self.css {
            return InputKind::Style;
        }
        if self.json {
            return InputKind::Json;
        }
        match self.file.as_deref().and_then(Path::extension).and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("css") => InputKind::Style,
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputKind::Json,
            _ => InputKind::Script,
        }
    }

    /// Name reported in diagnostics
    pub fn display_name(&self) -> Option<String> {
        self.file.as_ref().map(|path| path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(parse(&["corten-minify", "site.CSS"]).input_kind(), InputKind::Style);
        assert_eq!(parse(&["corten-minify", "data.json"]).input_kind(), InputKind::Json);
        assert_eq!(parse(&["corten-minify", "app.js"]).input_kind(), InputKind::Script);
        assert_eq!(parse(&["corten-minify"]).input_kind(), InputKind::Script);
    }

    #[test]
    fn test_flag_overrides_extension() {
        assert_eq!(parse(&["corten-minify", "--css", "app.js"]).input_kind(), InputKind::Style);
        assert_eq!(parse(&["corten-minify", "--json", "app.js"]).input_kind(), InputKind::Json);
    }

    #[test]
    fn test_css_and_json_conflict() {
        assert!(Cli::try_parse_from(["corten-minify", "--css", "--json"]).is_err());
    }
}
