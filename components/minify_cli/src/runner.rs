//! Run loop: read input, minify, write output

use crate::cli::{Cli, InputKind};
use crate::config::Config;
use crate::error::CliResult;
use minifier::{Minifier, MinifyResult};
use std::fs;
use std::io::{self, Read, Write};

/// One configured minification run
#[derive(Debug)]
pub struct Runner {
    config: Config,
    kind: InputKind,
    minifier: Minifier,
}

impl Runner {
    /// Create a runner for the given settings and pipeline
    pub fn new(config: Config, kind: InputKind) -> Self {
        Self {
            config,
            kind,
            minifier: Minifier::new(),
        }
    }

    /// Create a runner from parsed arguments, loading `--config` if given
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        Ok(Self::new(Config::from_cli(cli)?, cli.input_kind()))
    }

    /// Minify `source` with the configured pipeline
    pub fn minify(&mut self, source: &str) -> MinifyResult {
        log::debug!("running {:?} pipeline", self.kind);
        match self.kind {
            InputKind::Script | InputKind::Json => self.minifier.minify_script(source, &self.config.script),
            InputKind::Style => self
                .minifier
                .minify_stylesheet(source, &self.config.style, &self.config.script),
        }
    }

    /// Read the input named by `cli`, minify it and write the output.
    ///
    /// Nothing is written when the result is fatal.
    pub fn execute(&mut self, cli: &Cli) -> CliResult<MinifyResult> {
        let source = match &cli.file {
            Some(path) => fs::read_to_string(path)?,
            None => {
                let mut text = String::new();
                io::stdin().read_to_string(&mut text)?;
                text
            }
        };
        let result = self.minify(&source);
        if result.is_success() {
            match &cli.output {
                Some(path) => fs::write(path, &result.output)?,
                None => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(result.output.as_bytes())?;
                    stdout.write_all(b"\n")?;
                    stdout.flush()?;
                }
            }
        }
        Ok(result)
    }
}

/// Diagnostics as display lines, or as one JSON array
pub fn render_diagnostics(result: &MinifyResult, json: bool) -> CliResult<String> {
    if json {
        return Ok(serde_json::to_string_pretty(&result.diagnostics)?);
    }
    Ok(result
        .diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_and_style_pipelines() {
        let mut script = Runner::new(Config::default(), InputKind::Script);
        assert_eq!(script.minify("var  a = [ 1 , 2 ];").output, "var a=[1,2]");
        let mut style = Runner::new(Config::default(), InputKind::Style);
        assert_eq!(style.minify("a { top : 0px ; }").output, "a{top:0}");
    }

    #[test]
    fn test_render_text_lines() {
        let mut runner = Runner::new(Config::default(), InputKind::Style);
        let result = runner.minify("a{}}\nb{}}");
        assert_eq!(
            render_diagnostics(&result, false).unwrap(),
            "(1,4-1,5): error UnbalancedBrace: Unexpected '}'\n(2,4-2,5): error UnbalancedBrace: Unexpected '}'"
        );
    }

    #[test]
    fn test_render_json() {
        let mut runner = Runner::new(Config::default(), InputKind::Script);
        let result = runner.minify("a();");
        assert_eq!(render_diagnostics(&result, true).unwrap(), "[]");
    }
}
