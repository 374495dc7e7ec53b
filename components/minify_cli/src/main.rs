//! Corten Minifier CLI
//!
//! Entry point for the minifier. Parses CLI arguments and delegates to the
//! Runner for execution.

use clap::Parser as ClapParser;
use log::LevelFilter;
use minify_cli::{render_diagnostics, Cli, CliError, Runner};
use simple_logger::SimpleLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    SimpleLogger::new().with_level(level).env().init()?;

    let result = match Runner::from_cli(&cli).and_then(|mut runner| runner.execute(&cli)) {
        Ok(result) => result,
        Err(CliError::Io(e)) => {
            eprintln!("Error: Could not read or write file: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let report = render_diagnostics(&result, cli.diagnostics_json)?;
    if !report.is_empty() {
        eprintln!("{}", report);
    }
    if !result.is_success() {
        std::process::exit(1);
    }

    Ok(())
}
