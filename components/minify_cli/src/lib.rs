//! Minifier CLI Library
//!
//! Argument parsing, configuration loading and the run loop behind the
//! `corten-minify` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod error;
pub mod runner;

pub use cli::{Cli, InputKind};
pub use config::Config;
pub use error::{CliError, CliResult};
pub use runner::{render_diagnostics, Runner};
