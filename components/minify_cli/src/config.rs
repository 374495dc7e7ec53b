//! Settings file loading and flag overrides
//!
//! A settings file is a JSON object with optional `script` and `style`
//! sections using the camelCase field names of the settings types:
//!
//! ```json
//! { "script": { "localRenaming": false }, "style": { "shortenColors": false } }
//! ```

use crate::cli::{Cli, InputKind};
use crate::error::{CliError, CliResult};
use minifier::{OutputFormat, ScriptSettings, StyleSettings};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Script and stylesheet settings for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Script pipeline settings, also used for `expression(...)` values
    pub script: ScriptSettings,
    /// Stylesheet pipeline settings
    pub style: StyleSettings,
}

impl Config {
    /// Read a settings file
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The settings file named by `--config`, or defaults, with flags applied
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(cli)?;
        Ok(config)
    }

    /// Apply command-line flags on top of the loaded settings
    pub fn apply(&mut self, cli: &Cli) -> CliResult<()> {
        if cli.input_kind() == InputKind::Json {
            self.script.format = OutputFormat::Json;
        }
        if cli.no_rename {
            self.script.local_renaming = false;
        }
        if cli.pretty {
            self.script.collapse_whitespace = false;
            self.style.collapse_whitespace = false;
        }
        if cli.preprocess_only {
            self.script.preprocess_only = true;
        }
        if let Some(level) = cli.warning_level {
            self.script.warning_level = level;
            self.style.warning_level = level;
        }
        for define in &cli.defines {
            let (name, value) = define.split_once('=').unwrap_or((define.as_str(), ""));
            let name = name.trim();
            if name.is_empty() {
                return Err(CliError::InvalidDefine(define.clone()));
            }
            self.script.defines.insert(name.to_string(), value.to_string());
        }
        if let Some(name) = cli.display_name() {
            self.script.file_name = Some(name.clone());
            self.style.file_name = Some(name);
        }
        Ok(())
    }
}
