//! Script minification settings

use serde::Deserialize;
use std::collections::BTreeMap;

/// Which output visitor the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    /// Minified JavaScript
    #[default]
    Normal,
    /// Strict JSON; anything that is not a JSON value is a fatal error
    Json,
}

/// Immutable configuration snapshot for one script minification.
///
/// Every stage borrows the same snapshot. Settings can be built in code or
/// read from a JSON settings file:
///
/// ```
/// use js_parser::{OutputFormat, ScriptSettings};
///
/// let settings: ScriptSettings =
///     serde_json::from_str(r#"{ "format": "json", "warningLevel": 2 }"#).unwrap();
///
/// assert_eq!(settings.format, OutputFormat::Json);
/// assert_eq!(settings.warning_level, 2);
/// assert!(settings.local_renaming);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScriptSettings {
    /// Output visitor selection
    pub format: OutputFormat,
    /// Stop after the preprocessor and return its text
    pub preprocess_only: bool,
    /// Only diagnostics with `severity <= warning_level` are returned
    pub warning_level: u32,
    /// Name used in diagnostics
    pub file_name: Option<String>,
    /// Give function-local bindings short generated names
    pub local_renaming: bool,
    /// Emit everything on one line with no optional whitespace
    pub collapse_whitespace: bool,
    /// Keep `/*! ... */` comments in the output
    pub preserve_important_comments: bool,
    /// End the output with a semicolon
    pub term_semicolons: bool,
    /// Preprocessor symbols, with optional replacement values
    pub defines: BTreeMap<String, String>,
    /// Extra global names that are not reported as undeclared
    pub known_globals: Vec<String>,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Normal,
            preprocess_only: false,
            warning_level: 0,
            file_name: None,
            local_renaming: true,
            collapse_whitespace: true,
            preserve_important_comments: true,
            term_semicolons: false,
            defines: BTreeMap::new(),
            known_globals: Vec::new(),
        }
    }
}

impl ScriptSettings {
    /// Settings for JSON validation and re-serialization.
    pub fn json() -> Self {
        Self {
            format: OutputFormat::Json,
            ..Self::default()
        }
    }

    /// Set the file name used in diagnostics
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Set the warning level
    pub fn with_warning_level(mut self, level: u32) -> Self {
        self.warning_level = level;
        self
    }

    /// Define a preprocessor symbol
    pub fn with_define(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defines.insert(name.into(), value.into());
        self
    }
}
