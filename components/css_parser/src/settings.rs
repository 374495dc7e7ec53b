//! Stylesheet minification settings

use serde::Deserialize;

/// Immutable configuration snapshot for one stylesheet minification.
///
/// ```
/// use css_parser::StyleSettings;
///
/// let settings: StyleSettings =
///     serde_json::from_str(r#"{ "collapseWhitespace": false }"#).unwrap();
///
/// assert!(!settings.collapse_whitespace);
/// assert!(settings.minify_expressions);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleSettings {
    /// Only diagnostics with `severity <= warning_level` are returned
    pub warning_level: u32,
    /// Name used in diagnostics
    pub file_name: Option<String>,
    /// Emit everything on one line with no optional whitespace
    pub collapse_whitespace: bool,
    /// Run `expression(...)` values through the script minifier
    pub minify_expressions: bool,
    /// Keep `/*! ... */` comments in the output
    pub preserve_important_comments: bool,
    /// Keep the semicolon after the last declaration of a block
    pub term_semicolons: bool,
    /// Rewrite colors to their shortest hex form
    pub shorten_colors: bool,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            warning_level: 0,
            file_name: None,
            collapse_whitespace: true,
            minify_expressions: true,
            preserve_important_comments: true,
            term_semicolons: false,
            shorten_colors: true,
        }
    }
}

impl StyleSettings {
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
}
