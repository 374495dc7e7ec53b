//! Minifier facade
//!
//! One [`Minifier`] call runs one pipeline over one input with fresh
//! diagnostics. Nothing carries over between calls except the overrides
//! and the error list of the most recent call.

use crate::result::MinifyResult;
use core_types::{ContextError, Diagnostics};
use css_parser::StyleSettings;
use js_parser::{
    declare_scopes, parse, preprocess, rename_locals, resolve_references, tokenize, CodeGenerator,
    JsonGenerator, OutputFormat, ScriptSettings,
};

/// Entry point for script and stylesheet minification.
///
/// # Examples
///
/// ```
/// use js_parser::ScriptSettings;
/// use minifier::{Minifier, Outcome};
///
/// let mut minifier = Minifier::new();
/// let result = minifier.minify_script("var answer = 6 * 7;", &ScriptSettings::default());
///
/// assert_eq!(result.status, Outcome::Success);
/// assert_eq!(result.output, "var answer=6*7");
/// ```
#[derive(Debug, Default)]
pub struct Minifier {
    /// Replaces the settings' file name in diagnostics when set
    pub file_name: Option<String>,
    /// Replaces the settings' warning level when set
    pub warning_level: Option<u32>,
    error_list: Vec<ContextError>,
}

impl Minifier {
    /// Create a minifier with no overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Report diagnostics against `name`
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Keep diagnostics up to `level`
    pub fn with_warning_level(mut self, level: u32) -> Self {
        self.warning_level = Some(level);
        self
    }

    /// Minify a script.
    ///
    /// With [`OutputFormat::Json`] the input must be a single JSON value;
    /// anything else yields a fatal result with empty output.
    pub fn minify_script(&mut self, source: &str, settings: &ScriptSettings) -> MinifyResult {
        let settings = ScriptSettings {
            file_name: self.file_name.clone().or_else(|| settings.file_name.clone()),
            warning_level: self.warning_level.unwrap_or(settings.warning_level),
            ..settings.clone()
        };
        log::debug!(
            "minifying script {} ({} bytes, {:?})",
            settings.file_name.as_deref().unwrap_or("<input>"),
            source.len(),
            settings.format
        );

        let mut diagnostics = Diagnostics::new();
        let output = run_script(source, &settings, &mut diagnostics);
        self.record(MinifyResult::finish(output, diagnostics, settings.warning_level))
    }

    /// Minify a stylesheet. `script` configures `expression(...)` values.
    pub fn minify_stylesheet(
        &mut self,
        source: &str,
        settings: &StyleSettings,
        script: &ScriptSettings,
    ) -> MinifyResult {
        let settings = StyleSettings {
            file_name: self.file_name.clone().or_else(|| settings.file_name.clone()),
            warning_level: self.warning_level.unwrap_or(settings.warning_level),
            ..settings.clone()
        };
        log::debug!(
            "minifying stylesheet {} ({} bytes)",
            settings.file_name.as_deref().unwrap_or("<input>"),
            source.len()
        );

        let mut diagnostics = Diagnostics::new();
        let output = css_parser::minify(source, &settings, script, &mut diagnostics);
        self.record(MinifyResult::finish(output, diagnostics, settings.warning_level))
    }

    /// Diagnostics of the most recent call
    pub fn error_list(&self) -> &[ContextError] {
        &self.error_list
    }

    /// Diagnostics of the most recent call, formatted for display
    pub fn errors(&self) -> Vec<String> {
        self.error_list.iter().map(ToString::to_string).collect()
    }

    fn record(&mut self, result: MinifyResult) -> MinifyResult {
        if !result.is_success() {
            let first = result
                .diagnostics
                .first()
                .map_or_else(String::new, ToString::to_string);
            log::warn!("minification failed: {}", first);
        }
        self.error_list = result.diagnostics.clone();
        result
    }
}

fn run_script(source: &str, settings: &ScriptSettings, diagnostics: &mut Diagnostics) -> String {
    let preprocessed = preprocess(source, settings, diagnostics);
    if settings.preprocess_only {
        return preprocessed.compact;
    }

    let lexer = tokenize(&preprocessed.text, settings.file_name.as_deref());
    let mut program = parse(lexer, settings, diagnostics);
    match settings.format {
        OutputFormat::Json => JsonGenerator::new(diagnostics).generate(&program),
        OutputFormat::Normal => {
            let mut scopes = declare_scopes(&mut program, settings, diagnostics);
            resolve_references(&mut program, &mut scopes, settings, diagnostics);
            if settings.local_renaming {
                rename_locals(&mut scopes);
            }
            CodeGenerator::new(settings, Some(&scopes)).generate(&program)
        }
    }
}

/// Minify a script with default settings
pub fn minify_javascript(source: &str) -> MinifyResult {
    Minifier::new().minify_script(source, &ScriptSettings::default())
}

/// Minify a stylesheet with default settings
pub fn minify_css(source: &str) -> MinifyResult {
    Minifier::new().minify_stylesheet(source, &StyleSettings::default(), &ScriptSettings::default())
}
