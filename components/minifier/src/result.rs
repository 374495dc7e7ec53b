//! What a minification call hands back

use core_types::{ContextError, Diagnostics};
use serde::Serialize;

/// Whether a call produced usable output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Output is usable; diagnostics may still contain errors the pipeline
    /// recovered from
    Success,
    /// The engine gave up; output is empty and the first diagnostic says why
    Fatal,
}

/// Output text plus the diagnostics that passed the warning level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinifyResult {
    /// Minified text, empty when `status` is [`Outcome::Fatal`]
    pub output: String,
    /// Diagnostics with `severity <= warning_level`, fatal entry first
    pub diagnostics: Vec<ContextError>,
    /// Outcome of the call
    pub status: Outcome,
}

impl MinifyResult {
    pub(crate) fn finish(output: String, diagnostics: Diagnostics, warning_level: u32) -> Self {
        let status = if diagnostics.has_fatal() {
            Outcome::Fatal
        } else {
            Outcome::Success
        };
        let output = match status {
            Outcome::Success => output,
            Outcome::Fatal => String::new(),
        };
        Self {
            output,
            diagnostics: diagnostics.finish(warning_level),
            status,
        }
    }

    /// Whether the output is usable
    pub fn is_success(&self) -> bool {
        self.status == Outcome::Success
    }

    /// Severity 0 diagnostics
    pub fn errors(&self) -> impl Iterator<Item = &ContextError> {
        self.diagnostics.iter().filter(|error| error.is_error())
    }
}
