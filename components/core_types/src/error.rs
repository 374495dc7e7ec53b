//! Structured diagnostics produced by the minifier pipelines.
//!
//! A [`ContextError`] is data, not an exception: stages append them to a
//! [`Diagnostics`](crate::Diagnostics) collection and keep going.

use crate::SourceSpan;
use serde::Serialize;
use std::fmt;

/// The kind of diagnostic.
///
/// The `Display` form is the stable identifier reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    /// A character that cannot start any token
    UnexpectedCharacter,
    /// String literal without a closing quote on the same line
    UnterminatedString,
    /// Block comment without a closing `*/`
    UnterminatedComment,
    /// Template literal without a closing backtick
    UnterminatedTemplate,
    /// Regular expression literal without a closing slash
    UnterminatedRegExp,
    /// Numeric literal that cannot be read
    InvalidNumber,
    /// A statement that does not match the grammar
    SyntaxError,
    /// An expression that does not match the grammar
    BadExpression,
    /// Input ended in the middle of a construct
    UnexpectedEndOfInput,
    /// Left side of an assignment cannot be assigned to
    InvalidAssignmentTarget,
    /// `///#ELSE` or `///#ENDIF` without an open `///#IF`
    UnbalancedDirective,
    /// `///#IF` block still open at end of input
    UnterminatedDirective,
    /// Name declared twice with incompatible kinds in one scope
    DuplicateDeclaration,
    /// Reference that resolves to no declaration
    UndeclaredVariable,
    /// Stylesheet token that is not valid at its position
    UnexpectedStyleToken,
    /// Stylesheet block braces do not balance
    UnbalancedBrace,
    /// JSON output was requested for a tree that is not a JSON value
    InvalidJsonOutput,
    /// The engine reached a state it should never reach
    InternalError,
}

impl ErrorCode {
    /// The identifier reported to callers.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UnexpectedCharacter => "UnexpectedCharacter",
            ErrorCode::UnterminatedString => "UnterminatedString",
            ErrorCode::UnterminatedComment => "UnterminatedComment",
            ErrorCode::UnterminatedTemplate => "UnterminatedTemplate",
            ErrorCode::UnterminatedRegExp => "UnterminatedRegExp",
            ErrorCode::InvalidNumber => "InvalidNumber",
            ErrorCode::SyntaxError => "SyntaxError",
            ErrorCode::BadExpression => "BadExpression",
            ErrorCode::UnexpectedEndOfInput => "UnexpectedEndOfInput",
            ErrorCode::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ErrorCode::UnbalancedDirective => "UnbalancedDirective",
            ErrorCode::UnterminatedDirective => "UnterminatedDirective",
            ErrorCode::DuplicateDeclaration => "DuplicateDeclaration",
            ErrorCode::UndeclaredVariable => "UndeclaredVariable",
            ErrorCode::UnexpectedStyleToken => "UnexpectedStyleToken",
            ErrorCode::UnbalancedBrace => "UnbalancedBrace",
            ErrorCode::InvalidJsonOutput => "InvalidJsonOutput",
            ErrorCode::InternalError => "InternalError",
        }
    }

    /// Severity used when a stage does not pick one explicitly.
    ///
    /// 0 is reserved for syntax errors and engine faults, 1 for suspicious
    /// but legal code, 3 for references to undeclared names.
    pub fn default_severity(self) -> u32 {
        match self {
            ErrorCode::UnbalancedDirective
            | ErrorCode::UnterminatedDirective
            | ErrorCode::DuplicateDeclaration => 1,
            ErrorCode::UndeclaredVariable => 3,
            _ => 0,
        }
    }

    /// Whether a diagnostic of this kind means the invocation produced no
    /// usable output.
    pub fn is_fatal(self) -> bool {
        matches!(self, ErrorCode::InvalidJsonOutput | ErrorCode::InternalError)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A located diagnostic.
///
/// # Examples
///
/// ```
/// use core_types::{ContextError, ErrorCode, SourceSpan};
///
/// let span = SourceSpan::new(Some("app.js"), 1, 9, 1, 14);
/// let error = ContextError::new(ErrorCode::UnterminatedString, "unterminated string literal", &span);
///
/// assert_eq!(error.severity, 0);
/// assert_eq!(
///     error.to_string(),
///     "app.js(1,9-1,14): error UnterminatedString: unterminated string literal"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextError {
    /// 0 is the most severe
    pub severity: u32,
    /// Kind of diagnostic
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// File the diagnostic refers to, empty when unknown
    pub file_name: String,
    /// First line of the offending region
    pub start_line: u32,
    /// First column of the offending region
    pub start_column: u32,
    /// Last line of the offending region
    pub end_line: u32,
    /// Column just past the offending region
    pub end_column: u32,
}

impl ContextError {
    /// Create a diagnostic with the code's default severity.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: &SourceSpan) -> Self {
        Self::with_severity(code, code.default_severity(), message, span)
    }

    /// Create a diagnostic with an explicit severity.
    pub fn with_severity(
        code: ErrorCode,
        severity: u32,
        message: impl Into<String>,
        span: &SourceSpan,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            file_name: span.file_name().unwrap_or_default().to_string(),
            start_line: span.start_line,
            start_column: span.start_column,
            end_line: span.end_line,
            end_column: span.end_column,
        }
    }

    /// A fatal diagnostic not tied to any source location.
    pub fn fatal(code: ErrorCode, message: impl Into<String>, file_name: Option<&str>) -> Self {
        Self::with_severity(code, 0, message, &SourceSpan::new(file_name, 0, 0, 0, 0))
    }

    /// Whether this entry signals that the invocation has no usable output.
    pub fn is_fatal(&self) -> bool {
        self.code.is_fatal()
    }

    /// Severity 0 entries are errors, everything else is a warning.
    pub fn is_error(&self) -> bool {
        self.severity == 0
    }
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start_line > 0 {
            write!(
                f,
                "{}({},{}-{},{}): ",
                self.file_name, self.start_line, self.start_column, self.end_line, self.end_column
            )?;
        } else if !self.file_name.is_empty() {
            write!(f, "{}: ", self.file_name)?;
        }
        let level = if self.is_error() { "error" } else { "warning" };
        write!(f, "{} {}: {}", level, self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_severities() {
        assert_eq!(ErrorCode::SyntaxError.default_severity(), 0);
        assert_eq!(ErrorCode::DuplicateDeclaration.default_severity(), 1);
        assert_eq!(ErrorCode::UndeclaredVariable.default_severity(), 3);
    }

    #[test]
    fn test_fatal_codes() {
        assert!(ErrorCode::InvalidJsonOutput.is_fatal());
        assert!(ErrorCode::InternalError.is_fatal());
        assert!(!ErrorCode::SyntaxError.is_fatal());
    }

    #[test]
    fn test_display_without_location() {
        let err = ContextError::fatal(ErrorCode::InvalidJsonOutput, "not JSON", None);
        assert_eq!(err.to_string(), "error InvalidJsonOutput: not JSON");
    }

    #[test]
    fn test_warning_display() {
        let span = SourceSpan::new(None, 2, 1, 2, 4);
        let err = ContextError::new(ErrorCode::UndeclaredVariable, "'foo' is not declared", &span);
        assert_eq!(
            err.to_string(),
            "(2,1-2,4): warning UndeclaredVariable: 'foo' is not declared"
        );
    }
}
