//! Parser error types and helpers

use core_types::{ContextError, ErrorCode, SourceSpan};
use thiserror::Error;

/// A grammar failure inside the parser.
///
/// These never leave the crate as errors: the statement loop catches them,
/// records a [`ContextError`] and resynchronizes.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Diagnostic code to report
    pub code: ErrorCode,
    /// What went wrong
    pub message: String,
    /// Where it went wrong
    pub span: SourceSpan,
    /// Already reported by the lexer, do not report again
    pub reported: bool,
}

impl ParseError {
    /// Convert to a diagnostic at `span`.
    pub fn to_context_error(&self, span: &SourceSpan) -> ContextError {
        ContextError::new(self.code, self.message.clone(), span)
    }
}

/// Result type used throughout the parser
pub type ParseResult<T> = Result<T, ParseError>;

/// Create a syntax error at a given span
pub fn syntax_error(message: impl Into<String>, span: &SourceSpan) -> ParseError {
    ParseError {
        code: ErrorCode::SyntaxError,
        message: message.into(),
        span: span.clone(),
        reported: false,
    }
}

/// Create an unexpected token error
pub fn unexpected_token(expected: &str, got: &str, span: &SourceSpan) -> ParseError {
    syntax_error(format!("Expected {}, got {}", expected, got), span)
}

/// Create an unexpected end of input error
pub fn unexpected_eof(span: &SourceSpan) -> ParseError {
    ParseError {
        code: ErrorCode::UnexpectedEndOfInput,
        message: "Unexpected end of input".to_string(),
        span: span.clone(),
        reported: false,
    }
}

/// An error caused by a token the lexer has already reported
pub fn lexer_reported(span: &SourceSpan) -> ParseError {
    ParseError {
        code: ErrorCode::SyntaxError,
        message: "Invalid token".to_string(),
        span: span.clone(),
        reported: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error() {
        let err = syntax_error("test", &SourceSpan::synthetic());
        assert_eq!(err.code, ErrorCode::SyntaxError);
        assert!(!err.reported);
    }

    #[test]
    fn test_unexpected_token() {
        let err = unexpected_token("identifier", "number", &SourceSpan::synthetic());
        assert!(err.message.contains("Expected"));
        assert_eq!(err.to_string(), "Expected identifier, got number");
    }

    #[test]
    fn test_lexer_reported_is_flagged() {
        assert!(lexer_reported(&SourceSpan::synthetic()).reported);
    }
}
