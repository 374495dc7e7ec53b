//! Stylesheet parser errors

use core_types::{ContextError, ErrorCode, SourceSpan};
use thiserror::Error;

/// A grammar failure inside the stylesheet parser.
///
/// The item loop turns each one into a [`ContextError`] and moves on to the
/// next rule or declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// Declaration that does not start with a property name
    #[error("Expected a property name, got {found}")]
    ExpectedProperty {
        /// Description of the offending token
        found: String,
        /// Location of the declaration
        span: SourceSpan,
    },
    /// Property name not followed by `:`
    #[error("Expected ':' after '{property}'")]
    ExpectedColon {
        /// The property name
        property: String,
        /// Location of the declaration
        span: SourceSpan,
    },
    /// A `{` with nothing in front of it
    #[error("Expected a selector before '{{'")]
    ExpectedSelector {
        /// Location of the brace
        span: SourceSpan,
    },
    /// Top-level text that ended in `;` instead of a block
    #[error("Declaration outside of a rule")]
    DeclarationOutsideRule {
        /// Location of the declaration
        span: SourceSpan,
    },
    /// `}` with no open block
    #[error("Unexpected '}}'")]
    UnexpectedCloseBrace {
        /// Location of the brace
        span: SourceSpan,
    },
    /// Input ended inside a block
    #[error("Expected '}}' before end of input")]
    MissingCloseBrace {
        /// End of input
        span: SourceSpan,
    },
}

impl StyleError {
    /// Where the error was detected
    pub fn span(&self) -> &SourceSpan {
        match self {
            StyleError::ExpectedProperty { span, .. }
            | StyleError::ExpectedColon { span, .. }
            | StyleError::ExpectedSelector { span }
            | StyleError::DeclarationOutsideRule { span }
            | StyleError::UnexpectedCloseBrace { span }
            | StyleError::MissingCloseBrace { span } => span,
        }
    }

    /// Diagnostic code reported for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            StyleError::UnexpectedCloseBrace { .. } | StyleError::MissingCloseBrace { .. } => {
                ErrorCode::UnbalancedBrace
            }
            _ => ErrorCode::UnexpectedStyleToken,
        }
    }

    /// Convert to a diagnostic
    pub fn to_context_error(&self) -> ContextError {
        ContextError::new(self.code(), self.to_string(), self.span())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let span = SourceSpan::new(Some("a.css"), 2, 1, 2, 4);
        let error = StyleError::ExpectedColon {
            property: "color".to_string(),
            span: span.clone(),
        };
        assert_eq!(error.to_string(), "Expected ':' after 'color'");
        assert_eq!(error.code(), ErrorCode::UnexpectedStyleToken);

        let error = StyleError::UnexpectedCloseBrace { span };
        let context = error.to_context_error();
        assert_eq!(context.code, ErrorCode::UnbalancedBrace);
        assert_eq!(context.to_string(), "a.css(2,1-2,4): error UnbalancedBrace: Unexpected '}'");
    }
}
