//! Unit tests for ContextError and ErrorCode

use core_types::{ContextError, ErrorCode, SourceSpan};

#[test]
fn test_context_error_copies_span_fields() {
    let span = SourceSpan::new(Some("site.js"), 7, 3, 7, 11);
    let err = ContextError::new(ErrorCode::SyntaxError, "expected ')'", &span);

    assert_eq!(err.file_name, "site.js");
    assert_eq!(err.start_line, 7);
    assert_eq!(err.start_column, 3);
    assert_eq!(err.end_line, 7);
    assert_eq!(err.end_column, 11);
    assert_eq!(err.severity, 0);
    assert!(err.is_error());
}

#[test]
fn test_explicit_severity() {
    let span = SourceSpan::new(None, 1, 1, 1, 2);
    let err = ContextError::with_severity(ErrorCode::BadExpression, 2, "odd", &span);
    assert_eq!(err.severity, 2);
    assert!(!err.is_error());
}

#[test]
fn test_code_identifier_is_stable() {
    assert_eq!(ErrorCode::InvalidJsonOutput.to_string(), "InvalidJsonOutput");
    assert_eq!(ErrorCode::UndeclaredVariable.as_str(), "UndeclaredVariable");
}

#[test]
fn test_serializes_camel_case() {
    let span = SourceSpan::new(Some("a.js"), 1, 2, 1, 3);
    let err = ContextError::new(ErrorCode::UnterminatedString, "unterminated", &span);
    let json = serde_json::to_value(&err).unwrap();

    assert_eq!(json["code"], "UnterminatedString");
    assert_eq!(json["fileName"], "a.js");
    assert_eq!(json["startColumn"], 2);
}
