//! Unit tests for the Diagnostics collection

use core_types::{ContextError, Diagnostics, ErrorCode, SourceSpan};

fn at(code: ErrorCode, line: u32) -> ContextError {
    ContextError::new(code, "message", &SourceSpan::new(None, line, 1, line, 1))
}

#[test]
fn test_new_collection_is_empty() {
    let d = Diagnostics::new();
    assert!(d.is_empty());
    assert!(!d.has_fatal());
    assert!(!d.has_errors());
}

#[test]
fn test_extend_appends_in_order() {
    let mut d = Diagnostics::new();
    d.push(at(ErrorCode::SyntaxError, 1));
    d.extend(vec![at(ErrorCode::BadExpression, 2), at(ErrorCode::InvalidNumber, 3)]);
    let codes: Vec<ErrorCode> = d.iter().map(|e| e.code).collect();
    assert_eq!(
        codes,
        vec![ErrorCode::SyntaxError, ErrorCode::BadExpression, ErrorCode::InvalidNumber]
    );
}

#[test]
fn test_finish_discards_entries_above_level() {
    let mut d = Diagnostics::new();
    d.push(at(ErrorCode::DuplicateDeclaration, 1));
    d.push(at(ErrorCode::UndeclaredVariable, 2));
    let out = d.finish(1);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].code, ErrorCode::DuplicateDeclaration);
}

#[test]
fn test_fatal_entry_survives_level_zero() {
    let mut d = Diagnostics::new();
    d.push(at(ErrorCode::UndeclaredVariable, 1));
    d.push(ContextError::fatal(ErrorCode::InternalError, "boom", Some("x.js")));
    assert!(d.has_fatal());
    let out = d.finish(0);
    assert_eq!(out.len(), 1);
    assert!(out[0].is_fatal());
}
