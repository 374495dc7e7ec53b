//! Unit tests for SourceSpan

use core_types::SourceSpan;

#[test]
fn test_span_clone_is_independent_value() {
    let span = SourceSpan::new(Some("lib.js"), 3, 4, 3, 9);
    let copy = span.clone();
    assert_eq!(span, copy);
    assert_eq!(copy.file_name(), Some("lib.js"));
}

#[test]
fn test_span_merge_covers_both_ends() {
    let first = SourceSpan::new(Some("lib.js"), 1, 1, 1, 4);
    let last = SourceSpan::new(Some("lib.js"), 2, 3, 2, 10);
    let merged = first.to(&last);
    assert_eq!(merged.start_line, 1);
    assert_eq!(merged.start_column, 1);
    assert_eq!(merged.end_line, 2);
    assert_eq!(merged.end_column, 10);
}

#[test]
fn test_span_start_is_zero_width() {
    let span = SourceSpan::new(None, 5, 2, 6, 1);
    let start = span.start();
    assert_eq!(start.end_line, 5);
    assert_eq!(start.end_column, 2);
}

#[test]
fn test_synthetic_span() {
    assert!(SourceSpan::synthetic().is_synthetic());
    assert!(!SourceSpan::new(None, 1, 1, 1, 1).is_synthetic());
}
