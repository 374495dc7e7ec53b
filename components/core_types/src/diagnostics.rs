//! Per-invocation diagnostics collection.

use crate::ContextError;

/// Append-only ordered sequence of [`ContextError`]s.
///
/// One collection is created per driver invocation and threaded through each
/// stage by `&mut`. Nothing removes entries once pushed; filtering happens
/// once, in [`Diagnostics::finish`].
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<ContextError>,
}

impl Diagnostics {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic.
    pub fn push(&mut self, error: ContextError) {
        log::trace!("diagnostic: {}", error);
        self.entries.push(error);
    }

    /// Append every diagnostic from `errors`, keeping their order.
    pub fn extend(&mut self, errors: impl IntoIterator<Item = ContextError>) {
        for error in errors {
            self.push(error);
        }
    }

    /// Number of entries collected so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in the order they were reported.
    pub fn iter(&self) -> impl Iterator<Item = &ContextError> {
        self.entries.iter()
    }

    /// Whether any entry is a fatal engine defect.
    pub fn has_fatal(&self) -> bool {
        self.entries.iter().any(ContextError::is_fatal)
    }

    /// Whether any entry is an error (severity 0).
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(ContextError::is_error)
    }

    /// Consume the collection into what a caller sees.
    ///
    /// Entries with `severity > warning_level` are dropped. The first fatal
    /// entry, if any, is moved to the front; everything else keeps its order.
    pub fn finish(self, warning_level: u32) -> Vec<ContextError> {
        let mut kept: Vec<ContextError> = self
            .entries
            .into_iter()
            .filter(|e| e.severity <= warning_level)
            .collect();
        if let Some(index) = kept.iter().position(ContextError::is_fatal) {
            let fatal = kept.remove(index);
            kept.insert(0, fatal);
        }
        kept
    }
}

impl IntoIterator for Diagnostics {
    type Item = ContextError;
    type IntoIter = std::vec::IntoIter<ContextError>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorCode, SourceSpan};

    fn entry(code: ErrorCode, line: u32) -> ContextError {
        ContextError::new(code, "test", &SourceSpan::new(None, line, 1, line, 2))
    }

    #[test]
    fn test_push_keeps_order() {
        let mut d = Diagnostics::new();
        d.push(entry(ErrorCode::SyntaxError, 1));
        d.push(entry(ErrorCode::BadExpression, 2));
        let lines: Vec<u32> = d.iter().map(|e| e.start_line).collect();
        assert_eq!(lines, vec![1, 2]);
    }

    #[test]
    fn test_finish_filters_by_warning_level() {
        let mut d = Diagnostics::new();
        d.push(entry(ErrorCode::UndeclaredVariable, 1));
        d.push(entry(ErrorCode::SyntaxError, 2));
        assert_eq!(d.clone().finish(0).len(), 1);
        assert_eq!(d.finish(3).len(), 2);
    }

    #[test]
    fn test_finish_moves_fatal_first() {
        let mut d = Diagnostics::new();
        d.push(entry(ErrorCode::SyntaxError, 1));
        d.push(ContextError::fatal(ErrorCode::InvalidJsonOutput, "bad", None));
        let out = d.finish(0);
        assert_eq!(out[0].code, ErrorCode::InvalidJsonOutput);
        assert_eq!(out[1].code, ErrorCode::SyntaxError);
    }
}
