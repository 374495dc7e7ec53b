//! Source span type for diagnostics.
//!
//! Spans are attached to every token and AST node. They are copied freely
//! into derived nodes and only ever read when a diagnostic is produced.

use std::fmt;
use std::sync::Arc;

/// A region of source text.
///
/// Lines and columns are 1-based. Offsets are byte offsets into the text the
/// lexer was given. A span with line 0 is synthetic: it was produced by the
/// pipeline rather than read from the source.
///
/// # Examples
///
/// ```
/// use core_types::SourceSpan;
///
/// let span = SourceSpan::new(Some("main.js"), 10, 5, 10, 12);
///
/// assert_eq!(span.start_line, 10);
/// assert_eq!(span.file_name(), Some("main.js"));
/// assert!(!span.is_synthetic());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceSpan {
    /// File identifier, shared between all spans of one input
    pub file: Option<Arc<str>>,
    /// Line of the first character
    pub start_line: u32,
    /// Column of the first character
    pub start_column: u32,
    /// Line of the last character
    pub end_line: u32,
    /// Column just past the last character
    pub end_column: u32,
    /// Byte offset of the first character
    pub start_offset: usize,
    /// Byte offset just past the last character
    pub end_offset: usize,
}

impl SourceSpan {
    /// Create a span from line/column coordinates.
    pub fn new(
        file: Option<&str>,
        start_line: u32,
        start_column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Self {
        Self {
            file: file.map(Arc::from),
            start_line,
            start_column,
            end_line,
            end_column,
            start_offset: 0,
            end_offset: 0,
        }
    }

    /// A span for nodes that have no source text of their own.
    pub fn synthetic() -> Self {
        Self::default()
    }

    /// Whether this span was made up by the pipeline.
    pub fn is_synthetic(&self) -> bool {
        self.start_line == 0
    }

    /// The file name, if one was given.
    pub fn file_name(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// The span covering `self` through the end of `other`.
    ///
    /// A synthetic side is ignored so merging never loses a real location.
    pub fn to(&self, other: &SourceSpan) -> SourceSpan {
        if other.is_synthetic() {
            return self.clone();
        }
        if self.is_synthetic() {
            return other.clone();
        }
        SourceSpan {
            file: self.file.clone(),
            start_line: self.start_line,
            start_column: self.start_column,
            end_line: other.end_line,
            end_column: other.end_column,
            start_offset: self.start_offset,
            end_offset: other.end_offset,
        }
    }

    /// A zero-width span at the start of `self`.
    pub fn start(&self) -> SourceSpan {
        SourceSpan {
            end_line: self.start_line,
            end_column: self.start_column,
            end_offset: self.start_offset,
            ..self.clone()
        }
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({},{}-{},{})",
            self.file_name().unwrap_or(""),
            self.start_line,
            self.start_column,
            self.end_line,
            self.end_column
        )
    }
}
