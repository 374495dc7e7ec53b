//! Shared source-location and diagnostics types for the minifier pipelines.
//!
//! Every stage of the script and stylesheet pipelines reports problems with
//! the types in this crate, so they carry no behavior beyond construction,
//! formatting and ordering.
//!
//! # Overview
//!
//! - [`SourceSpan`] - File plus start/end line and column of a token or node
//! - [`ContextError`] - A located, structured diagnostic
//! - [`ErrorCode`] - Stable identifier for each kind of diagnostic
//! - [`Diagnostics`] - Append-only ordered collection for one invocation
//!
//! # Examples
//!
//! ```
//! use core_types::{ContextError, Diagnostics, ErrorCode, SourceSpan};
//!
//! let mut diagnostics = Diagnostics::new();
//! let span = SourceSpan::new(Some("app.js"), 3, 7, 3, 9);
//! diagnostics.push(ContextError::new(
//!     ErrorCode::UndeclaredVariable,
//!     "'foo' is not declared",
//!     &span,
//! ));
//!
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics.finish(0).len(), 0); // severity 3 is above level 0
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod diagnostics;
mod error;
mod source;

pub use diagnostics::Diagnostics;
pub use error::{ContextError, ErrorCode};
pub use source::SourceSpan;
