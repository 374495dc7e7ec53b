//! Stylesheet Minifier
//!
//! Tokenizer, parser and minified emitter for stylesheets. `expression(...)`
//! values are handed to the script pipeline in [`js_parser`].
//!
//! # Overview
//!
//! - [`tokenize`] - Lazy token stream with line/column spans
//! - [`parse`] - Rule and declaration parser with per-declaration recovery
//! - [`Stylesheet`] - Syntax tree root
//! - [`StyleGenerator`] - Minified output
//! - [`minify`] - All of the above in one call
//!
//! # Example
//!
//! ```
//! use core_types::Diagnostics;
//! use css_parser::{minify, StyleSettings};
//! use js_parser::ScriptSettings;
//!
//! let mut diagnostics = Diagnostics::new();
//! let output = minify(
//!     "body { margin: 0px; color: #ffffff; }",
//!     &StyleSettings::default(),
//!     &ScriptSettings::default(),
//!     &mut diagnostics,
//! );
//!
//! assert_eq!(output, "body{margin:0;color:#fff}");
//! assert!(diagnostics.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod error;
pub mod generator;
pub mod parser;
pub mod script;
pub mod settings;
pub mod tokenizer;

pub use ast::{AtRule, Declaration, Item, StyleRule, Stylesheet};
pub use error::StyleError;
pub use generator::StyleGenerator;
pub use parser::{parse, Parser};
pub use settings::StyleSettings;
pub use tokenizer::{tokenize, Token, TokenKind, Tokenizer};

use core_types::Diagnostics;
use js_parser::ScriptSettings;

/// Minify `source`, appending every diagnostic to `diagnostics`.
///
/// `script` configures the script pipeline used for `expression(...)`
/// values.
pub fn minify(
    source: &str,
    settings: &StyleSettings,
    script: &ScriptSettings,
    diagnostics: &mut Diagnostics,
) -> String {
    let tokenizer = tokenize(source, settings.file_name.as_deref())
        .with_important_comments(settings.preserve_important_comments);
    let stylesheet = parse(tokenizer, diagnostics);
    let output = StyleGenerator::new(settings, script, diagnostics).generate(&stylesheet);
    log::debug!("minified stylesheet from {} to {} bytes", source.len(), output.len());
    output
}
