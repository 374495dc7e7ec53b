//! Minifier
//!
//! Driver over the script and stylesheet pipelines. Each call runs one
//! pipeline with fresh diagnostics and returns a [`MinifyResult`].
//!
//! # Example
//!
//! ```
//! use minifier::{minify_css, minify_javascript};
//!
//! let script = minify_javascript("function square(value) { return value * value; }");
//! assert_eq!(script.output, "function square(a){return a*a}");
//!
//! let style = minify_css("a { color: #FFFFFF; }");
//! assert_eq!(style.output, "a{color:#fff}");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod driver;
pub mod result;

pub use driver::{minify_css, minify_javascript, Minifier};
pub use result::{MinifyResult, Outcome};

pub use core_types::ContextError;
pub use css_parser::StyleSettings;
pub use js_parser::{OutputFormat, ScriptSettings};
