//! Integration test suite for the Corten minifier
//!
//! This crate provides integration tests that verify components work
//! together correctly across component boundaries.

/// Re-export components for test convenience
pub mod components {
    pub use core_types;
    pub use css_parser;
    pub use js_parser;
    pub use minifier;
    pub use minify_cli;
}
