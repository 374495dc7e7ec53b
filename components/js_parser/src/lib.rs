//! JavaScript Minifier Front End
//!
//! Provides the preprocessor, lexer, parser, AST, scope analysis and the two
//! output visitors of the script pipeline.
//!
//! # Overview
//!
//! - [`preprocess`] - `///#IF`-style conditional compilation over raw text
//! - [`Lexer`] - Lazy token stream with line-break tracking
//! - [`parse`] - Recursive descent parser with statement-level recovery
//! - [`Program`] - Abstract Syntax Tree root
//! - [`ScopeTree`] - Scope arena filled by [`declare_scopes`] and
//!   [`resolve_references`], renamed by [`rename_locals`]
//! - [`CodeGenerator`] - Minified JavaScript output
//! - [`JsonGenerator`] - Strict JSON output
//!
//! # Example
//!
//! ```
//! use core_types::Diagnostics;
//! use js_parser::{declare_scopes, parse, rename_locals, resolve_references, tokenize};
//! use js_parser::{CodeGenerator, ScriptSettings};
//!
//! let settings = ScriptSettings::default();
//! let mut diagnostics = Diagnostics::new();
//!
//! let mut program = parse(tokenize("function add(left, right) { return left + right; }", None), &settings, &mut diagnostics);
//! let mut scopes = declare_scopes(&mut program, &settings, &mut diagnostics);
//! resolve_references(&mut program, &mut scopes, &settings, &mut diagnostics);
//! rename_locals(&mut scopes);
//!
//! let output = CodeGenerator::new(&settings, Some(&scopes)).generate(&program);
//! assert_eq!(output, "function add(a,b){return a+b}");
//! assert!(diagnostics.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod codegen;
pub mod error;
pub mod json;
pub mod lexer;
pub mod parser;
pub mod preprocessor;
pub mod scope;
pub mod settings;
pub mod visitor;

pub use ast::{Expression, Program, Statement};
pub use codegen::CodeGenerator;
pub use error::ParseError;
pub use json::JsonGenerator;
pub use lexer::{tokenize, Keyword, Lexer, Punctuator, Token, TokenKind};
pub use parser::{parse, Parser};
pub use preprocessor::{preprocess, Preprocessed};
pub use scope::{declare_scopes, rename_locals, resolve_references, ScopeId, ScopeTree};
pub use settings::{OutputFormat, ScriptSettings};
pub use visitor::Visitor;
