//! Stylesheet syntax tree
//!
//! Selectors, at-rule preludes and declaration values stay token lists: the
//! minifier only rewrites individual tokens and the whitespace between
//! them, so it never needs a deeper structure.

use crate::tokenizer::Token;
use core_types::SourceSpan;

/// Root of a parsed stylesheet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stylesheet {
    /// Top-level rules and comments
    pub items: Vec<Item>,
}

/// One entry of a stylesheet or of a block
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// `selector { ... }`
    Rule(StyleRule),
    /// `@name prelude;` or `@name prelude { ... }`
    AtRule(AtRule),
    /// `property: value`
    Declaration(Declaration),
    /// A preserved `/*! ... */` comment
    Comment(String),
}

/// A qualified rule
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    /// Selector tokens, whitespace included
    pub selector: Vec<Token>,
    /// Block contents
    pub items: Vec<Item>,
    /// Location of the selector
    pub span: SourceSpan,
}

/// An at-rule
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    /// Name without the `@`
    pub name: String,
    /// Tokens between the name and the block or semicolon
    pub prelude: Vec<Token>,
    /// Block contents, `None` for statement at-rules like `@import`
    pub block: Option<Vec<Item>>,
    /// Location of the name
    pub span: SourceSpan,
}

/// A property declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Property name as written
    pub property: String,
    /// Value tokens, whitespace included, `!important` removed
    pub value: Vec<Token>,
    /// Ends in `!important`
    pub important: bool,
    /// Location of the whole declaration
    pub span: SourceSpan,
}

impl Item {
    /// Whether the item would emit nothing once empty blocks are dropped
    pub fn is_empty(&self) -> bool {
        match self {
            Item::Rule(rule) => rule.items.iter().all(Item::is_empty),
            Item::AtRule(AtRule {
                block: Some(items), ..
            }) => items.iter().all(Item::is_empty),
            Item::AtRule(_) | Item::Declaration(_) | Item::Comment(_) => false,
        }
    }
}
