//! Conditional-compilation preprocessor
//!
//! Runs over raw source before the lexer sees it. Directives sit on their own
//! line and start with `///#`, so unprocessed source is still valid script:
//!
//! ```text
//! ///#DEFINE NAME[=value]   ///#UNDEF NAME
//! ///#IF NAME   ///#IFDEF NAME   ///#IFNDEF NAME   ///#ELSE   ///#ENDIF
//! ```
//!
//! `%NAME%` in active lines is replaced by the value of `NAME` when the symbol
//! has one. Symbol names are case-insensitive.

use crate::settings::ScriptSettings;
use core_types::{ContextError, Diagnostics, ErrorCode, SourceSpan};
use std::collections::HashMap;

/// Output of the preprocessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocessed {
    /// Text for the lexer. Removed lines are kept as empty lines so that
    /// line numbers still match the original source.
    pub text: String,
    /// Text with removed lines dropped entirely.
    pub compact: String,
}

struct Frame {
    /// Whether the enclosing region is emitted
    outer_active: bool,
    /// Value of the `///#IF` condition
    condition: bool,
    in_else: bool,
    line: u32,
}

impl Frame {
    fn active(&self) -> bool {
        self.outer_active && (self.condition != self.in_else)
    }
}

/// Run the preprocessor over `source`.
pub fn preprocess(
    source: &str,
    settings: &ScriptSettings,
    diagnostics: &mut Diagnostics,
) -> Preprocessed {
    let mut symbols: HashMap<String, String> = settings
        .defines
        .iter()
        .map(|(name, value)| (name.to_ascii_uppercase(), value.clone()))
        .collect();

    if !source.contains("///#") && symbols.values().all(String::is_empty) {
        return Preprocessed {
            text: source.to_string(),
            compact: source.to_string(),
        };
    }

    let file = settings.file_name.as_deref();
    let mut text = String::with_capacity(source.len());
    let mut compact = String::with_capacity(source.len());
    let mut frames: Vec<Frame> = Vec::new();
    let mut line_no = 0u32;

    for line in source.split_inclusive('\n') {
        line_no += 1;
        let active = frames.last().map_or(true, Frame::active);
        let (content, ending) = split_line_ending(line);
        let line_span = SourceSpan::new(file, line_no, 1, line_no, content.chars().count() as u32 + 1);

        if let Some((directive, argument)) = parse_directive(content) {
            match directive.as_str() {
                "DEFINE" if active => {
                    let (name, value) = match argument.split_once('=') {
                        Some((name, value)) => (name.trim(), value.trim()),
                        None => (argument, ""),
                    };
                    if !name.is_empty() {
                        symbols.insert(name.to_ascii_uppercase(), value.to_string());
                    }
                }
                "UNDEF" if active => {
                    symbols.remove(&argument.to_ascii_uppercase());
                }
                "DEFINE" | "UNDEF" => {}
                "IF" | "IFDEF" | "IFNDEF" => {
                    let defined = symbols.contains_key(&argument.to_ascii_uppercase());
                    frames.push(Frame {
                        outer_active: active,
                        condition: if directive == "IFNDEF" { !defined } else { defined },
                        in_else: false,
                        line: line_no,
                    });
                }
                "ELSE" => match frames.last_mut() {
                    Some(frame) if !frame.in_else => frame.in_else = true,
                    _ => diagnostics.push(ContextError::new(
                        ErrorCode::UnbalancedDirective,
                        "///#ELSE without a matching ///#IF",
                        &line_span,
                    )),
                },
                "ENDIF" => {
                    if frames.pop().is_none() {
                        diagnostics.push(ContextError::new(
                            ErrorCode::UnbalancedDirective,
                            "///#ENDIF without a matching ///#IF",
                            &line_span,
                        ));
                    }
                }
                _ => {
                    // Not one of ours, keep it as an ordinary comment line.
                    emit_line(&mut text, &mut compact, content, ending, active, &symbols);
                    continue;
                }
            }
            text.push_str(ending);
            continue;
        }

        emit_line(&mut text, &mut compact, content, ending, active, &symbols);
    }

    for frame in frames {
        let span = SourceSpan::new(file, frame.line, 1, frame.line, 1);
        diagnostics.push(ContextError::new(
            ErrorCode::UnterminatedDirective,
            "///#IF block is missing its ///#ENDIF",
            &span,
        ));
    }

    log::debug!("preprocessed {} lines", line_no);
    Preprocessed { text, compact }
}

fn emit_line(
    text: &mut String,
    compact: &mut String,
    content: &str,
    ending: &str,
    active: bool,
    symbols: &HashMap<String, String>,
) {
    if active {
        let replaced = substitute(content, symbols);
        text.push_str(&replaced);
        text.push_str(ending);
        compact.push_str(&replaced);
        compact.push_str(ending);
    } else {
        text.push_str(ending);
    }
}

fn split_line_ending(line: &str) -> (&str, &str) {
    let content = line.trim_end_matches(['\n', '\r']);
    (content, &line[content.len()..])
}

/// Returns the upper-cased directive name and its trimmed argument.
fn parse_directive(line: &str) -> Option<(String, &str)> {
    let rest = line.trim_start().strip_prefix("///#")?;
    let name_len = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let name = rest[..name_len].to_ascii_uppercase();
    Some((name, rest[name_len..].trim()))
}

/// Replace `%NAME%` with the symbol's value when it has one.
fn substitute(line: &str, symbols: &HashMap<String, String>) -> String {
    if !line.contains('%') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let value = if name_len > 0 && after[name_len..].starts_with('%') {
            symbols
                .get(&after[..name_len].to_ascii_uppercase())
                .filter(|v| !v.is_empty())
        } else {
            None
        };
        match value {
            Some(value) => {
                out.push_str(value);
                rest = &after[name_len + 1..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
