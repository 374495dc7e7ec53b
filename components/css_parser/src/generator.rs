//! Minified stylesheet output
//!
//! [`StyleGenerator`] prints a [`Stylesheet`] with no optional whitespace,
//! dropping empty rules and the semicolon after the last declaration of a
//! block. Numbers, colors and zero lengths are printed in their shortest
//! form. With `collapse_whitespace` off every item gets its own line.

use crate::ast::{AtRule, Declaration, Item, Stylesheet};
use crate::script::minify_expression;
use crate::settings::StyleSettings;
use crate::tokenizer::{Token, TokenKind};
use core_types::Diagnostics;
use js_parser::ScriptSettings;

const LENGTH_UNITS: &[&str] = &[
    "px", "em", "rem", "ex", "ch", "vw", "vh", "vmin", "vmax", "cm", "mm", "in", "pt", "pc", "q",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Selector,
    Prelude,
    Value,
}

/// Prints a stylesheet in minified form
pub struct StyleGenerator<'a, 'd> {
    out: String,
    settings: &'a StyleSettings,
    script: &'a ScriptSettings,
    diagnostics: &'d mut Diagnostics,
    indent: usize,
}

impl<'a, 'd> StyleGenerator<'a, 'd> {
    /// Create a generator. `script` configures embedded expressions.
    pub fn new(settings: &'a StyleSettings, script: &'a ScriptSettings, diagnostics: &'d mut Diagnostics) -> Self {
        Self {
            out: String::new(),
            settings,
            script,
            diagnostics,
            indent: 0,
        }
    }

    /// Print `stylesheet`
    pub fn generate(mut self, stylesheet: &Stylesheet) -> String {
        self.items(&stylesheet.items);
        self.out
    }

    fn begin_line(&mut self) {
        if self.settings.collapse_whitespace || self.out.is_empty() {
            return;
        }
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    fn items(&mut self, items: &[Item]) {
        let live: Vec<&Item> = items.iter().filter(|item| !item.is_empty()).collect();
        for (index, item) in live.iter().enumerate() {
            let last = index + 1 == live.len();
            self.begin_line();
            match item {
                Item::Rule(rule) => {
                    self.tokens(&rule.selector, Context::Selector, None);
                    self.block(&rule.items);
                }
                Item::AtRule(rule) => self.at_rule(rule),
                Item::Declaration(declaration) => {
                    self.declaration(declaration);
                    if !last || self.settings.term_semicolons || !self.settings.collapse_whitespace {
                        self.out.push(';');
                    }
                }
                Item::Comment(text) => self.out.push_str(text),
            }
        }
    }

    fn block(&mut self, items: &[Item]) {
        self.out.push('{');
        self.indent += 1;
        self.items(items);
        self.indent -= 1;
        self.begin_line();
        self.out.push('}');
    }

    fn at_rule(&mut self, rule: &AtRule) {
        self.out.push('@');
        self.out.push_str(&rule.name);
        if !rule.prelude.is_empty() {
            self.out.push(' ');
            self.tokens(&rule.prelude, Context::Prelude, None);
        }
        match &rule.block {
            Some(items) => self.block(items),
            None => self.out.push(';'),
        }
    }

    fn declaration(&mut self, declaration: &Declaration) {
        self.out.push_str(&declaration.property);
        self.out.push(':');
        self.tokens(&declaration.value, Context::Value, Some(&declaration.property));
        if declaration.important {
            self.out.push_str("!important");
        }
    }

    fn tokens(&mut self, tokens: &[Token], context: Context, property: Option<&str>) {
        let keep_zero_units = property.is_some_and(keeps_zero_units);
        let shorten_colors = context == Context::Value && self.settings.shorten_colors;
        let mut previous: Option<&Token> = None;
        let mut space = false;
        let mut depth = 0usize;
        let mut index = 0;

        while index < tokens.len() {
            let token = &tokens[index];
            index += 1;
            if token.is_whitespace() {
                space = previous.is_some();
                continue;
            }
            if previous.is_some_and(|previous| space && space_needed(previous, token, context)) {
                self.out.push(' ');
            }
            space = false;
            previous = Some(token);

            match token.kind {
                TokenKind::Function if shorten_colors && token.text.eq_ignore_ascii_case("rgb(") => {
                    match rgb_to_hex(&tokens[index..]) {
                        Some((color, consumed)) => {
                            self.out.push_str(&color);
                            index += consumed;
                            previous = tokens.get(index - 1);
                        }
                        None => {
                            depth += 1;
                            self.out.push_str(&token.text);
                        }
                    }
                }
                TokenKind::Function | TokenKind::OpenParen | TokenKind::OpenBracket => {
                    depth += 1;
                    self.out.push_str(&token.text);
                }
                TokenKind::CloseParen | TokenKind::CloseBracket => {
                    depth = depth.saturating_sub(1);
                    self.out.push_str(&token.text);
                }
                TokenKind::Number if context != Context::Selector => {
                    self.out.push_str(&shorten_number(&token.text));
                }
                TokenKind::Percentage if context != Context::Selector => {
                    let number = token.text.trim_end_matches('%');
                    self.out.push_str(&shorten_number(number));
                    self.out.push('%');
                }
                TokenKind::Dimension if context != Context::Selector => {
                    let (number, unit) = split_dimension(&token.text);
                    let number = shorten_number(number);
                    let drop_unit = number == "0"
                        && context == Context::Value
                        && depth == 0
                        && !keep_zero_units
                        && is_length_unit(unit);
                    self.out.push_str(&number);
                    if !drop_unit {
                        self.out.push_str(unit);
                    }
                }
                TokenKind::Hash if shorten_colors => self.out.push_str(&shorten_hex(&token.text)),
                TokenKind::Expression => self.expression(token),
                _ => self.out.push_str(&token.text),
            }
        }
    }

    fn expression(&mut self, token: &Token) {
        let minified = if self.settings.minify_expressions {
            minify_expression(&token.text, &token.span, self.script, self.diagnostics)
        } else {
            None
        };
        self.out.push_str("expression(");
        match minified {
            Some(script) => self.out.push_str(&script),
            None => self.out.push_str(token.text.trim()),
        }
        self.out.push(')');
    }
}

/// Whether whitespace between two tokens changes the meaning
fn space_needed(previous: &Token, next: &Token, context: Context) -> bool {
    use TokenKind::*;
    let combinator = |kind: TokenKind| matches!(kind, Delim('>' | '+' | '~'));
    match (previous.kind, next.kind) {
        (Comma, _) | (_, Comma) => false,
        (Function | OpenParen | OpenBracket, _) | (_, CloseParen | CloseBracket) => false,
        (Colon, _) | (_, Colon) => context == Context::Selector,
        (Delim('/'), _) | (_, Delim('/')) => context == Context::Selector,
        (a, b) if context == Context::Selector && (combinator(a) || combinator(b)) => false,
        _ => true,
    }
}

fn keeps_zero_units(property: &str) -> bool {
    let property = property.to_ascii_lowercase();
    property.starts_with("--") || property == "flex" || property.ends_with("-flex")
}

fn is_length_unit(unit: &str) -> bool {
    LENGTH_UNITS.iter().any(|length| length.eq_ignore_ascii_case(unit))
}

/// Split `10.5px` into `("10.5", "px")`
fn split_dimension(text: &str) -> (&str, &str) {
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        if bytes.get(exponent).is_some_and(u8::is_ascii_digit) {
            end = exponent;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }
    }
    text.split_at(end)
}

/// Shortest spelling of a number token: no leading zeros before the point,
/// no trailing zeros after it, no point when nothing follows it.
pub(crate) fn shorten_number(text: &str) -> String {
    let (sign, rest) = match text.as_bytes().first() {
        Some(b'+' | b'-') => text.split_at(1),
        _ => ("", text),
    };
    let (mantissa, exponent) = match rest.find(['e', 'E']) {
        Some(position) => rest.split_at(position),
        None => (rest, ""),
    };
    let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let integer = integer.trim_start_matches('0');
    let fraction = fraction.trim_end_matches('0');
    if integer.is_empty() && fraction.is_empty() {
        return "0".to_string();
    }

    let mut out = String::with_capacity(text.len());
    out.push_str(sign);
    out.push_str(integer);
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out.push_str(exponent);
    out
}

/// `#aabbcc` becomes `#abc`; anything else is returned unchanged
pub(crate) fn shorten_hex(text: &str) -> String {
    let Some(digits) = text.strip_prefix('#') else {
        return text.to_string();
    };
    let bytes = digits.as_bytes();
    let pairs = bytes.len() == 6
        && bytes.iter().all(u8::is_ascii_hexdigit)
        && bytes.chunks(2).all(|pair| pair[0].eq_ignore_ascii_case(&pair[1]));
    if !pairs {
        return text.to_string();
    }
    let mut out = String::from("#");
    out.extend(bytes.iter().step_by(2).map(|b| b.to_ascii_lowercase() as char));
    out
}

/// Read `r, g, b)` after an `rgb(` token. Returns the hex color and how many
/// tokens it used.
fn rgb_to_hex(tokens: &[Token]) -> Option<(String, usize)> {
    let mut channels: Vec<u8> = Vec::with_capacity(3);
    let mut after_channel = false;
    for (index, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Whitespace => {}
            TokenKind::Comma if after_channel && channels.len() < 3 => after_channel = false,
            TokenKind::Number if !after_channel => {
                channels.push(token.text.parse().ok()?);
                after_channel = true;
            }
            TokenKind::CloseParen if after_channel && channels.len() == 3 => {
                let hex = format!("#{:02x}{:02x}{:02x}", channels[0], channels[1], channels[2]);
                return Some((shorten_hex(&hex), index + 1));
            }
            _ => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minify;

    fn min(source: &str) -> String {
        minify_with(source, &StyleSettings::default())
    }

    fn minify_with(source: &str, settings: &StyleSettings) -> String {
        let mut diagnostics = Diagnostics::new();
        minify(source, settings, &ScriptSettings::default(), &mut diagnostics)
    }

    #[test]
    fn test_whitespace_and_last_semicolon() {
        assert_eq!(min("a { color : red ; margin: 0px auto; }"), "a{color:red;margin:0 auto}");
    }

    #[test]
    fn test_color_shortening() {
        assert_eq!(
            min("a{color:#AABBCC;background:rgb(255, 0, 0);border-color:#abcdef}"),
            "a{color:#abc;background:#f00;border-color:#abcdef}"
        );
        assert_eq!(min("#aabbcc{color:rgb(1.5,0,0)}"), "#aabbcc{color:rgb(1.5,0,0)}");
        let settings = StyleSettings {
            shorten_colors: false,
            ..StyleSettings::default()
        };
        assert_eq!(minify_with("a{color:#aabbcc}", &settings), "a{color:#aabbcc}");
    }

    #[test]
    fn test_number_shortening() {
        assert_eq!(
            min("a{opacity:0.50;margin:-0.5em 10.0px 0.0em;width:calc(0px + 1.50em)}"),
            "a{opacity:.5;margin:-.5em 10px 0;width:calc(0px + 1.5em)}"
        );
        assert_eq!(shorten_number("010"), "10");
        assert_eq!(shorten_number("-0.0"), "0");
        assert_eq!(shorten_number("1.50e3"), "1.5e3");
        assert_eq!(shorten_number("+.5"), "+.5");
    }

    #[test]
    fn test_zero_units_kept_in_flex() {
        assert_eq!(min("a{flex:1 1 0px;margin:0px}"), "a{flex:1 1 0px;margin:0}");
        assert_eq!(min("a{transition:opacity 0s}"), "a{transition:opacity 0s}");
    }

    #[test]
    fn test_empty_rules_removed() {
        assert_eq!(min("a{} b{color:red} @media print{c{}}"), "b{color:red}");
    }

    #[test]
    fn test_selector_whitespace() {
        assert_eq!(
            min("ul  >  li + li , a:hover , div .x{top:0}"),
            "ul>li+li,a:hover,div .x{top:0}"
        );
        assert_eq!(min("a :first-child{top:0}"), "a :first-child{top:0}");
    }

    #[test]
    fn test_at_rules() {
        assert_eq!(
            min("@media screen and (max-width: 100px) { a { color: red } }"),
            "@media screen and (max-width:100px){a{color:red}}"
        );
        assert_eq!(
            min("@import url( a.css ) ;\n@charset \"utf-8\";"),
            "@import url(a.css);@charset \"utf-8\";"
        );
        assert_eq!(
            min("@font-face { font-family: x; src: url(a.woff) }"),
            "@font-face{font-family:x;src:url(a.woff)}"
        );
    }

    #[test]
    fn test_important_and_font_shorthand() {
        assert_eq!(min("a{color:red ! important}"), "a{color:red!important}");
        assert_eq!(min("a{font: 12px / 1.5 arial , sans-serif}"), "a{font:12px/1.5 arial,sans-serif}");
    }

    #[test]
    fn test_term_semicolons() {
        let settings = StyleSettings {
            term_semicolons: true,
            ..StyleSettings::default()
        };
        assert_eq!(minify_with("a{color:red}", &settings), "a{color:red;}");
    }

    #[test]
    fn test_multi_line_output() {
        let settings = StyleSettings {
            collapse_whitespace: false,
            ..StyleSettings::default()
        };
        assert_eq!(
            minify_with("a{color:red;top:0} b{left:0}", &settings),
            "a{\n  color:red;\n  top:0;\n}\nb{\n  left:0;\n}"
        );
    }

    #[test]
    fn test_important_comments() {
        assert_eq!(min("/*! keep */\na{color:red}/* drop */"), "/*! keep */a{color:red}");
        let settings = StyleSettings {
            preserve_important_comments: false,
            ..StyleSettings::default()
        };
        assert_eq!(minify_with("/*! keep */\na{color:red}", &settings), "a{color:red}");
    }

    #[test]
    fn test_expression_values() {
        let source = "a{width:expression(document.body.clientWidth > 800 ? \"800px\" : \"auto\")}";
        assert_eq!(min(source), "a{width:expression(document.body.clientWidth>800?\"800px\":\"auto\")}");
        let settings = StyleSettings {
            minify_expressions: false,
            ..StyleSettings::default()
        };
        assert_eq!(
            minify_with(source, &settings),
            "a{width:expression(document.body.clientWidth > 800 ? \"800px\" : \"auto\")}"
        );
    }

    #[test]
    fn test_recovery_keeps_valid_rules() {
        let mut diagnostics = Diagnostics::new();
        let output = minify(
            "a{color:red;;top:'x\n}b{left:0}",
            &StyleSettings::default(),
            &ScriptSettings::default(),
            &mut diagnostics,
        );
        assert_eq!(output, "a{color:red}b{left:0}");
        assert_eq!(diagnostics.len(), 1);
    }
}
