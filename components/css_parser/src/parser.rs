//! Stylesheet parser
//!
//! Reads rules, at-rules and declarations into a [`Stylesheet`]. Every
//! malformed construct is reported and skipped up to the next `;` or block,
//! so one bad declaration never costs the rest of its rule.

use crate::ast::{AtRule, Declaration, Item, StyleRule, Stylesheet};
use crate::error::StyleError;
use crate::tokenizer::{Token, TokenKind, Tokenizer};
use core_types::{Diagnostics, SourceSpan};

/// Parse a whole stylesheet, reporting into `diagnostics`
pub fn parse(tokenizer: Tokenizer<'_>, diagnostics: &mut Diagnostics) -> Stylesheet {
    Parser::new(tokenizer, diagnostics).parse_stylesheet()
}

/// Recursive descent parser over a [`Tokenizer`]
pub struct Parser<'a, 'd> {
    tokenizer: Tokenizer<'a>,
    current: Token,
    diagnostics: &'d mut Diagnostics,
}

impl<'a, 'd> Parser<'a, 'd> {
    /// Create a parser positioned on the first token
    pub fn new(mut tokenizer: Tokenizer<'a>, diagnostics: &'d mut Diagnostics) -> Self {
        let current = tokenizer.next_token();
        diagnostics.extend(tokenizer.take_errors());
        Self {
            tokenizer,
            current,
            diagnostics,
        }
    }

    /// Parse to end of input
    pub fn parse_stylesheet(mut self) -> Stylesheet {
        let items = self.items(true);
        log::debug!("parsed stylesheet with {} top-level items", items.len());
        Stylesheet { items }
    }

    fn advance(&mut self) -> Token {
        let next = self.tokenizer.next_token();
        self.diagnostics.extend(self.tokenizer.take_errors());
        std::mem::replace(&mut self.current, next)
    }

    fn skip_whitespace(&mut self) {
        while self.current.is_whitespace() {
            self.advance();
        }
    }

    fn report(&mut self, error: StyleError) {
        log::trace!("stylesheet error: {}", error);
        self.diagnostics.push(error.to_context_error());
    }

    fn items(&mut self, top_level: bool) -> Vec<Item> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.current.kind {
                TokenKind::Eof => {
                    if !top_level {
                        let span = self.current.span.clone();
                        self.report(StyleError::MissingCloseBrace { span });
                    }
                    return items;
                }
                TokenKind::CloseBrace if !top_level => return items,
                TokenKind::CloseBrace => {
                    let token = self.advance();
                    self.report(StyleError::UnexpectedCloseBrace { span: token.span });
                }
                TokenKind::Semicolon => {
                    self.advance();
                }
                TokenKind::ImportantComment => {
                    let token = self.advance();
                    items.push(Item::Comment(token.text));
                }
                TokenKind::AtKeyword => {
                    if let Some(item) = self.at_rule() {
                        items.push(item);
                    }
                }
                _ => match self.rule_or_declaration(top_level) {
                    Ok(Some(item)) => items.push(item),
                    Ok(None) => {}
                    Err(error) => self.report(error),
                },
            }
        }
    }

    /// Tokens up to the next `{`, `}` or top-level `;`, without surrounding
    /// whitespace
    fn collect(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        loop {
            match self.current.kind {
                TokenKind::Eof | TokenKind::OpenBrace | TokenKind::CloseBrace => break,
                TokenKind::Semicolon if depth == 0 => break,
                TokenKind::Function | TokenKind::OpenParen | TokenKind::OpenBracket => depth += 1,
                TokenKind::CloseParen | TokenKind::CloseBracket => depth = depth.saturating_sub(1),
                TokenKind::ImportantComment => {
                    self.advance();
                    continue;
                }
                _ => {}
            }
            tokens.push(self.advance());
        }
        trim_whitespace(&mut tokens);
        tokens
    }

    fn block(&mut self) -> Vec<Item> {
        self.advance();
        let items = self.items(false);
        if self.current.kind == TokenKind::CloseBrace {
            self.advance();
        }
        items
    }

    fn rule_or_declaration(&mut self, top_level: bool) -> Result<Option<Item>, StyleError> {
        let start = self.current.span.clone();
        let tokens = self.collect();
        let broken = tokens.iter().any(|token| token.kind == TokenKind::Error);

        if self.current.kind == TokenKind::OpenBrace {
            let brace = self.current.span.clone();
            let items = self.block();
            if broken {
                return Ok(None);
            }
            if tokens.is_empty() {
                return Err(StyleError::ExpectedSelector { span: brace });
            }
            return Ok(Some(Item::Rule(StyleRule {
                selector: tokens,
                items,
                span: start,
            })));
        }

        if self.current.kind == TokenKind::Semicolon {
            self.advance();
        }
        if broken {
            return Ok(None);
        }
        let span = match tokens.last() {
            Some(last) => start.to(&last.span),
            None => start,
        };
        if top_level {
            return Err(StyleError::DeclarationOutsideRule { span });
        }
        declaration(tokens, span).map(|declaration| Some(Item::Declaration(declaration)))
    }

    fn at_rule(&mut self) -> Option<Item> {
        let keyword = self.advance();
        let name = keyword.text.strip_prefix('@').unwrap_or(&keyword.text).to_string();
        let prelude = self.collect();
        let block = match self.current.kind {
            TokenKind::OpenBrace => Some(self.block()),
            TokenKind::Semicolon => {
                self.advance();
                None
            }
            _ => None,
        };
        if prelude.iter().any(|token| token.kind == TokenKind::Error) {
            return None;
        }
        Some(Item::AtRule(AtRule {
            name,
            prelude,
            block,
            span: keyword.span,
        }))
    }
}

fn declaration(mut tokens: Vec<Token>, span: SourceSpan) -> Result<Declaration, StyleError> {
    let mut property = String::new();
    let mut index = 0;
    // `*zoom: 1` style property hacks
    if let Some(TokenKind::Delim(hack @ ('*' | '_'))) = tokens.first().map(|token| token.kind) {
        property.push(hack);
        index = 1;
    }
    match tokens.get(index) {
        Some(token) if token.kind == TokenKind::Ident => {
            property.push_str(&token.text);
            index += 1;
        }
        other => {
            let found = other.map_or_else(|| "end of declaration".to_string(), Token::describe);
            return Err(StyleError::ExpectedProperty { found, span });
        }
    }
    while tokens.get(index).is_some_and(Token::is_whitespace) {
        index += 1;
    }
    if tokens.get(index).map(|token| token.kind) != Some(TokenKind::Colon) {
        return Err(StyleError::ExpectedColon { property, span });
    }

    let mut value = tokens.split_off(index + 1);
    let important = strip_important(&mut value);
    trim_whitespace(&mut value);
    Ok(Declaration {
        property,
        value,
        important,
        span,
    })
}

/// Remove a trailing `! important` and report whether there was one
fn strip_important(value: &mut Vec<Token>) -> bool {
    let significant: Vec<usize> = value
        .iter()
        .enumerate()
        .filter(|(_, token)| !token.is_whitespace())
        .map(|(index, _)| index)
        .collect();
    let [.., bang, word] = significant.as_slice() else {
        return false;
    };
    let is_important = value[*bang].kind == TokenKind::Delim('!')
        && value[*word].kind == TokenKind::Ident
        && value[*word].text.eq_ignore_ascii_case("important");
    if is_important {
        value.truncate(*bang);
    }
    is_important
}

fn trim_whitespace(tokens: &mut Vec<Token>) {
    while tokens.last().is_some_and(Token::is_whitespace) {
        tokens.pop();
    }
    let leading = tokens.iter().take_while(|token| token.is_whitespace()).count();
    tokens.drain(..leading);
}
