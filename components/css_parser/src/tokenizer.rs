//! Stylesheet tokenizer
//!
//! Produces tokens on demand. Comments are dropped unless they are
//! important (`/*! ... */`) and the caller asked to keep them. Malformed
//! input becomes an [`TokenKind::Error`] token plus a diagnostic collected
//! in the tokenizer until the parser takes it.

use core_types::{ContextError, ErrorCode, SourceSpan};
use std::sync::Arc;

/// Kind tag of a stylesheet token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier such as `color` or `-webkit-box`
    Ident,
    /// `@media`, text includes the `@`
    AtKeyword,
    /// `#fff` or `#main`, text includes the `#`
    Hash,
    /// Quoted string, text includes the quotes
    String,
    /// Plain number
    Number,
    /// Number followed by `%`
    Percentage,
    /// Number followed by a unit
    Dimension,
    /// Unquoted `url(...)`, whole text
    Url,
    /// Function name with its opening parenthesis, `rgb(`
    Function,
    /// `expression(...)`, text is the script between the parentheses
    Expression,
    /// Any other single character
    Delim(char),
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// Run of whitespace
    Whitespace,
    /// A `/*! ... */` comment that should survive minification
    ImportantComment,
    /// Text that could not be tokenized; already reported
    Error,
    /// End of input
    Eof,
}

/// Token produced by the tokenizer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Kind tag
    pub kind: TokenKind,
    /// Source text, see [`TokenKind`] for special cases
    pub text: String,
    /// Where the token came from
    pub span: SourceSpan,
}

impl Token {
    /// Whether this is a whitespace run
    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }

    /// Short description for diagnostics
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Whitespace => "whitespace".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

/// Create a tokenizer over `source`
pub fn tokenize<'a>(source: &'a str, file_name: Option<&str>) -> Tokenizer<'a> {
    Tokenizer::new(source, file_name)
}

/// Lazy tokenizer for stylesheet source
pub struct Tokenizer<'a> {
    source: &'a str,
    chars: Vec<char>,
    position: usize,
    offset: usize,
    line: u32,
    column: u32,
    file: Option<Arc<str>>,
    errors: Vec<ContextError>,
    preserve_important_comments: bool,
}

struct Mark {
    line: u32,
    column: u32,
    offset: usize,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer
    pub fn new(source: &'a str, file_name: Option<&str>) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            position: 0,
            offset: 0,
            line: 1,
            column: 1,
            file: file_name.map(Arc::from),
            errors: Vec::new(),
            preserve_important_comments: false,
        }
    }

    /// Surface `/*! ... */` comments as [`TokenKind::ImportantComment`] tokens
    pub fn with_important_comments(mut self, preserve: bool) -> Self {
        self.preserve_important_comments = preserve;
        self
    }

    /// Take the diagnostics reported so far
    pub fn take_errors(&mut self) -> Vec<ContextError> {
        std::mem::take(&mut self.errors)
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Token {
        loop {
            let start = self.mark();
            if self.is_at_end() {
                return self.make(TokenKind::Eof, &start);
            }
            if self.peek() == '/' && self.peek_at(1) == Some('*') {
                match self.comment(&start) {
                    Some(token) => return token,
                    None => continue,
                }
            }
            // HTML comment delimiters around inline styles
            if self.source[self.offset..].starts_with("<!--") {
                self.advance_by(4);
                continue;
            }
            if self.source[self.offset..].starts_with("-->") {
                self.advance_by(3);
                continue;
            }
            return self.scan(start);
        }
    }

    fn scan(&mut self, start: Mark) -> Token {
        let ch = self.peek();
        match ch {
            c if is_whitespace(c) => {
                while !self.is_at_end() && is_whitespace(self.peek()) {
                    self.advance();
                }
                self.make(TokenKind::Whitespace, &start)
            }
            '"' | '\'' => self.string(start, ch),
            '#' if self.peek_at(1).is_some_and(is_name_char) || self.escape_at(1) => {
                self.advance();
                self.name();
                self.make(TokenKind::Hash, &start)
            }
            '@' if self.ident_start_at(1) => {
                self.advance();
                self.name();
                self.make(TokenKind::AtKeyword, &start)
            }
            _ if self.number_start_at(0) => self.numeric(start),
            _ if self.ident_start_at(0) => self.ident_like(start),
            _ => {
                self.advance();
                let kind = match ch {
                    ':' => TokenKind::Colon,
                    ';' => TokenKind::Semicolon,
                    ',' => TokenKind::Comma,
                    '{' => TokenKind::OpenBrace,
                    '}' => TokenKind::CloseBrace,
                    '(' => TokenKind::OpenParen,
                    ')' => TokenKind::CloseParen,
                    '[' => TokenKind::OpenBracket,
                    ']' => TokenKind::CloseBracket,
                    other => TokenKind::Delim(other),
                };
                self.make(kind, &start)
            }
        }
    }

    fn comment(&mut self, start: &Mark) -> Option<Token> {
        let important = self.peek_at(2) == Some('!');
        self.advance_by(2);
        loop {
            if self.is_at_end() {
                let span = self.span_from(start);
                self.errors.push(ContextError::new(
                    ErrorCode::UnterminatedComment,
                    "Unterminated comment",
                    &span,
                ));
                return None;
            }
            if self.peek() == '*' && self.peek_at(1) == Some('/') {
                self.advance_by(2);
                break;
            }
            self.advance();
        }
        (important && self.preserve_important_comments)
            .then(|| self.make(TokenKind::ImportantComment, start))
    }

    fn string(&mut self, start: Mark, quote: char) -> Token {
        self.advance();
        loop {
            if self.is_at_end() || matches!(self.peek(), '\n' | '\r' | '\x0C') {
                return self.error(start, ErrorCode::UnterminatedString, "Unterminated string");
            }
            match self.advance() {
                c if c == quote => return self.make(TokenKind::String, &start),
                '\\' if !self.is_at_end() => {
                    self.advance();
                }
                _ => {}
            }
        }
    }

    fn numeric(&mut self, start: Mark) -> Token {
        if matches!(self.peek(), '+' | '-') {
            self.advance();
        }
        self.digits();
        if self.peek() == '.' && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.digits();
        }
        if matches!(self.peek(), 'e' | 'E') {
            let signed = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.advance_by(digit_at);
                self.digits();
            }
        }
        if self.peek() == '%' {
            self.advance();
            return self.make(TokenKind::Percentage, &start);
        }
        if self.ident_start_at(0) {
            self.name();
            return self.make(TokenKind::Dimension, &start);
        }
        self.make(TokenKind::Number, &start)
    }

    fn ident_like(&mut self, start: Mark) -> Token {
        self.name();
        if self.peek() != '(' {
            return self.make(TokenKind::Ident, &start);
        }
        let name = self.source[start.offset..self.offset].to_string();
        self.advance();
        if name.eq_ignore_ascii_case("url") && !self.quoted_url_ahead() {
            return self.url(start);
        }
        if name.eq_ignore_ascii_case("expression") {
            return self.expression(start);
        }
        self.make(TokenKind::Function, &start)
    }

    fn quoted_url_ahead(&self) -> bool {
        let mut index = self.position;
        while self.char_at(index).is_some_and(is_whitespace) {
            index += 1;
        }
        matches!(self.char_at(index), Some('"' | '\''))
    }

    fn url(&mut self, start: Mark) -> Token {
        let body_start = self.offset;
        while !self.is_at_end() && self.peek() != ')' {
            self.advance();
        }
        if self.is_at_end() {
            return self.error(start, ErrorCode::UnexpectedEndOfInput, "Unterminated url");
        }
        let body = self.source[body_start..self.offset].trim().to_string();
        self.advance();
        let mut token = self.make(TokenKind::Url, &start);
        token.text = format!("url({})", body);
        token
    }

    fn expression(&mut self, start: Mark) -> Token {
        let body_start = self.offset;
        let mut depth = 1usize;
        loop {
            if self.is_at_end() {
                return self.error(start, ErrorCode::UnexpectedEndOfInput, "Unterminated expression");
            }
            match self.peek() {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                quote @ ('"' | '\'') => {
                    self.skip_script_string(quote);
                    continue;
                }
                _ => {}
            }
            self.advance();
        }
        let body = self.source[body_start..self.offset].to_string();
        self.advance();
        let mut token = self.make(TokenKind::Expression, &start);
        token.text = body;
        token
    }

    fn skip_script_string(&mut self, quote: char) {
        self.advance();
        while !self.is_at_end() && !matches!(self.peek(), '\n' | '\r') {
            match self.advance() {
                c if c == quote => return,
                '\\' if !self.is_at_end() => {
                    self.advance();
                }
                _ => {}
            }
        }
    }

    fn name(&mut self) {
        loop {
            if self.escape_at(0) {
                self.advance_by(2);
            } else if !self.is_at_end() && is_name_char(self.peek()) {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn digits(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
    }

    fn number_start_at(&self, index: usize) -> bool {
        let digit = |i: usize| self.peek_at(i).is_some_and(|c| c.is_ascii_digit());
        match self.peek_at(index) {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => digit(index + 1),
            Some('+' | '-') => digit(index + 1) || (self.peek_at(index + 1) == Some('.') && digit(index + 2)),
            _ => false,
        }
    }

    fn ident_start_at(&self, index: usize) -> bool {
        match self.peek_at(index) {
            Some('-') => {
                matches!(self.peek_at(index + 1), Some(c) if is_name_start(c) || c == '-')
                    || self.escape_at(index + 1)
            }
            Some('\\') => self.escape_at(index),
            Some(c) => is_name_start(c),
            None => false,
        }
    }

    fn escape_at(&self, index: usize) -> bool {
        self.peek_at(index) == Some('\\')
            && self.peek_at(index + 1).is_some_and(|c| !matches!(c, '\n' | '\r' | '\x0C'))
    }

    fn error(&mut self, start: Mark, code: ErrorCode, message: &str) -> Token {
        let token = self.make(TokenKind::Error, &start);
        self.errors.push(ContextError::new(code, message, &token.span));
        token
    }

    fn make(&self, kind: TokenKind, start: &Mark) -> Token {
        Token {
            kind,
            text: self.source[start.offset..self.offset].to_string(),
            span: self.span_from(start),
        }
    }

    fn span_from(&self, start: &Mark) -> SourceSpan {
        SourceSpan {
            file: self.file.clone(),
            start_line: start.line,
            start_column: start.column,
            end_line: self.line,
            end_column: self.column,
            start_offset: start.offset,
            end_offset: self.offset,
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> char {
        self.char_at(self.position).unwrap_or('\0')
    }

    fn peek_at(&self, distance: usize) -> Option<char> {
        self.char_at(self.position + distance)
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.position];
        self.position += 1;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            if self.is_at_end() {
                break;
            }
            self.advance();
        }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut tokenizer = tokenize(source, None);
        let mut kinds = Vec::new();
        loop {
            let token = tokenizer.next_token();
            if token.kind == TokenKind::Eof {
                return kinds;
            }
            kinds.push(token.kind);
        }
    }

    fn texts(source: &str) -> Vec<String> {
        let mut tokenizer = tokenize(source, None);
        std::iter::from_fn(|| {
            let token = tokenizer.next_token();
            (token.kind != TokenKind::Eof).then_some(token.text)
        })
        .collect()
    }

    #[test]
    fn test_consecutive_rules() {
        assert_eq!(
            texts("a{x:y}\nb .c{margin:-1px 0.5em}@media print{d{top:#fff}}"),
            vec![
                "a", "{", "x", ":", "y", "}", "\n", "b", " ", ".", "c", "{", "margin", ":", "-1px", " ", "0.5em", "}",
                "@media", " ", "print", "{", "d", "{", "top", ":", "#fff", "}", "}",
            ]
        );
    }

    #[test]
    fn test_every_token_makes_progress() {
        let source = "p{color:red;width:10%}q{-webkit-box:1;\\31 a:0}";
        let mut tokenizer = tokenize(source, None);
        let mut offset = 0;
        loop {
            let token = tokenizer.next_token();
            if token.kind == TokenKind::Eof {
                break;
            }
            assert!(token.span.end_offset > offset, "stalled at {}", offset);
            offset = token.span.end_offset;
        }
        assert_eq!(offset, source.len());
    }

    #[test]
    fn test_rule_tokens() {
        assert_eq!(
            kinds("a{color:red}"),
            vec![
                TokenKind::Ident,
                TokenKind::OpenBrace,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Ident,
                TokenKind::CloseBrace,
            ]
        );
    }

    #[test]
    fn test_numeric_tokens() {
        assert_eq!(
            kinds("10px 50% -.5 +2 1e3"),
            vec![
                TokenKind::Dimension,
                TokenKind::Whitespace,
                TokenKind::Percentage,
                TokenKind::Whitespace,
                TokenKind::Number,
                TokenKind::Whitespace,
                TokenKind::Number,
                TokenKind::Whitespace,
                TokenKind::Number,
            ]
        );
        assert_eq!(texts("1em"), vec!["1em"]);
    }

    #[test]
    fn test_names() {
        assert_eq!(texts("-webkit-box #main @media --x"), vec!["-webkit-box", " ", "#main", " ", "@media", " ", "--x"]);
        assert_eq!(
            kinds("#fff @import"),
            vec![TokenKind::Hash, TokenKind::Whitespace, TokenKind::AtKeyword]
        );
    }

    #[test]
    fn test_comments_dropped_unless_important() {
        assert_eq!(texts("a/* x */b"), vec!["a", "b"]);
        let mut tokenizer = tokenize("/*! keep */a", None).with_important_comments(true);
        let token = tokenizer.next_token();
        assert_eq!(token.kind, TokenKind::ImportantComment);
        assert_eq!(token.text, "/*! keep */");
    }

    #[test]
    fn test_url_and_function() {
        assert_eq!(texts("url( img/a.png )"), vec!["url(img/a.png)"]);
        assert_eq!(kinds("url('a.png')"), vec![TokenKind::Function, TokenKind::String, TokenKind::CloseParen]);
        assert_eq!(kinds("rgb(1,2,3)")[0], TokenKind::Function);
    }

    #[test]
    fn test_expression_captures_script() {
        let mut tokenizer = tokenize("expression(a ? (b) : ')')", None);
        let token = tokenizer.next_token();
        assert_eq!(token.kind, TokenKind::Expression);
        assert_eq!(token.text, "a ? (b) : ')'");
        assert_eq!(tokenizer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_unterminated_string_reported() {
        let mut tokenizer = tokenize("'open\nb", Some("site.css"));
        let token = tokenizer.next_token();
        assert_eq!(token.kind, TokenKind::Error);
        let errors = tokenizer.take_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::UnterminatedString);
        assert_eq!(errors[0].file_name, "site.css");
        assert_eq!(tokenizer.next_token().kind, TokenKind::Whitespace);
    }

    #[test]
    fn test_unterminated_comment_reported() {
        let mut tokenizer = tokenize("a /* open", None);
        assert_eq!(tokenizer.next_token().kind, TokenKind::Ident);
        assert_eq!(tokenizer.next_token().kind, TokenKind::Whitespace);
        assert_eq!(tokenizer.next_token().kind, TokenKind::Eof);
        assert_eq!(tokenizer.take_errors()[0].code, ErrorCode::UnterminatedComment);
    }

    #[test]
    fn test_spans_track_lines() {
        let mut tokenizer = tokenize("a\n  b", None);
        tokenizer.next_token();
        tokenizer.next_token();
        let b = tokenizer.next_token();
        assert_eq!((b.span.start_line, b.span.start_column), (2, 3));
    }
}
