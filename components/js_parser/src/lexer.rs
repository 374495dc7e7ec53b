//! JavaScript Lexer - tokenizes source code into a lazy stream of tokens
//!
//! The lexer never fails. Text it cannot read becomes a [`TokenKind::Error`]
//! token plus a [`ContextError`], and scanning resumes right after it.

use core_types::{ContextError, ErrorCode, SourceSpan};
use std::sync::Arc;

/// Reserved words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// break keyword
    Break,
    /// case keyword
    Case,
    /// catch keyword
    Catch,
    /// class keyword
    Class,
    /// const keyword
    Const,
    /// continue keyword
    Continue,
    /// debugger keyword
    Debugger,
    /// default keyword
    Default,
    /// delete keyword
    Delete,
    /// do keyword
    Do,
    /// else keyword
    Else,
    /// export keyword
    Export,
    /// extends keyword
    Extends,
    /// finally keyword
    Finally,
    /// for keyword
    For,
    /// function keyword
    Function,
    /// if keyword
    If,
    /// import keyword
    Import,
    /// in keyword
    In,
    /// instanceof keyword
    Instanceof,
    /// new keyword
    New,
    /// return keyword
    Return,
    /// super keyword
    Super,
    /// switch keyword
    Switch,
    /// this keyword
    This,
    /// throw keyword
    Throw,
    /// try keyword
    Try,
    /// typeof keyword
    Typeof,
    /// var keyword
    Var,
    /// void keyword
    Void,
    /// while keyword
    While,
    /// with keyword
    With,
    /// true literal
    True,
    /// false literal
    False,
    /// null literal
    Null,
    // Note: let, static, async, await, yield, of, get and set are contextual
    // and arrive as identifiers.
}

impl Keyword {
    /// Look up a reserved word
    pub fn lookup(word: &str) -> Option<Keyword> {
        let keyword = match word {
            "break" => Keyword::Break,
            "case" => Keyword::Case,
            "catch" => Keyword::Catch,
            "class" => Keyword::Class,
            "const" => Keyword::Const,
            "continue" => Keyword::Continue,
            "debugger" => Keyword::Debugger,
            "default" => Keyword::Default,
            "delete" => Keyword::Delete,
            "do" => Keyword::Do,
            "else" => Keyword::Else,
            "export" => Keyword::Export,
            "extends" => Keyword::Extends,
            "finally" => Keyword::Finally,
            "for" => Keyword::For,
            "function" => Keyword::Function,
            "if" => Keyword::If,
            "import" => Keyword::Import,
            "in" => Keyword::In,
            "instanceof" => Keyword::Instanceof,
            "new" => Keyword::New,
            "return" => Keyword::Return,
            "super" => Keyword::Super,
            "switch" => Keyword::Switch,
            "this" => Keyword::This,
            "throw" => Keyword::Throw,
            "try" => Keyword::Try,
            "typeof" => Keyword::Typeof,
            "var" => Keyword::Var,
            "void" => Keyword::Void,
            "while" => Keyword::While,
            "with" => Keyword::With,
            "true" => Keyword::True,
            "false" => Keyword::False,
            "null" => Keyword::Null,
            _ => return None,
        };
        Some(keyword)
    }

    /// Source text of the keyword
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Break => "break",
            Keyword::Case => "case",
            Keyword::Catch => "catch",
            Keyword::Class => "class",
            Keyword::Const => "const",
            Keyword::Continue => "continue",
            Keyword::Debugger => "debugger",
            Keyword::Default => "default",
            Keyword::Delete => "delete",
            Keyword::Do => "do",
            Keyword::Else => "else",
            Keyword::Export => "export",
            Keyword::Extends => "extends",
            Keyword::Finally => "finally",
            Keyword::For => "for",
            Keyword::Function => "function",
            Keyword::If => "if",
            Keyword::Import => "import",
            Keyword::In => "in",
            Keyword::Instanceof => "instanceof",
            Keyword::New => "new",
            Keyword::Return => "return",
            Keyword::Super => "super",
            Keyword::Switch => "switch",
            Keyword::This => "this",
            Keyword::Throw => "throw",
            Keyword::Try => "try",
            Keyword::Typeof => "typeof",
            Keyword::Var => "var",
            Keyword::Void => "void",
            Keyword::While => "while",
            Keyword::With => "with",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
        }
    }

    /// Keywords that begin a statement, used as recovery points.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            Keyword::Break
                | Keyword::Class
                | Keyword::Const
                | Keyword::Continue
                | Keyword::Debugger
                | Keyword::Do
                | Keyword::For
                | Keyword::Function
                | Keyword::If
                | Keyword::Return
                | Keyword::Switch
                | Keyword::Throw
                | Keyword::Try
                | Keyword::Var
                | Keyword::While
                | Keyword::With
        )
    }
}

/// JavaScript punctuators (operators and delimiters)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuator {
    /// Opening parenthesis
    LParen,
    /// Closing parenthesis
    RParen,
    /// Opening brace
    LBrace,
    /// Closing brace
    RBrace,
    /// Opening bracket
    LBracket,
    /// Closing bracket
    RBracket,
    /// Semicolon
    Semicolon,
    /// Comma
    Comma,
    /// Dot
    Dot,
    /// Spread operator
    Spread,
    /// Optional chaining
    OptionalChain,
    /// Colon
    Colon,
    /// Question mark
    Question,
    /// Assignment
    Assign,
    /// Arrow function
    Arrow,
    /// Plus
    Plus,
    /// Minus
    Minus,
    /// Multiply
    Star,
    /// Divide
    Slash,
    /// Modulo
    Percent,
    /// Exponentiation
    StarStar,
    /// Equality
    EqEq,
    /// Strict equality
    EqEqEq,
    /// Inequality
    NotEq,
    /// Strict inequality
    NotEqEq,
    /// Less than
    Lt,
    /// Less than or equal
    LtEq,
    /// Greater than
    Gt,
    /// Greater than or equal
    GtEq,
    /// Logical AND
    AndAnd,
    /// Logical OR
    OrOr,
    /// Nullish coalescing
    NullishCoalesce,
    /// Logical NOT
    Not,
    /// Bitwise AND
    And,
    /// Bitwise OR
    Or,
    /// Bitwise XOR
    Xor,
    /// Bitwise NOT
    Tilde,
    /// Left shift
    LtLt,
    /// Right shift
    GtGt,
    /// Unsigned right shift
    GtGtGt,
    /// Plus equals
    PlusEq,
    /// Minus equals
    MinusEq,
    /// Multiply equals
    StarEq,
    /// Divide equals
    SlashEq,
    /// Modulo equals
    PercentEq,
    /// Exponentiation equals
    StarStarEq,
    /// Bitwise AND equals
    AndEq,
    /// Bitwise OR equals
    OrEq,
    /// Bitwise XOR equals
    XorEq,
    /// Left shift equals
    LtLtEq,
    /// Right shift equals
    GtGtEq,
    /// Unsigned right shift equals
    GtGtGtEq,
    /// Logical AND equals
    AndAndEq,
    /// Logical OR equals
    OrOrEq,
    /// Nullish coalescing equals
    NullishCoalesceEq,
    /// Increment
    PlusPlus,
    /// Decrement
    MinusMinus,
}

impl Punctuator {
    /// Source text of the punctuator
    pub fn as_str(self) -> &'static str {
        match self {
            Punctuator::LParen => "(",
            Punctuator::RParen => ")",
            Punctuator::LBrace => "{",
            Punctuator::RBrace => "}",
            Punctuator::LBracket => "[",
            Punctuator::RBracket => "]",
            Punctuator::Semicolon => ";",
            Punctuator::Comma => ",",
            Punctuator::Dot => ".",
            Punctuator::Spread => "...",
            Punctuator::OptionalChain => "?.",
            Punctuator::Colon => ":",
            Punctuator::Question => "?",
            Punctuator::Assign => "=",
            Punctuator::Arrow => "=>",
            Punctuator::Plus => "+",
            Punctuator::Minus => "-",
            Punctuator::Star => "*",
            Punctuator::Slash => "/",
            Punctuator::Percent => "%",
            Punctuator::StarStar => "**",
            Punctuator::EqEq => "==",
            Punctuator::EqEqEq => "===",
            Punctuator::NotEq => "!=",
            Punctuator::NotEqEq => "!==",
            Punctuator::Lt => "<",
            Punctuator::LtEq => "<=",
            Punctuator::Gt => ">",
            Punctuator::GtEq => ">=",
            Punctuator::AndAnd => "&&",
            Punctuator::OrOr => "||",
            Punctuator::NullishCoalesce => "??",
            Punctuator::Not => "!",
            Punctuator::And => "&",
            Punctuator::Or => "|",
            Punctuator::Xor => "^",
            Punctuator::Tilde => "~",
            Punctuator::LtLt => "<<",
            Punctuator::GtGt => ">>",
            Punctuator::GtGtGt => ">>>",
            Punctuator::PlusEq => "+=",
            Punctuator::MinusEq => "-=",
            Punctuator::StarEq => "*=",
            Punctuator::SlashEq => "/=",
            Punctuator::PercentEq => "%=",
            Punctuator::StarStarEq => "**=",
            Punctuator::AndEq => "&=",
            Punctuator::OrEq => "|=",
            Punctuator::XorEq => "^=",
            Punctuator::LtLtEq => "<<=",
            Punctuator::GtGtEq => ">>=",
            Punctuator::GtGtGtEq => ">>>=",
            Punctuator::AndAndEq => "&&=",
            Punctuator::OrOrEq => "||=",
            Punctuator::NullishCoalesceEq => "??=",
            Punctuator::PlusPlus => "++",
            Punctuator::MinusMinus => "--",
        }
    }
}

/// Which piece of a template literal a template token is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatePart {
    /// `` `text` ``
    NoSubstitution,
    /// `` `text${ ``
    Head,
    /// `}text${`
    Middle,
    /// `` }text` ``
    Tail,
}

/// Kind tag of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier, including contextual keywords. Text is the decoded name.
    Identifier,
    /// `#name` in a class body. Text includes the `#`.
    PrivateName,
    /// Reserved word
    Keyword(Keyword),
    /// Operator or delimiter
    Punctuator(Punctuator),
    /// Numeric literal, raw text
    Number,
    /// BigInt literal, raw text including the `n`
    BigInt,
    /// String literal, raw text including quotes
    String,
    /// Template piece, raw text between its delimiters
    Template(TemplatePart),
    /// Regular expression literal, raw text `/body/flags`
    RegExp,
    /// A `/*! ... */` comment that should survive minification
    ImportantComment,
    /// Text that could not be tokenized; already reported
    Error,
    /// End of input
    Eof,
}

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Kind tag
    pub kind: TokenKind,
    /// Literal text, see [`TokenKind`] for what each kind stores
    pub text: String,
    /// Cooked value of a string literal. `None` when the literal holds
    /// something a Rust string cannot (a lone surrogate escape).
    pub value: Option<String>,
    /// Where the token came from
    pub span: SourceSpan,
    /// A line terminator separates this token from the previous one.
    /// Automatic semicolon insertion depends on this.
    pub newline_before: bool,
}

impl Token {
    /// Whether this is the given punctuator
    pub fn is_punct(&self, p: Punctuator) -> bool {
        self.kind == TokenKind::Punctuator(p)
    }

    /// Whether this is the given keyword
    pub fn is_keyword(&self, k: Keyword) -> bool {
        self.kind == TokenKind::Keyword(k)
    }

    /// Whether this is an identifier with the given name
    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == name
    }

    /// Short description for error messages
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::String => "string".to_string(),
            TokenKind::Number | TokenKind::BigInt => "number".to_string(),
            TokenKind::Template(_) => "template".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

/// Tokenize `source`. Tokens are produced on demand.
///
/// ```
/// use js_parser::{tokenize, TokenKind};
///
/// let kinds: Vec<TokenKind> = tokenize("a + 1", None).map(|t| t.kind).collect();
/// assert_eq!(kinds.len(), 4); // a, +, 1, end of input
/// assert_eq!(kinds[3], TokenKind::Eof);
/// ```
pub fn tokenize<'a>(source: &'a str, file_name: Option<&str>) -> Lexer<'a> {
    Lexer::new(source, file_name)
}

/// Lexer for JavaScript source code
pub struct Lexer<'a> {
    source: &'a str,
    chars: Vec<char>,
    position: usize,
    offset: usize,
    line: u32,
    column: u32,
    file: Option<Arc<str>>,
    errors: Vec<ContextError>,
    /// Brace depth at each open template substitution
    template_stack: Vec<usize>,
    brace_depth: usize,
    regex_allowed: bool,
    /// Start of the last token when it was `/` or `/=`
    slash_start: Option<(usize, Mark, bool)>,
    pending_newline: bool,
    preserve_important_comments: bool,
    finished: bool,
}

#[derive(Clone, Copy)]
struct Mark {
    line: u32,
    column: u32,
    offset: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str, file_name: Option<&str>) -> Self {
        let mut lexer = Self {
            source,
            chars: source.chars().collect(),
            position: 0,
            offset: 0,
            line: 1,
            column: 1,
            file: file_name.map(Arc::from),
            errors: Vec::new(),
            template_stack: Vec::new(),
            brace_depth: 0,
            regex_allowed: true,
            slash_start: None,
            pending_newline: false,
            preserve_important_comments: false,
            finished: false,
        };
        lexer.skip_hashbang();
        lexer
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

    /// Skip hashbang comment (#!) at the beginning of the source
    fn skip_hashbang(&mut self) {
        if self.peek() == '#' && self.peek_next() == Some('!') {
            while !self.is_at_end() && !is_line_terminator(self.peek()) {
                self.advance();
            }
        }
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Token {
        let newline = self.skip_trivia();
        let newline_before = newline || std::mem::take(&mut self.pending_newline);
        let start = self.mark();

        if self.is_at_end() {
            return self.make(TokenKind::Eof, start, newline_before);
        }

        if self.preserve_important_comments && self.at_important_comment() {
            let token = self.scan_important_comment(start, newline_before);
            self.pending_newline = newline_before || token.text.contains('\n');
            return token;
        }

        let position = self.position;
        let token = self.scan_token(start, newline_before);
        self.regex_allowed = regex_allowed_after(&token);
        self.slash_start = match token.kind {
            TokenKind::Punctuator(Punctuator::Slash | Punctuator::SlashEq) => {
                Some((position, start, newline_before))
            }
            _ => None,
        };
        token
    }

    /// Scan the `/` or `/=` token just returned again, as a regular
    /// expression. The parser calls this where an operand is expected.
    /// Returns `None` when the last token was something else.
    pub fn rescan_regexp(&mut self) -> Option<Token> {
        let (position, start, newline_before) = self.slash_start.take()?;
        self.position = position;
        self.offset = start.offset;
        self.line = start.line;
        self.column = start.column;
        let token = self.scan_regexp(start, newline_before);
        self.regex_allowed = false;
        Some(token)
    }

    fn scan_token(&mut self, start: Mark, newline_before: bool) -> Token {
        let ch = self.peek();

        if ch == '}' {
            if let Some(&depth) = self.template_stack.last() {
                if depth == self.brace_depth {
                    self.template_stack.pop();
                    self.advance();
                    return self.scan_template(start, newline_before, true);
                }
            }
        }
        if is_id_start(ch) || ch == '\\' {
            return self.scan_identifier(start, newline_before);
        }
        if ch.is_ascii_digit() || (ch == '.' && self.peek_next().is_some_and(|c| c.is_ascii_digit())) {
            return self.scan_number(start, newline_before);
        }

        match ch {
            '"' | '\'' => self.scan_string(start, newline_before),
            '`' => {
                self.advance();
                self.scan_template(start, newline_before, false)
            }
            '#' if self.peek_next().is_some_and(is_id_start) => {
                self.advance();
                while is_id_continue(self.peek()) && !self.is_at_end() {
                    self.advance();
                }
                self.make(TokenKind::PrivateName, start, newline_before)
            }
            '/' if self.regex_allowed => self.scan_regexp(start, newline_before),
            _ => match self.scan_punctuator() {
                Some(p) => {
                    match p {
                        Punctuator::LBrace => self.brace_depth += 1,
                        Punctuator::RBrace => self.brace_depth = self.brace_depth.saturating_sub(1),
                        _ => {}
                    }
                    self.make(TokenKind::Punctuator(p), start, newline_before)
                }
                None => {
                    self.advance();
                    self.error_token(
                        start,
                        newline_before,
                        ErrorCode::UnexpectedCharacter,
                        format!("Unexpected character '{}'", ch.escape_default()),
                    )
                }
            },
        }
    }

    fn scan_punctuator(&mut self) -> Option<Punctuator> {
        use Punctuator as P;
        let ch = self.advance();
        let p = match ch {
            '(' => P::LParen,
            ')' => P::RParen,
            '{' => P::LBrace,
            '}' => P::RBrace,
            '[' => P::LBracket,
            ']' => P::RBracket,
            ';' => P::Semicolon,
            ',' => P::Comma,
            ':' => P::Colon,
            '~' => P::Tilde,
            '.' => {
                if self.peek() == '.' && self.peek_next() == Some('.') {
                    self.advance();
                    self.advance();
                    P::Spread
                } else {
                    P::Dot
                }
            }
            '?' => {
                if self.match_char('?') {
                    if self.match_char('=') {
                        P::NullishCoalesceEq
                    } else {
                        P::NullishCoalesce
                    }
                } else if self.peek() == '.' && !self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                    // `a?.5:b` is a conditional, not optional chaining
                    self.advance();
                    P::OptionalChain
                } else {
                    P::Question
                }
            }
            '=' => {
                if self.match_char('>') {
                    P::Arrow
                } else if self.match_char('=') {
                    if self.match_char('=') {
                        P::EqEqEq
                    } else {
                        P::EqEq
                    }
                } else {
                    P::Assign
                }
            }
            '+' => self.one_of(&[('+', P::PlusPlus), ('=', P::PlusEq)], P::Plus),
            '-' => self.one_of(&[('-', P::MinusMinus), ('=', P::MinusEq)], P::Minus),
            '*' => {
                if self.match_char('*') {
                    self.one_of(&[('=', P::StarStarEq)], P::StarStar)
                } else {
                    self.one_of(&[('=', P::StarEq)], P::Star)
                }
            }
            '/' => self.one_of(&[('=', P::SlashEq)], P::Slash),
            '%' => self.one_of(&[('=', P::PercentEq)], P::Percent),
            '^' => self.one_of(&[('=', P::XorEq)], P::Xor),
            '!' => {
                if self.match_char('=') {
                    self.one_of(&[('=', P::NotEqEq)], P::NotEq)
                } else {
                    P::Not
                }
            }
            '<' => {
                if self.match_char('<') {
                    self.one_of(&[('=', P::LtLtEq)], P::LtLt)
                } else {
                    self.one_of(&[('=', P::LtEq)], P::Lt)
                }
            }
            '>' => {
                if self.match_char('>') {
                    if self.match_char('>') {
                        self.one_of(&[('=', P::GtGtGtEq)], P::GtGtGt)
                    } else {
                        self.one_of(&[('=', P::GtGtEq)], P::GtGt)
                    }
                } else {
                    self.one_of(&[('=', P::GtEq)], P::Gt)
                }
            }
            '&' => {
                if self.match_char('&') {
                    self.one_of(&[('=', P::AndAndEq)], P::AndAnd)
                } else {
                    self.one_of(&[('=', P::AndEq)], P::And)
                }
            }
            '|' => {
                if self.match_char('|') {
                    self.one_of(&[('=', P::OrOrEq)], P::OrOr)
                } else {
                    self.one_of(&[('=', P::OrEq)], P::Or)
                }
            }
            _ => {
                // Give the character back so the caller can report it.
                self.retreat(ch);
                return None;
            }
        };
        Some(p)
    }

    fn one_of(&mut self, options: &[(char, Punctuator)], fallback: Punctuator) -> Punctuator {
        for &(ch, p) in options {
            if self.match_char(ch) {
                return p;
            }
        }
        fallback
    }

    fn scan_identifier(&mut self, start: Mark, newline_before: bool) -> Token {
        let mut name = String::new();
        let mut escaped = false;
        loop {
            let ch = self.peek();
            if self.is_at_end() {
                break;
            }
            if ch == '\\' {
                escaped = true;
                match self.scan_identifier_escape() {
                    Some(decoded) => name.push(decoded),
                    None => {
                        return self.error_token(
                            start,
                            newline_before,
                            ErrorCode::UnexpectedCharacter,
                            "Invalid escape sequence in identifier",
                        )
                    }
                }
            } else if (name.is_empty() && is_id_start(ch)) || (!name.is_empty() && is_id_continue(ch)) {
                name.push(self.advance());
            } else {
                break;
            }
        }

        let kind = match Keyword::lookup(&name) {
            // An escaped keyword is still a keyword to the grammar, but we
            // keep it as an identifier so the output spells it the same way.
            Some(k) if !escaped => TokenKind::Keyword(k),
            _ => TokenKind::Identifier,
        };
        let mut token = self.make(kind, start, newline_before);
        token.text = name;
        token
    }

    fn scan_identifier_escape(&mut self) -> Option<char> {
        self.advance(); // backslash
        if !self.match_char('u') {
            return None;
        }
        let code = if self.match_char('{') {
            let mut hex = String::new();
            while !self.is_at_end() && self.peek() != '}' {
                hex.push(self.advance());
            }
            if !self.match_char('}') {
                return None;
            }
            u32::from_str_radix(&hex, 16).ok()?
        } else {
            let mut hex = String::new();
            for _ in 0..4 {
                if !self.peek().is_ascii_hexdigit() {
                    return None;
                }
                hex.push(self.advance());
            }
            u32::from_str_radix(&hex, 16).ok()?
        };
        char::from_u32(code).filter(|c| is_id_continue(*c))
    }

    fn scan_number(&mut self, start: Mark, newline_before: bool) -> Token {
        let first = self.advance();
        if first == '0' && matches!(self.peek(), 'x' | 'X' | 'o' | 'O' | 'b' | 'B') {
            let radix = match self.advance().to_ascii_lowercase() {
                'x' => 16,
                'o' => 8,
                _ => 2,
            };
            let mut digits = 0;
            while self.peek().is_digit(radix) || self.peek() == '_' {
                self.advance();
                digits += 1;
            }
            if digits == 0 {
                return self.error_token(start, newline_before, ErrorCode::InvalidNumber, "Missing digits after radix prefix");
            }
        } else {
            if first != '.' {
                self.scan_digits();
                if self.peek() == '.' {
                    self.advance();
                    self.scan_digits();
                }
            } else {
                self.scan_digits();
            }
            if matches!(self.peek(), 'e' | 'E') {
                let sign = matches!(self.peek_next(), Some('+') | Some('-'));
                let digit_at = if sign { 2 } else { 1 };
                if self.char_at(self.position + digit_at).is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                    if sign {
                        self.advance();
                    }
                    self.scan_digits();
                } else {
                    self.advance();
                    return self.error_token(start, newline_before, ErrorCode::InvalidNumber, "Missing exponent digits");
                }
            }
        }

        let kind = if self.match_char('n') {
            TokenKind::BigInt
        } else {
            TokenKind::Number
        };
        if is_id_start(self.peek()) && !self.is_at_end() {
            // `3in x` is fine in old engines but `3x` never is
            while is_id_continue(self.peek()) && !self.is_at_end() {
                self.advance();
            }
            return self.error_token(start, newline_before, ErrorCode::InvalidNumber, "Identifier starts immediately after numeric literal");
        }
        self.make(kind, start, newline_before)
    }

    fn scan_digits(&mut self) {
        while self.peek().is_ascii_digit() || (self.peek() == '_' && self.peek_next().is_some_and(|c| c.is_ascii_digit())) {
            self.advance();
        }
    }

    fn scan_string(&mut self, start: Mark, newline_before: bool) -> Token {
        let quote = self.advance();
        let mut value = String::new();
        let mut lossless = true;

        loop {
            if self.is_at_end() || matches!(self.peek(), '\n' | '\r') {
                return self.error_token(start, newline_before, ErrorCode::UnterminatedString, "Unterminated string literal");
            }
            let ch = self.advance();
            if ch == quote {
                break;
            }
            if ch != '\\' {
                value.push(ch);
                continue;
            }
            if self.is_at_end() {
                continue;
            }
            let escaped = self.advance();
            match escaped {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                'b' => value.push('\u{8}'),
                'f' => value.push('\u{c}'),
                'v' => value.push('\u{b}'),
                '\r' => {
                    self.match_char('\n');
                    self.newline();
                }
                '\n' | '\u{2028}' | '\u{2029}' => self.newline(),
                'x' => match self.read_hex(2) {
                    Some(c) => value.push(c),
                    None => lossless = false,
                },
                'u' => match self.read_unicode_escape() {
                    Some(c) => value.push(c),
                    None => lossless = false,
                },
                '0'..='7' => {
                    let mut code = escaped.to_digit(8).unwrap_or(0);
                    let max_len = if escaped <= '3' { 3 } else { 2 };
                    let mut len = 1;
                    while len < max_len && self.peek().is_digit(8) {
                        code = code * 8 + self.advance().to_digit(8).unwrap_or(0);
                        len += 1;
                    }
                    match char::from_u32(code) {
                        Some(c) => value.push(c),
                        None => lossless = false,
                    }
                }
                other => value.push(other),
            }
        }

        let mut token = self.make(TokenKind::String, start, newline_before);
        token.value = lossless.then_some(value);
        token
    }

    fn read_hex(&mut self, len: usize) -> Option<char> {
        let mut code = 0u32;
        for _ in 0..len {
            let digit = self.peek().to_digit(16)?;
            self.advance();
            code = code * 16 + digit;
        }
        char::from_u32(code)
    }

    /// Reads the part after `\u`. Surrogate pairs written as two escapes are
    /// combined; a lone surrogate yields `None`.
    fn read_unicode_escape(&mut self) -> Option<char> {
        if self.match_char('{') {
            let mut code = 0u32;
            while self.peek().is_ascii_hexdigit() {
                code = code.checked_mul(16)? + self.advance().to_digit(16)?;
            }
            if !self.match_char('}') {
                return None;
            }
            return char::from_u32(code);
        }
        let high = self.read_hex_code(4)?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high);
        }
        if self.peek() == '\\' && self.peek_next() == Some('u') {
            self.advance();
            self.advance();
            let low = self.read_hex_code(4)?;
            if (0xDC00..0xE000).contains(&low) {
                return char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00));
            }
        }
        None
    }

    fn read_hex_code(&mut self, len: usize) -> Option<u32> {
        let mut code = 0u32;
        for _ in 0..len {
            let digit = self.peek().to_digit(16)?;
            self.advance();
            code = code * 16 + digit;
        }
        Some(code)
    }

    /// Scan template text after its opening delimiter (`` ` `` or `}`).
    fn scan_template(&mut self, start: Mark, newline_before: bool, continuation: bool) -> Token {
        let text_start = self.offset;
        loop {
            if self.is_at_end() {
                return self.error_token(start, newline_before, ErrorCode::UnterminatedTemplate, "Unterminated template literal");
            }
            let ch = self.advance();
            match ch {
                '\\' => {
                    if !self.is_at_end() {
                        let escaped = self.advance();
                        if is_line_terminator(escaped) {
                            self.newline();
                        }
                    }
                }
                '\n' | '\u{2028}' | '\u{2029}' => self.newline(),
                '\r' => {
                    self.match_char('\n');
                    self.newline();
                }
                '`' => {
                    let text = self.source[text_start..self.offset - 1].to_string();
                    let part = if continuation { TemplatePart::Tail } else { TemplatePart::NoSubstitution };
                    let mut token = self.make(TokenKind::Template(part), start, newline_before);
                    token.text = text;
                    return token;
                }
                '$' if self.peek() == '{' => {
                    self.advance();
                    let text = self.source[text_start..self.offset - 2].to_string();
                    self.template_stack.push(self.brace_depth);
                    let part = if continuation { TemplatePart::Middle } else { TemplatePart::Head };
                    let mut token = self.make(TokenKind::Template(part), start, newline_before);
                    token.text = text;
                    return token;
                }
                _ => {}
            }
        }
    }

    fn scan_regexp(&mut self, start: Mark, newline_before: bool) -> Token {
        self.advance(); // opening slash
        let mut in_class = false;
        loop {
            if self.is_at_end() || is_line_terminator(self.peek()) {
                return self.error_token(start, newline_before, ErrorCode::UnterminatedRegExp, "Unterminated regular expression literal");
            }
            let ch = self.advance();
            match ch {
                '\\' => {
                    if !self.is_at_end() && !is_line_terminator(self.peek()) {
                        self.advance();
                    }
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
        }
        while is_id_continue(self.peek()) && !self.is_at_end() {
            self.advance();
        }
        self.make(TokenKind::RegExp, start, newline_before)
    }

    fn at_important_comment(&self) -> bool {
        self.peek() == '/' && self.peek_next() == Some('*') && self.char_at(self.position + 2) == Some('!')
    }

    fn scan_important_comment(&mut self, start: Mark, newline_before: bool) -> Token {
        self.advance();
        self.advance();
        let closed = self.skip_block_comment_body();
        if !closed {
            self.report_unterminated_comment(&start);
        }
        self.make(TokenKind::ImportantComment, start, newline_before)
    }

    /// Skip whitespace and comments. Returns whether a line terminator was
    /// crossed.
    fn skip_trivia(&mut self) -> bool {
        let mut newline = false;
        while !self.is_at_end() {
            match self.peek() {
                '\n' | '\u{2028}' | '\u{2029}' => {
                    self.advance();
                    self.newline();
                    newline = true;
                }
                '\r' => {
                    self.advance();
                    self.match_char('\n');
                    self.newline();
                    newline = true;
                }
                c if is_whitespace(c) => {
                    self.advance();
                }
                '/' if self.peek_next() == Some('/') => {
                    while !self.is_at_end() && !is_line_terminator(self.peek()) {
                        self.advance();
                    }
                }
                '/' if self.peek_next() == Some('*') => {
                    if self.preserve_important_comments && self.at_important_comment() {
                        break;
                    }
                    let start = self.mark();
                    let line_before = self.line;
                    self.advance();
                    self.advance();
                    if !self.skip_block_comment_body() {
                        self.report_unterminated_comment(&start);
                    }
                    newline |= self.line > line_before;
                }
                _ => break,
            }
        }
        newline
    }

    /// Skip to just past `*/`. Returns false if the input ended first.
    fn skip_block_comment_body(&mut self) -> bool {
        while !self.is_at_end() {
            let ch = self.advance();
            match ch {
                '*' if self.peek() == '/' => {
                    self.advance();
                    return true;
                }
                '\n' | '\u{2028}' | '\u{2029}' => self.newline(),
                '\r' => {
                    self.match_char('\n');
                    self.newline();
                }
                _ => {}
            }
        }
        false
    }

    fn report_unterminated_comment(&mut self, start: &Mark) {
        let span = self.span_from(start);
        self.errors.push(ContextError::new(
            ErrorCode::UnterminatedComment,
            "Unterminated multi-line comment",
            &span.start(),
        ));
    }

    fn error_token(
        &mut self,
        start: Mark,
        newline_before: bool,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Token {
        let token = self.make(TokenKind::Error, start, newline_before);
        self.errors.push(ContextError::new(code, message, &token.span));
        token
    }

    fn make(&self, kind: TokenKind, start: Mark, newline_before: bool) -> Token {
        let span = self.span_from(&start);
        Token {
            kind,
            text: self.source[start.offset..self.offset].to_string(),
            value: None,
            span,
            newline_before,
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

    fn newline(&mut self) {
        self.line += 1;
        self.column = 1;
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> char {
        self.char_at(self.position).unwrap_or('\0')
    }

    fn peek_next(&self) -> Option<char> {
        self.char_at(self.position + 1)
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.position];
        self.position += 1;
        self.offset += ch.len_utf8();
        self.column += 1;
        ch
    }

    fn retreat(&mut self, ch: char) {
        self.position -= 1;
        self.offset -= ch.len_utf8();
        self.column -= 1;
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.chars[self.position] != expected {
            false
        } else {
            self.advance();
            true
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}

/// After these tokens a `/` starts a regular expression rather than a division.
fn regex_allowed_after(token: &Token) -> bool {
    match token.kind {
        TokenKind::Identifier
        | TokenKind::PrivateName
        | TokenKind::Number
        | TokenKind::BigInt
        | TokenKind::String
        | TokenKind::RegExp
        | TokenKind::Template(TemplatePart::NoSubstitution)
        | TokenKind::Template(TemplatePart::Tail) => false,
        TokenKind::Keyword(k) => !matches!(
            k,
            Keyword::This | Keyword::Super | Keyword::True | Keyword::False | Keyword::Null
        ),
        TokenKind::Punctuator(p) => !matches!(
            p,
            Punctuator::RParen
                | Punctuator::RBracket
                | Punctuator::RBrace
                | Punctuator::PlusPlus
                | Punctuator::MinusMinus
        ),
        _ => true,
    }
}

/// Check if character is a line terminator (per ECMAScript spec)
pub(crate) fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{000B}' | '\u{000C}' | '\u{00A0}' | '\u{FEFF}' | '\u{1680}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}')
}

/// Check if a character may start an identifier
pub fn is_id_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphabetic()
}

/// Check if a character may continue an identifier
pub fn is_id_continue(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphanumeric() || ch == '\u{200C}' || ch == '\u{200D}'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source, None).map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<String> {
        tokenize(source, None)
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_lexer_empty_source() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_lexer_iterator_ends_after_eof() {
        let mut lexer = tokenize("x", None);
        assert!(lexer.next().is_some());
        assert_eq!(lexer.next().map(|t| t.kind), Some(TokenKind::Eof));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_lexer_keywords_and_contextual_words() {
        assert_eq!(
            kinds("var let"),
            vec![TokenKind::Keyword(Keyword::Var), TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn test_lexer_punctuators() {
        assert_eq!(texts("a >>>= b ?? c?.d ... =>"), vec!["a", ">>>=", "b", "??", "c", "?.", "d", "...", "=>"]);
    }

    #[test]
    fn test_optional_chain_not_before_digit() {
        assert_eq!(texts("a?.5:1"), vec!["a", "?", ".5", ":", "1"]);
    }

    #[test]
    fn test_lexer_numbers() {
        assert_eq!(texts("0x1F 1e3 .5 1_000 10n"), vec!["0x1F", "1e3", ".5", "1_000", "10n"]);
        assert_eq!(kinds("10n")[0], TokenKind::BigInt);
    }

    #[test]
    fn test_string_value_is_cooked() {
        let token = tokenize(r#"'a\nb\x41B\u{43}'"#, None).next().unwrap();
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.value.as_deref(), Some("a\nbABC"));
        assert_eq!(token.text, r#"'a\nb\x41B\u{43}'"#);
    }

    #[test]
    fn test_lone_surrogate_is_not_lossless() {
        let token = tokenize(r#""\uD800""#, None).next().unwrap();
        assert_eq!(token.value, None);
    }

    #[test]
    fn test_newline_before_flag() {
        let tokens: Vec<Token> = tokenize("a\nb /* x\n */ c d", None).collect();
        assert!(!tokens[0].newline_before);
        assert!(tokens[1].newline_before);
        assert!(tokens[2].newline_before);
        assert!(!tokens[3].newline_before);
    }

    #[test]
    fn test_regex_versus_division() {
        assert_eq!(kinds("a / b")[1], TokenKind::Punctuator(Punctuator::Slash));
        assert_eq!(kinds("x = /a[/]b/gi")[2], TokenKind::RegExp);
        assert_eq!(texts("x = /a[/]b/gi")[2], "/a[/]b/gi");
        assert_eq!(kinds("(a) / 2")[3], TokenKind::Punctuator(Punctuator::Slash));
    }

    #[test]
    fn test_rescan_slash_as_regexp() {
        let mut lexer = tokenize("f() /=b/g.test(s)", None);
        let kinds: Vec<TokenKind> = (0..4).map(|_| lexer.next_token().kind).collect();
        assert_eq!(kinds[3], TokenKind::Punctuator(Punctuator::SlashEq));
        let token = lexer.rescan_regexp().map(|t| (t.kind, t.text, t.span.start_column));
        assert_eq!(token, Some((TokenKind::RegExp, "/=b/g".to_string(), 5)));
        assert!(lexer.next_token().is_punct(Punctuator::Dot));
        assert!(lexer.rescan_regexp().is_none());
    }

    #[test]
    fn test_template_with_substitutions() {
        let tokens: Vec<Token> = tokenize("`a${b}c${ {d} }e`", None).collect();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Template(TemplatePart::Head),
                TokenKind::Identifier,
                TokenKind::Template(TemplatePart::Middle),
                TokenKind::Punctuator(Punctuator::LBrace),
                TokenKind::Identifier,
                TokenKind::Punctuator(Punctuator::RBrace),
                TokenKind::Template(TemplatePart::Tail),
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[0].text, "a");
        assert_eq!(tokens[6].text, "e");
    }

    #[test]
    fn test_unterminated_string_reports_at_start() {
        let mut lexer = tokenize("x = \"abc\ny", Some("t.js"));
        let tokens: Vec<Token> = lexer.by_ref().collect();
        assert_eq!(tokens[2].kind, TokenKind::Error);
        assert_eq!(tokens[3].text, "y");
        let errors = lexer.take_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::UnterminatedString);
        assert_eq!((errors[0].start_line, errors[0].start_column), (1, 5));
        assert_eq!(errors[0].file_name, "t.js");
    }

    #[test]
    fn test_bad_character_is_isolated() {
        let mut lexer = tokenize("a @ b", None);
        let kinds: Vec<TokenKind> = lexer.by_ref().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Identifier, TokenKind::Error, TokenKind::Identifier, TokenKind::Eof]
        );
        assert_eq!(lexer.take_errors().len(), 1);
    }

    #[test]
    fn test_important_comment_token() {
        let tokens: Vec<Token> = tokenize("/*! keep */ a /* drop */", None)
            .with_important_comments(true)
            .collect();
        assert_eq!(tokens[0].kind, TokenKind::ImportantComment);
        assert_eq!(tokens[0].text, "/*! keep */");
        assert_eq!(tokens[1].text, "a");
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    }

    #[test]
    fn test_spans_track_lines_and_columns() {
        let tokens: Vec<Token> = tokenize("let x\n  = 42;", None).collect();
        let num = &tokens[3];
        assert_eq!(num.text, "42");
        assert_eq!((num.span.start_line, num.span.start_column), (2, 5));
        assert_eq!(num.span.end_column, 7);
        assert_eq!(num.span.start_offset, 10);
    }

    #[test]
    fn test_unicode_escape_in_identifier() {
        let tokens: Vec<Token> = tokenize("\\u0061b", None).collect();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].text, "ab");
    }
}
