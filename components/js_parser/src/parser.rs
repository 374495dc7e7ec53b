//! Recursive descent parser for JavaScript
//!
//! Grammar failures are plain [`ParseResult`] errors internally. The
//! statement-list loop catches them, records one diagnostic per malformed
//! statement and resynchronizes, so [`parse`] itself always returns a
//! [`Program`].

use crate::ast::*;
use crate::error::*;
use crate::lexer::{Keyword, Lexer, Punctuator, TemplatePart, Token, TokenKind};
use crate::settings::{OutputFormat, ScriptSettings};
use core_types::{ContextError, Diagnostics, ErrorCode, SourceSpan};
use std::collections::VecDeque;

/// Parse a token stream into a [`Program`].
///
/// In JSON format the whole input is a single expression.
pub fn parse(lexer: Lexer<'_>, settings: &ScriptSettings, diagnostics: &mut Diagnostics) -> Program {
    let json = settings.format == OutputFormat::Json;
    let lexer = lexer.with_important_comments(settings.preserve_important_comments && !json);
    let mut parser = Parser::new(lexer, diagnostics);
    let program = if json {
        parser.parse_json()
    } else {
        parser.parse_program()
    };
    log::debug!("parsed {} top-level statements", program.body.len());
    program
}

/// Where a statement list stops
#[derive(Clone, Copy, PartialEq, Eq)]
enum ListEnd {
    /// End of input only
    Eof,
    /// A closing brace
    Brace,
    /// `case`, `default` or a closing brace
    Case,
}

/// Binary and logical operators share one precedence table
#[derive(Clone, Copy)]
enum InfixOperator {
    Binary(BinaryOperator),
    Logical(LogicalOperator),
}

impl InfixOperator {
    fn precedence(self) -> u8 {
        match self {
            InfixOperator::Binary(op) => op.precedence(),
            InfixOperator::Logical(op) => op.precedence(),
        }
    }
}

/// JavaScript parser
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    diagnostics: &'a mut Diagnostics,
    lookahead: VecDeque<Token>,
    pending_comments: Vec<Token>,
    previous_span: SourceSpan,
    consumed: usize,
    /// Inside a function body (return allowed)
    in_function: bool,
    /// Inside a generator (yield is an operator)
    in_generator: bool,
    /// Inside an async function (await is an operator)
    in_async: bool,
    /// In a for-loop head, where `in` is not a relational operator
    no_in: bool,
}

impl<'a> Parser<'a> {
    /// Create a new parser over a token stream
    pub fn new(lexer: Lexer<'a>, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            lexer,
            diagnostics,
            lookahead: VecDeque::new(),
            pending_comments: Vec::new(),
            previous_span: SourceSpan::synthetic(),
            consumed: 0,
            in_function: false,
            in_generator: false,
            in_async: false,
            no_in: false,
        }
    }

    /// Parse a whole script
    pub fn parse_program(&mut self) -> Program {
        let start = self.start_span();
        let body = self.parse_statement_list(ListEnd::Eof);
        Program {
            body,
            span: self.finish(&start),
        }
    }

    /// Parse the input as a single JSON value
    pub fn parse_json(&mut self) -> Program {
        let start = self.start_span();
        let mark = self.diagnostics.len();
        let expression = match self.parse_assignment() {
            Ok(expr) if self.peek_kind() == TokenKind::Eof => expr,
            Ok(_) => {
                let err = self.unexpected("end of input");
                self.report(err, mark, &start);
                Expression::Error {
                    span: self.finish(&start),
                }
            }
            Err(err) => {
                self.report(err, mark, &start);
                Expression::Error {
                    span: self.finish(&start),
                }
            }
        };
        let span = self.finish(&start);
        Program {
            body: vec![Statement::ExpressionStatement {
                expression,
                span: span.clone(),
            }],
            span,
        }
    }

    // ----- token access -----

    fn fill(&mut self, index: usize) {
        while self.lookahead.len() <= index {
            let token = self.lexer.next_token();
            self.diagnostics.extend(self.lexer.take_errors());
            if token.kind == TokenKind::ImportantComment {
                self.pending_comments.push(token);
            } else {
                self.lookahead.push_back(token);
            }
        }
    }

    fn peek(&mut self) -> &Token {
        self.fill(0);
        &self.lookahead[0]
    }

    fn peek_at(&mut self, index: usize) -> &Token {
        self.fill(index);
        &self.lookahead[index]
    }

    fn peek_kind(&mut self) -> TokenKind {
        self.peek().kind
    }

    fn check_punct(&mut self, p: Punctuator) -> bool {
        self.peek().is_punct(p)
    }

    fn check_keyword(&mut self, k: Keyword) -> bool {
        self.peek().is_keyword(k)
    }

    fn check_ident(&mut self, name: &str) -> bool {
        self.peek().is_ident(name)
    }

    fn advance(&mut self) -> Token {
        self.fill(0);
        let token = self
            .lookahead
            .pop_front()
            .unwrap_or_else(|| self.eof_token());
        if token.kind != TokenKind::Eof {
            self.consumed += 1;
            self.previous_span = token.span.clone();
        }
        token
    }

    /// Turn a `/` or `/=` at the front of the lookahead into a regular
    /// expression token, when nothing past it has been scanned yet.
    fn rescan_regexp(&mut self) -> bool {
        if self.lookahead.len() != 1 {
            return false;
        }
        let Some(token) = self.lexer.rescan_regexp() else {
            return false;
        };
        self.diagnostics.extend(self.lexer.take_errors());
        self.lookahead[0] = token;
        true
    }

    fn eof_token(&self) -> Token {
        Token {
            kind: TokenKind::Eof,
            text: String::new(),
            value: None,
            span: self.previous_span.clone(),
            newline_before: false,
        }
    }

    fn eat_punct(&mut self, p: Punctuator) -> bool {
        if self.check_punct(p) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, p: Punctuator) -> ParseResult<Token> {
        if self.check_punct(p) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("'{}'", p.as_str())))
        }
    }

    fn expect_keyword(&mut self, k: Keyword) -> ParseResult<Token> {
        if self.check_keyword(k) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("'{}'", k.as_str())))
        }
    }

    /// Error for the current token not being what the grammar needs
    fn unexpected(&mut self, expected: &str) -> ParseError {
        let token = self.peek();
        match token.kind {
            TokenKind::Error => lexer_reported(&token.span),
            TokenKind::Eof => unexpected_eof(&token.span),
            _ => unexpected_token(expected, &token.describe(), &token.span),
        }
    }

    fn start_span(&mut self) -> SourceSpan {
        self.peek().span.clone()
    }

    fn finish(&self, start: &SourceSpan) -> SourceSpan {
        if self.previous_span.end_offset < start.start_offset {
            return start.start();
        }
        start.to(&self.previous_span)
    }

    /// Automatic semicolon insertion
    fn consume_semicolon(&mut self) -> ParseResult<()> {
        let token = self.peek();
        if token.is_punct(Punctuator::Semicolon) {
            self.advance();
            return Ok(());
        }
        if token.is_punct(Punctuator::RBrace) || token.kind == TokenKind::Eof || token.newline_before {
            return Ok(());
        }
        Err(self.unexpected("';'"))
    }

    // ----- statement lists and recovery -----

    fn parse_statement_list(&mut self, end: ListEnd) -> Vec<Statement> {
        let mut body = Vec::new();
        loop {
            self.flush_comments(&mut body);
            let token = self.peek();
            let at_end = match token.kind {
                TokenKind::Eof => true,
                TokenKind::Punctuator(Punctuator::RBrace) => end != ListEnd::Eof,
                TokenKind::Keyword(Keyword::Case) | TokenKind::Keyword(Keyword::Default) => {
                    end == ListEnd::Case
                }
                _ => false,
            };
            if at_end {
                break;
            }
            if token.is_punct(Punctuator::RBrace) {
                let span = token.span.clone();
                self.diagnostics.push(ContextError::new(
                    ErrorCode::SyntaxError,
                    "Unexpected '}'",
                    &span,
                ));
                self.advance();
                continue;
            }

            let start = self.start_span();
            let mark = self.diagnostics.len();
            let consumed = self.consumed;
            match self.parse_statement() {
                // A lone delimiter after a line break parses as an empty
                // expression statement.
                Ok(_) if self.consumed == consumed => self.synchronize(consumed),
                Ok(statement) => body.push(statement),
                Err(err) => {
                    self.report(err, mark, &start);
                    self.synchronize(consumed);
                }
            }
        }
        self.flush_comments(&mut body);
        body
    }

    fn flush_comments(&mut self, body: &mut Vec<Statement>) {
        for token in self.pending_comments.drain(..) {
            body.push(Statement::ImportantComment {
                text: token.text,
                span: token.span,
            });
        }
    }

    /// Record `err` unless something inside the statement was already reported.
    fn report(&mut self, err: ParseError, mark: usize, start: &SourceSpan) {
        if err.reported || self.diagnostics.len() > mark {
            log::trace!("suppressed follow-on error: {}", err);
            return;
        }
        let span = if err.span.is_synthetic() {
            start.clone()
        } else {
            start.to(&err.span)
        };
        self.diagnostics.push(err.to_context_error(&span));
    }

    /// Panic-mode recovery: skip to a statement boundary.
    fn synchronize(&mut self, statement_start: usize) {
        let mut depth = 0usize;
        loop {
            let kind = self.peek_kind();
            match kind {
                TokenKind::Eof => break,
                TokenKind::Punctuator(Punctuator::Semicolon) if depth == 0 => {
                    self.advance();
                    break;
                }
                TokenKind::Punctuator(Punctuator::RBrace) if depth == 0 => break,
                TokenKind::Keyword(k)
                    if depth == 0 && k.starts_statement() && self.consumed > statement_start =>
                {
                    break
                }
                TokenKind::Punctuator(Punctuator::LBrace)
                | TokenKind::Punctuator(Punctuator::LParen)
                | TokenKind::Punctuator(Punctuator::LBracket) => depth += 1,
                TokenKind::Punctuator(Punctuator::RBrace)
                | TokenKind::Punctuator(Punctuator::RParen)
                | TokenKind::Punctuator(Punctuator::RBracket) => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
        // Always make progress, or the statement loop would spin.
        if self.consumed == statement_start && self.peek_kind() != TokenKind::Eof && !self.check_punct(Punctuator::RBrace) {
            self.advance();
        }
    }

    // ----- statements -----

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        let kind = self.peek_kind();
        match kind {
            TokenKind::Keyword(Keyword::Var) => self.parse_variable_statement(VariableKind::Var),
            TokenKind::Keyword(Keyword::Const) => self.parse_variable_statement(VariableKind::Const),
            TokenKind::Identifier if self.check_ident("let") && self.is_let_declaration() => {
                self.parse_variable_statement(VariableKind::Let)
            }
            TokenKind::Keyword(Keyword::Function) => self.parse_function_declaration(false),
            TokenKind::Identifier if self.is_async_function() => {
                self.advance();
                self.parse_function_declaration(true)
            }
            TokenKind::Keyword(Keyword::Class) => {
                let start = self.start_span();
                let class = self.parse_class(true)?;
                Ok(Statement::ClassDeclaration {
                    class,
                    span: self.finish(&start),
                })
            }
            TokenKind::Keyword(Keyword::If) => self.parse_if_statement(),
            TokenKind::Keyword(Keyword::For) => self.parse_for_statement(),
            TokenKind::Keyword(Keyword::While) => self.parse_while_statement(),
            TokenKind::Keyword(Keyword::Do) => self.parse_do_while_statement(),
            TokenKind::Keyword(Keyword::Return) => self.parse_return_statement(),
            TokenKind::Keyword(Keyword::Break) | TokenKind::Keyword(Keyword::Continue) => {
                self.parse_jump_statement()
            }
            TokenKind::Keyword(Keyword::Throw) => self.parse_throw_statement(),
            TokenKind::Keyword(Keyword::Try) => self.parse_try_statement(),
            TokenKind::Keyword(Keyword::Switch) => self.parse_switch_statement(),
            TokenKind::Keyword(Keyword::With) => self.parse_with_statement(),
            TokenKind::Keyword(Keyword::Debugger) => {
                let start = self.start_span();
                self.advance();
                self.consume_semicolon()?;
                Ok(Statement::DebuggerStatement {
                    span: self.finish(&start),
                })
            }
            TokenKind::Keyword(Keyword::Import) | TokenKind::Keyword(Keyword::Export) => {
                let span = self.start_span();
                Err(syntax_error("Module import/export declarations are not supported", &span))
            }
            TokenKind::Punctuator(Punctuator::LBrace) => {
                let start = self.start_span();
                let body = self.parse_block_body()?;
                Ok(Statement::BlockStatement {
                    body,
                    span: self.finish(&start),
                })
            }
            TokenKind::Punctuator(Punctuator::Semicolon) => {
                let token = self.advance();
                Ok(Statement::EmptyStatement { span: token.span })
            }
            TokenKind::Identifier if self.peek_at(1).is_punct(Punctuator::Colon) => {
                let start = self.start_span();
                let label = self.advance().text;
                self.advance();
                let body = self.parse_statement()?;
                Ok(Statement::LabeledStatement {
                    label,
                    body: Box::new(body),
                    span: self.finish(&start),
                })
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// `let` starts a declaration only when a binding follows it
    fn is_let_declaration(&mut self) -> bool {
        let next = self.peek_at(1);
        matches!(
            next.kind,
            TokenKind::Identifier
                | TokenKind::Punctuator(Punctuator::LBracket)
                | TokenKind::Punctuator(Punctuator::LBrace)
        )
    }

    fn is_async_function(&mut self) -> bool {
        if !self.check_ident("async") {
            return false;
        }
        let next = self.peek_at(1);
        next.is_keyword(Keyword::Function) && !next.newline_before
    }

    fn parse_block_body(&mut self) -> ParseResult<Vec<Statement>> {
        self.expect_punct(Punctuator::LBrace)?;
        let body = self.parse_statement_list(ListEnd::Brace);
        self.expect_punct(Punctuator::RBrace)?;
        Ok(body)
    }

    fn parse_variable_statement(&mut self, kind: VariableKind) -> ParseResult<Statement> {
        let start = self.start_span();
        self.advance();
        let declarations = self.parse_declarators()?;
        self.consume_semicolon()?;
        Ok(Statement::VariableDeclaration {
            kind,
            declarations,
            span: self.finish(&start),
        })
    }

    fn parse_declarators(&mut self) -> ParseResult<Vec<VariableDeclarator>> {
        let mut declarations = Vec::new();
        loop {
            let start = self.start_span();
            let id = self.parse_binding_target()?;
            let init = if self.eat_punct(Punctuator::Assign) {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            declarations.push(VariableDeclarator {
                id,
                init,
                span: self.finish(&start),
            });
            if !self.eat_punct(Punctuator::Comma) {
                break;
            }
        }
        Ok(declarations)
    }

    fn parse_function_declaration(&mut self, is_async: bool) -> ParseResult<Statement> {
        let start = self.start_span();
        let function = self.parse_function(is_async, true)?;
        Ok(Statement::FunctionDeclaration {
            function,
            span: self.finish(&start),
        })
    }

    fn parse_if_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_span();
        self.advance();
        let test = self.parse_paren_expression()?;
        let consequent = Box::new(self.parse_statement()?);
        let alternate = if self.check_keyword(Keyword::Else) {
            self.advance();
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Statement::IfStatement {
            test,
            consequent,
            alternate,
            span: self.finish(&start),
        })
    }

    fn parse_paren_expression(&mut self) -> ParseResult<Expression> {
        self.expect_punct(Punctuator::LParen)?;
        let expr = self.with_in_allowed(Self::parse_expression)?;
        self.expect_punct(Punctuator::RParen)?;
        Ok(expr)
    }

    fn parse_while_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_span();
        self.advance();
        let test = self.parse_paren_expression()?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::WhileStatement {
            test,
            body,
            span: self.finish(&start),
        })
    }

    fn parse_do_while_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_span();
        self.advance();
        let body = Box::new(self.parse_statement()?);
        self.expect_keyword(Keyword::While)?;
        let test = self.parse_paren_expression()?;
        // The semicolon after do-while is always optional.
        self.eat_punct(Punctuator::Semicolon);
        Ok(Statement::DoWhileStatement {
            body,
            test,
            span: self.finish(&start),
        })
    }

    fn parse_for_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_span();
        self.advance();
        let is_await = self.in_async && self.check_ident("await");
        if is_await {
            self.advance();
        }
        self.expect_punct(Punctuator::LParen)?;

        let declaration_kind = match self.peek_kind() {
            TokenKind::Keyword(Keyword::Var) => Some(VariableKind::Var),
            TokenKind::Keyword(Keyword::Const) => Some(VariableKind::Const),
            TokenKind::Identifier if self.check_ident("let") && self.is_let_declaration() => {
                Some(VariableKind::Let)
            }
            _ => None,
        };

        let mut init = None;
        if let Some(kind) = declaration_kind {
            self.advance();
            let decl_start = self.start_span();
            let id = self.parse_binding_target()?;
            if self.check_keyword(Keyword::In) || self.check_ident("of") {
                let left = ForInOfLeft::VariableDeclaration { kind, id };
                return self.parse_for_in_of(left, is_await, start);
            }
            let first_init = if self.eat_punct(Punctuator::Assign) {
                Some(self.without_in(Self::parse_assignment)?)
            } else {
                None
            };
            let mut declarations = vec![VariableDeclarator {
                id,
                init: first_init,
                span: self.finish(&decl_start),
            }];
            if self.eat_punct(Punctuator::Comma) {
                declarations.extend(self.without_in(Self::parse_declarators)?);
            }
            init = Some(ForInit::VariableDeclaration { kind, declarations });
        } else if !self.check_punct(Punctuator::Semicolon) {
            let expr = self.without_in(Self::parse_expression)?;
            if self.check_keyword(Keyword::In) || self.check_ident("of") {
                let left = ForInOfLeft::Pattern(self.to_pattern(expr)?);
                return self.parse_for_in_of(left, is_await, start);
            }
            init = Some(ForInit::Expression(expr));
        }

        self.expect_punct(Punctuator::Semicolon)?;
        let test = if self.check_punct(Punctuator::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punct(Punctuator::Semicolon)?;
        let update = if self.check_punct(Punctuator::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punct(Punctuator::RParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::ForStatement {
            init,
            test,
            update,
            body,
            span: self.finish(&start),
        })
    }

    fn parse_for_in_of(&mut self, left: ForInOfLeft, is_await: bool, start: SourceSpan) -> ParseResult<Statement> {
        let is_of = self.check_ident("of");
        self.advance();
        let right = if is_of {
            self.parse_assignment()?
        } else {
            self.parse_expression()?
        };
        self.expect_punct(Punctuator::RParen)?;
        let body = Box::new(self.parse_statement()?);
        let span = self.finish(&start);
        Ok(if is_of {
            Statement::ForOfStatement {
                left,
                right,
                body,
                is_await,
                span,
            }
        } else {
            Statement::ForInStatement {
                left,
                right,
                body,
                span,
            }
        })
    }

    fn parse_return_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_span();
        self.advance();
        let argument = if self.at_statement_end() {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon()?;
        Ok(Statement::ReturnStatement {
            argument,
            span: self.finish(&start),
        })
    }

    /// Whether ASI would end a restricted production here
    fn at_statement_end(&mut self) -> bool {
        let token = self.peek();
        token.is_punct(Punctuator::Semicolon)
            || token.is_punct(Punctuator::RBrace)
            || token.kind == TokenKind::Eof
            || token.newline_before
    }

    fn parse_jump_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_span();
        let is_break = self.advance().is_keyword(Keyword::Break);
        let label = if self.peek_kind() == TokenKind::Identifier && !self.peek().newline_before {
            Some(self.advance().text)
        } else {
            None
        };
        self.consume_semicolon()?;
        let span = self.finish(&start);
        Ok(if is_break {
            Statement::BreakStatement { label, span }
        } else {
            Statement::ContinueStatement { label, span }
        })
    }

    fn parse_throw_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_span();
        self.advance();
        if self.peek().newline_before {
            let span = self.start_span();
            return Err(syntax_error("Illegal newline after throw", &span));
        }
        let argument = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Statement::ThrowStatement {
            argument,
            span: self.finish(&start),
        })
    }

    fn parse_try_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_span();
        self.advance();
        let block = self.parse_block_body()?;

        let handler = if self.check_keyword(Keyword::Catch) {
            let catch_start = self.start_span();
            self.advance();
            let param = if self.eat_punct(Punctuator::LParen) {
                let param = self.parse_binding_target()?;
                self.expect_punct(Punctuator::RParen)?;
                Some(param)
            } else {
                None
            };
            let body = self.parse_block_body()?;
            Some(CatchClause {
                param,
                body,
                span: self.finish(&catch_start),
            })
        } else {
            None
        };

        let finalizer = if self.check_keyword(Keyword::Finally) {
            self.advance();
            Some(self.parse_block_body()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.unexpected("'catch' or 'finally'"));
        }
        Ok(Statement::TryStatement {
            block,
            handler,
            finalizer,
            span: self.finish(&start),
        })
    }

    fn parse_switch_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_span();
        self.advance();
        let discriminant = self.parse_paren_expression()?;
        self.expect_punct(Punctuator::LBrace)?;
        let mut cases = Vec::new();
        while !self.check_punct(Punctuator::RBrace) {
            let case_start = self.start_span();
            let test = if self.check_keyword(Keyword::Case) {
                self.advance();
                Some(self.parse_expression()?)
            } else {
                self.expect_keyword(Keyword::Default)?;
                None
            };
            self.expect_punct(Punctuator::Colon)?;
            let consequent = self.parse_statement_list(ListEnd::Case);
            cases.push(SwitchCase {
                test,
                consequent,
                span: self.finish(&case_start),
            });
            if self.peek_kind() == TokenKind::Eof {
                break;
            }
        }
        self.expect_punct(Punctuator::RBrace)?;
        Ok(Statement::SwitchStatement {
            discriminant,
            cases,
            span: self.finish(&start),
        })
    }

    fn parse_with_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_span();
        self.advance();
        let object = self.parse_paren_expression()?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::WithStatement {
            object,
            body,
            span: self.finish(&start),
        })
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        let start = self.start_span();
        let expression = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Statement::ExpressionStatement {
            expression,
            span: self.finish(&start),
        })
    }

    // ----- functions and classes -----

    /// Parse `function [*] [name] (params) { body }`
    fn parse_function(&mut self, is_async: bool, require_name: bool) -> ParseResult<Function> {
        self.expect_keyword(Keyword::Function)?;
        let is_generator = self.eat_punct(Punctuator::Star);
        let id = if self.peek_kind() == TokenKind::Identifier {
            let token = self.advance();
            Some(Identifier::new(token.text, token.span))
        } else if require_name {
            return Err(self.unexpected("function name"));
        } else {
            None
        };
        let (params, body) = self.parse_function_rest(is_async, is_generator)?;
        Ok(Function {
            id,
            params,
            body,
            is_async,
            is_generator,
        })
    }

    /// Parameters and body, in a fresh function context
    fn parse_function_rest(&mut self, is_async: bool, is_generator: bool) -> ParseResult<(Vec<Pattern>, Vec<Statement>)> {
        let saved = (self.in_function, self.in_async, self.in_generator, self.no_in);
        self.in_function = true;
        self.in_async = is_async;
        self.in_generator = is_generator;
        self.no_in = false;
        let result = self
            .parse_formal_params()
            .and_then(|params| Ok((params, self.parse_block_body()?)));
        (self.in_function, self.in_async, self.in_generator, self.no_in) = saved;
        result
    }

    fn parse_formal_params(&mut self) -> ParseResult<Vec<Pattern>> {
        self.expect_punct(Punctuator::LParen)?;
        let mut params = Vec::new();
        while !self.check_punct(Punctuator::RParen) {
            if self.check_punct(Punctuator::Spread) {
                let start = self.start_span();
                self.advance();
                let argument = self.parse_binding_target()?;
                params.push(Pattern::RestElement {
                    argument: Box::new(argument),
                    span: self.finish(&start),
                });
                break;
            }
            params.push(self.parse_binding_element()?);
            if !self.eat_punct(Punctuator::Comma) {
                break;
            }
        }
        self.expect_punct(Punctuator::RParen)?;
        Ok(params)
    }

    fn parse_class(&mut self, require_name: bool) -> ParseResult<Class> {
        self.expect_keyword(Keyword::Class)?;
        let id = if self.peek_kind() == TokenKind::Identifier {
            let token = self.advance();
            Some(Identifier::new(token.text, token.span))
        } else if require_name {
            return Err(self.unexpected("class name"));
        } else {
            None
        };
        let super_class = if self.check_keyword(Keyword::Extends) {
            self.advance();
            Some(Box::new(self.parse_lhs_expression()?))
        } else {
            None
        };

        self.expect_punct(Punctuator::LBrace)?;
        let mut body = Vec::new();
        while !self.check_punct(Punctuator::RBrace) {
            if self.eat_punct(Punctuator::Semicolon) {
                continue;
            }
            if self.peek_kind() == TokenKind::Eof {
                return Err(self.unexpected("'}'"));
            }
            body.push(self.parse_class_element()?);
        }
        self.expect_punct(Punctuator::RBrace)?;
        Ok(Class {
            id,
            super_class,
            body,
        })
    }

    /// Whether an identifier at the current position is a modifier
    /// (`static`, `get`, `set`, `async`) rather than a member name.
    fn is_modifier(&mut self) -> bool {
        let next = self.peek_at(1);
        !(next.is_punct(Punctuator::LParen)
            || next.is_punct(Punctuator::Assign)
            || next.is_punct(Punctuator::Semicolon)
            || next.is_punct(Punctuator::RBrace)
            || next.is_punct(Punctuator::Comma)
            || next.is_punct(Punctuator::Colon)
            || next.kind == TokenKind::Eof)
    }

    fn parse_class_element(&mut self) -> ParseResult<ClassElement> {
        let start = self.start_span();
        let is_static = self.check_ident("static") && self.is_modifier();
        if is_static {
            self.advance();
            if self.check_punct(Punctuator::LBrace) {
                let saved = self.in_function;
                self.in_function = false;
                let body = self.parse_block_body();
                self.in_function = saved;
                return Ok(ClassElement::StaticBlock {
                    body: body?,
                    span: self.finish(&start),
                });
            }
        }

        let (kind, is_async, is_generator) = self.parse_method_modifiers();
        let (key, _) = self.parse_property_key()?;

        if self.check_punct(Punctuator::LParen) || kind != MethodKind::Method || is_async || is_generator {
            let (params, body) = self.parse_function_rest(is_async, is_generator)?;
            let kind = match &key {
                PropertyKey::Identifier(name) if name == "constructor" && !is_static && kind == MethodKind::Method => {
                    MethodKind::Constructor
                }
                _ => kind,
            };
            return Ok(ClassElement::Method {
                key,
                kind,
                function: Function {
                    id: None,
                    params,
                    body,
                    is_async,
                    is_generator,
                },
                is_static,
                span: self.finish(&start),
            });
        }

        let value = if self.eat_punct(Punctuator::Assign) {
            Some(self.with_in_allowed(Self::parse_assignment)?)
        } else {
            None
        };
        self.consume_semicolon()?;
        Ok(ClassElement::Property {
            key,
            value,
            is_static,
            span: self.finish(&start),
        })
    }

    /// Reads `get`/`set`/`async`/`*` prefixes of a method.
    fn parse_method_modifiers(&mut self) -> (MethodKind, bool, bool) {
        let mut kind = MethodKind::Method;
        let mut is_async = false;
        if self.check_ident("async") && self.is_modifier() && !self.peek_at(1).newline_before {
            self.advance();
            is_async = true;
        } else if (self.check_ident("get") || self.check_ident("set")) && self.is_modifier() && !self.peek_at(1).is_punct(Punctuator::Star) {
            kind = if self.advance().text == "get" {
                MethodKind::Get
            } else {
                MethodKind::Set
            };
        }
        let is_generator = kind == MethodKind::Method && self.eat_punct(Punctuator::Star);
        (kind, is_async, is_generator)
    }

    /// Returns the key and whether it was written as a plain identifier.
    fn parse_property_key(&mut self) -> ParseResult<(PropertyKey, bool)> {
        let token = self.peek().clone();
        let key = match token.kind {
            TokenKind::Identifier => {
                self.advance();
                return Ok((PropertyKey::Identifier(token.text), true));
            }
            TokenKind::Keyword(_) => PropertyKey::Identifier(token.text),
            TokenKind::String => PropertyKey::String {
                value: token.value,
                raw: token.text,
            },
            TokenKind::Number => PropertyKey::Number {
                value: parse_number(&token.text),
                raw: token.text,
            },
            TokenKind::BigInt => PropertyKey::Identifier(token.text),
            TokenKind::PrivateName => PropertyKey::Private(token.text),
            TokenKind::Punctuator(Punctuator::LBracket) => {
                self.advance();
                let expr = self.with_in_allowed(Self::parse_assignment)?;
                self.expect_punct(Punctuator::RBracket)?;
                return Ok((PropertyKey::Computed(Box::new(expr)), false));
            }
            _ => return Err(self.unexpected("property name")),
        };
        self.advance();
        Ok((key, false))
    }

    // ----- binding patterns -----

    fn parse_binding_target(&mut self) -> ParseResult<Pattern> {
        match self.peek_kind() {
            TokenKind::Identifier => {
                let token = self.advance();
                Ok(Pattern::Identifier(Identifier::new(token.text, token.span)))
            }
            TokenKind::Punctuator(Punctuator::LBracket) => self.parse_array_binding(),
            TokenKind::Punctuator(Punctuator::LBrace) => self.parse_object_binding(),
            _ => Err(self.unexpected("binding name")),
        }
    }

    fn parse_binding_element(&mut self) -> ParseResult<Pattern> {
        let start = self.start_span();
        let target = self.parse_binding_target()?;
        if self.eat_punct(Punctuator::Assign) {
            let right = self.with_in_allowed(Self::parse_assignment)?;
            return Ok(Pattern::AssignmentPattern {
                left: Box::new(target),
                right: Box::new(right),
                span: self.finish(&start),
            });
        }
        Ok(target)
    }

    fn parse_array_binding(&mut self) -> ParseResult<Pattern> {
        let start = self.start_span();
        self.expect_punct(Punctuator::LBracket)?;
        let mut elements = Vec::new();
        while !self.check_punct(Punctuator::RBracket) {
            if self.eat_punct(Punctuator::Comma) {
                elements.push(None);
                continue;
            }
            if self.check_punct(Punctuator::Spread) {
                let rest_start = self.start_span();
                self.advance();
                let argument = self.parse_binding_target()?;
                elements.push(Some(Pattern::RestElement {
                    argument: Box::new(argument),
                    span: self.finish(&rest_start),
                }));
                break;
            }
            elements.push(Some(self.parse_binding_element()?));
            if !self.eat_punct(Punctuator::Comma) {
                break;
            }
        }
        self.expect_punct(Punctuator::RBracket)?;
        Ok(Pattern::ArrayPattern {
            elements,
            span: self.finish(&start),
        })
    }

    fn parse_object_binding(&mut self) -> ParseResult<Pattern> {
        let start = self.start_span();
        self.expect_punct(Punctuator::LBrace)?;
        let mut properties = Vec::new();
        let mut rest = None;
        while !self.check_punct(Punctuator::RBrace) {
            if self.eat_punct(Punctuator::Spread) {
                rest = Some(Box::new(self.parse_binding_target()?));
                break;
            }
            let key_span = self.start_span();
            let (key, plain) = self.parse_property_key()?;
            let property = if self.eat_punct(Punctuator::Colon) {
                ObjectPatternProperty {
                    key,
                    value: self.parse_binding_element()?,
                    shorthand: false,
                }
            } else {
                let PropertyKey::Identifier(name) = &key else {
                    return Err(self.unexpected("':'"));
                };
                if !plain {
                    return Err(self.unexpected("':'"));
                }
                let mut value = Pattern::Identifier(Identifier::new(name.clone(), key_span.clone()));
                if self.eat_punct(Punctuator::Assign) {
                    let right = self.with_in_allowed(Self::parse_assignment)?;
                    value = Pattern::AssignmentPattern {
                        left: Box::new(value),
                        right: Box::new(right),
                        span: self.finish(&key_span),
                    };
                }
                ObjectPatternProperty {
                    key,
                    value,
                    shorthand: true,
                }
            };
            properties.push(property);
            if !self.eat_punct(Punctuator::Comma) {
                break;
            }
        }
        self.expect_punct(Punctuator::RBrace)?;
        Ok(Pattern::ObjectPattern {
            properties,
            rest,
            span: self.finish(&start),
        })
    }

    /// Reinterpret a parsed expression as a pattern (arrow parameters,
    /// destructuring assignment, for-in/of heads).
    fn to_pattern(&self, expr: Expression) -> ParseResult<Pattern> {
        match expr {
            Expression::Identifier(id) => Ok(Pattern::Identifier(id)),
            Expression::MemberExpression { .. } => Ok(Pattern::Expression(Box::new(expr))),
            Expression::AssignmentExpression {
                left,
                operator: AssignmentOperator::Assign,
                right,
                span,
            } => {
                let left = match left {
                    AssignmentTarget::Identifier(id) => Pattern::Identifier(id),
                    AssignmentTarget::Member(member) => Pattern::Expression(member),
                    AssignmentTarget::Pattern(pattern) => pattern,
                };
                Ok(Pattern::AssignmentPattern {
                    left: Box::new(left),
                    right,
                    span,
                })
            }
            Expression::ArrayExpression { elements, span } => {
                let count = elements.len();
                let mut patterns = Vec::with_capacity(count);
                for (index, element) in elements.into_iter().enumerate() {
                    let pattern = match element {
                        None => None,
                        Some(Expression::SpreadElement { argument, span }) if index + 1 == count => {
                            Some(Pattern::RestElement {
                                argument: Box::new(self.to_pattern(*argument)?),
                                span,
                            })
                        }
                        Some(element) => Some(self.to_pattern(element)?),
                    };
                    patterns.push(pattern);
                }
                Ok(Pattern::ArrayPattern {
                    elements: patterns,
                    span,
                })
            }
            Expression::ObjectExpression { properties, span } => {
                let count = properties.len();
                let mut converted = Vec::with_capacity(count);
                let mut rest = None;
                for (index, property) in properties.into_iter().enumerate() {
                    match property {
                        ObjectProperty::Property {
                            key,
                            value,
                            shorthand,
                            ..
                        } => converted.push(ObjectPatternProperty {
                            key,
                            value: self.to_pattern(value)?,
                            shorthand,
                        }),
                        ObjectProperty::Spread { argument, .. } if index + 1 == count => {
                            rest = Some(Box::new(self.to_pattern(argument)?));
                        }
                        ObjectProperty::Spread { span, .. } | ObjectProperty::Method { span, .. } => {
                            return Err(invalid_target(&span));
                        }
                    }
                }
                Ok(Pattern::ObjectPattern {
                    properties: converted,
                    rest,
                    span,
                })
            }
            other => Err(invalid_target(other.span())),
        }
    }

    // ----- expressions -----

    fn with_in_allowed<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = f(self);
        self.no_in = saved;
        result
    }

    fn without_in<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let saved = std::mem::replace(&mut self.no_in, true);
        let result = f(self);
        self.no_in = saved;
        result
    }

    /// Parse a comma-separated expression
    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_span();
        let first = self.parse_assignment()?;
        if !self.check_punct(Punctuator::Comma) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat_punct(Punctuator::Comma) {
            expressions.push(self.parse_assignment()?);
        }
        Ok(Expression::SequenceExpression {
            expressions,
            span: self.finish(&start),
        })
    }

    /// Parse an assignment-level expression
    pub fn parse_assignment(&mut self) -> ParseResult<Expression> {
        if self.in_generator && self.check_ident("yield") {
            return self.parse_yield();
        }

        let start = self.start_span();
        let left = self.parse_conditional()?;
        let Some(operator) = self.peek_assignment_operator() else {
            return Ok(left);
        };

        let target = match left {
            Expression::Identifier(id) => AssignmentTarget::Identifier(id),
            Expression::MemberExpression { .. } => AssignmentTarget::Member(Box::new(left)),
            Expression::ArrayExpression { .. } | Expression::ObjectExpression { .. }
                if operator == AssignmentOperator::Assign =>
            {
                AssignmentTarget::Pattern(self.to_pattern(left)?)
            }
            other => return Err(invalid_target(other.span())),
        };
        self.advance();
        let right = self.parse_assignment()?;
        Ok(Expression::AssignmentExpression {
            left: target,
            operator,
            right: Box::new(right),
            span: self.finish(&start),
        })
    }

    fn peek_assignment_operator(&mut self) -> Option<AssignmentOperator> {
        use AssignmentOperator as A;
        let TokenKind::Punctuator(p) = self.peek_kind() else {
            return None;
        };
        let op = match p {
            Punctuator::Assign => A::Assign,
            Punctuator::PlusEq => A::AddAssign,
            Punctuator::MinusEq => A::SubAssign,
            Punctuator::StarEq => A::MulAssign,
            Punctuator::SlashEq => A::DivAssign,
            Punctuator::PercentEq => A::ModAssign,
            Punctuator::StarStarEq => A::ExpAssign,
            Punctuator::AndEq => A::BitAndAssign,
            Punctuator::OrEq => A::BitOrAssign,
            Punctuator::XorEq => A::BitXorAssign,
            Punctuator::LtLtEq => A::LeftShiftAssign,
            Punctuator::GtGtEq => A::RightShiftAssign,
            Punctuator::GtGtGtEq => A::UnsignedRightShiftAssign,
            Punctuator::AndAndEq => A::LogicalAndAssign,
            Punctuator::OrOrEq => A::LogicalOrAssign,
            Punctuator::NullishCoalesceEq => A::NullishCoalesceAssign,
            _ => return None,
        };
        Some(op)
    }

    fn parse_yield(&mut self) -> ParseResult<Expression> {
        let start = self.start_span();
        self.advance();
        let delegate = !self.peek().newline_before && self.eat_punct(Punctuator::Star);
        let ends = {
            let token = self.peek();
            token.newline_before && !delegate
                || matches!(
                    token.kind,
                    TokenKind::Eof
                        | TokenKind::Punctuator(
                            Punctuator::RParen
                                | Punctuator::RBracket
                                | Punctuator::RBrace
                                | Punctuator::Comma
                                | Punctuator::Semicolon
                                | Punctuator::Colon
                        )
                )
        };
        let argument = if ends {
            None
        } else {
            Some(Box::new(self.parse_assignment()?))
        };
        Ok(Expression::YieldExpression {
            argument,
            delegate,
            span: self.finish(&start),
        })
    }

    fn parse_conditional(&mut self) -> ParseResult<Expression> {
        let start = self.start_span();
        let test = self.parse_binary(3)?;
        if !self.eat_punct(Punctuator::Question) {
            return Ok(test);
        }
        let consequent = self.with_in_allowed(Self::parse_assignment)?;
        self.expect_punct(Punctuator::Colon)?;
        let alternate = self.parse_assignment()?;
        Ok(Expression::ConditionalExpression {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            span: self.finish(&start),
        })
    }

    fn peek_infix_operator(&mut self) -> Option<InfixOperator> {
        use BinaryOperator as B;
        let op = match self.peek_kind() {
            TokenKind::Punctuator(p) => match p {
                Punctuator::OrOr => return Some(InfixOperator::Logical(LogicalOperator::Or)),
                Punctuator::AndAnd => return Some(InfixOperator::Logical(LogicalOperator::And)),
                Punctuator::NullishCoalesce => {
                    return Some(InfixOperator::Logical(LogicalOperator::NullishCoalesce))
                }
                Punctuator::Or => B::BitwiseOr,
                Punctuator::Xor => B::BitwiseXor,
                Punctuator::And => B::BitwiseAnd,
                Punctuator::EqEq => B::Eq,
                Punctuator::NotEq => B::NotEq,
                Punctuator::EqEqEq => B::StrictEq,
                Punctuator::NotEqEq => B::StrictNotEq,
                Punctuator::Lt => B::Lt,
                Punctuator::LtEq => B::LtEq,
                Punctuator::Gt => B::Gt,
                Punctuator::GtEq => B::GtEq,
                Punctuator::LtLt => B::LeftShift,
                Punctuator::GtGt => B::RightShift,
                Punctuator::GtGtGt => B::UnsignedRightShift,
                Punctuator::Plus => B::Add,
                Punctuator::Minus => B::Sub,
                Punctuator::Star => B::Mul,
                Punctuator::Slash => B::Div,
                Punctuator::Percent => B::Mod,
                Punctuator::StarStar => B::Exp,
                _ => return None,
            },
            TokenKind::Keyword(Keyword::Instanceof) => B::Instanceof,
            TokenKind::Keyword(Keyword::In) if !self.no_in => B::In,
            _ => return None,
        };
        Some(InfixOperator::Binary(op))
    }

    /// Precedence climbing over binary and logical operators
    fn parse_binary(&mut self, min_precedence: u8) -> ParseResult<Expression> {
        let start = self.start_span();
        let mut left = self.parse_unary()?;
        while let Some(op) = self.peek_infix_operator() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.advance();
            // `**` is right-associative
            let next_min = match op {
                InfixOperator::Binary(BinaryOperator::Exp) => precedence,
                _ => precedence + 1,
            };
            let right = self.parse_binary(next_min)?;
            let span = self.finish(&start);
            left = match op {
                InfixOperator::Binary(operator) => Expression::BinaryExpression {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                    span,
                },
                InfixOperator::Logical(operator) => Expression::LogicalExpression {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                    span,
                },
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expression> {
        let start = self.start_span();
        let operator = match self.peek_kind() {
            TokenKind::Punctuator(Punctuator::Not) => Some(UnaryOperator::Not),
            TokenKind::Punctuator(Punctuator::Tilde) => Some(UnaryOperator::BitwiseNot),
            TokenKind::Punctuator(Punctuator::Plus) => Some(UnaryOperator::Plus),
            TokenKind::Punctuator(Punctuator::Minus) => Some(UnaryOperator::Minus),
            TokenKind::Keyword(Keyword::Typeof) => Some(UnaryOperator::Typeof),
            TokenKind::Keyword(Keyword::Void) => Some(UnaryOperator::Void),
            TokenKind::Keyword(Keyword::Delete) => Some(UnaryOperator::Delete),
            _ => None,
        };
        if let Some(operator) = operator {
            self.advance();
            let argument = self.parse_unary()?;
            return Ok(Expression::UnaryExpression {
                operator,
                argument: Box::new(argument),
                span: self.finish(&start),
            });
        }

        let update = match self.peek_kind() {
            TokenKind::Punctuator(Punctuator::PlusPlus) => Some(UpdateOperator::Increment),
            TokenKind::Punctuator(Punctuator::MinusMinus) => Some(UpdateOperator::Decrement),
            _ => None,
        };
        if let Some(operator) = update {
            self.advance();
            let argument = self.parse_unary()?;
            check_update_target(&argument)?;
            return Ok(Expression::UpdateExpression {
                operator,
                argument: Box::new(argument),
                prefix: true,
                span: self.finish(&start),
            });
        }

        if self.in_async && self.check_ident("await") {
            self.advance();
            let argument = self.parse_unary()?;
            return Ok(Expression::AwaitExpression {
                argument: Box::new(argument),
                span: self.finish(&start),
            });
        }

        let expr = self.parse_lhs_expression()?;
        let token = self.peek();
        let update = match token.kind {
            TokenKind::Punctuator(Punctuator::PlusPlus) if !token.newline_before => {
                Some(UpdateOperator::Increment)
            }
            TokenKind::Punctuator(Punctuator::MinusMinus) if !token.newline_before => {
                Some(UpdateOperator::Decrement)
            }
            _ => None,
        };
        match update {
            Some(operator) => {
                check_update_target(&expr)?;
                self.advance();
                Ok(Expression::UpdateExpression {
                    operator,
                    argument: Box::new(expr),
                    prefix: false,
                    span: self.finish(&start),
                })
            }
            None => Ok(expr),
        }
    }

    /// Member access, calls, `new` and tagged templates
    fn parse_lhs_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_span();
        let expr = if self.check_keyword(Keyword::New) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        self.parse_call_tail(expr, start, true)
    }

    fn parse_new(&mut self) -> ParseResult<Expression> {
        let start = self.start_span();
        self.advance();
        if self.eat_punct(Punctuator::Dot) {
            if !self.check_ident("target") {
                return Err(self.unexpected("'target'"));
            }
            self.advance();
            return Ok(Expression::MetaProperty {
                meta: "new".to_string(),
                property: "target".to_string(),
                span: self.finish(&start),
            });
        }
        let callee_start = self.start_span();
        let callee = if self.check_keyword(Keyword::New) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        let callee = self.parse_call_tail(callee, callee_start, false)?;
        let arguments = if self.check_punct(Punctuator::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(Expression::NewExpression {
            callee: Box::new(callee),
            arguments,
            span: self.finish(&start),
        })
    }

    fn parse_call_tail(&mut self, mut expr: Expression, start: SourceSpan, allow_call: bool) -> ParseResult<Expression> {
        loop {
            match self.peek_kind() {
                TokenKind::Punctuator(Punctuator::Dot) => {
                    self.advance();
                    let property = self.parse_member_name()?;
                    expr = Expression::MemberExpression {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: false,
                        optional: false,
                        span: self.finish(&start),
                    };
                }
                TokenKind::Punctuator(Punctuator::OptionalChain) if allow_call => {
                    self.advance();
                    expr = match self.peek_kind() {
                        TokenKind::Punctuator(Punctuator::LParen) => Expression::CallExpression {
                            callee: Box::new(expr),
                            arguments: self.parse_arguments()?,
                            optional: true,
                            span: self.finish(&start),
                        },
                        TokenKind::Punctuator(Punctuator::LBracket) => {
                            self.advance();
                            let property = self.with_in_allowed(Self::parse_expression)?;
                            self.expect_punct(Punctuator::RBracket)?;
                            Expression::MemberExpression {
                                object: Box::new(expr),
                                property: Box::new(property),
                                computed: true,
                                optional: true,
                                span: self.finish(&start),
                            }
                        }
                        _ => {
                            let property = self.parse_member_name()?;
                            Expression::MemberExpression {
                                object: Box::new(expr),
                                property: Box::new(property),
                                computed: false,
                                optional: true,
                                span: self.finish(&start),
                            }
                        }
                    };
                }
                TokenKind::Punctuator(Punctuator::LBracket) => {
                    self.advance();
                    let property = self.with_in_allowed(Self::parse_expression)?;
                    self.expect_punct(Punctuator::RBracket)?;
                    expr = Expression::MemberExpression {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: true,
                        optional: false,
                        span: self.finish(&start),
                    };
                }
                TokenKind::Punctuator(Punctuator::LParen) if allow_call => {
                    let arguments = self.parse_arguments()?;
                    expr = Expression::CallExpression {
                        callee: Box::new(expr),
                        arguments,
                        optional: false,
                        span: self.finish(&start),
                    };
                }
                TokenKind::Template(TemplatePart::NoSubstitution | TemplatePart::Head) => {
                    let (quasis, expressions) = self.parse_template()?;
                    expr = Expression::TaggedTemplate {
                        tag: Box::new(expr),
                        quasis,
                        expressions,
                        span: self.finish(&start),
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Name after `.`: any identifier, reserved word or private name
    fn parse_member_name(&mut self) -> ParseResult<Expression> {
        match self.peek_kind() {
            TokenKind::Identifier | TokenKind::Keyword(_) | TokenKind::PrivateName => {
                let token = self.advance();
                Ok(Expression::Identifier(Identifier::new(token.text, token.span)))
            }
            _ => Err(self.unexpected("property name")),
        }
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Expression>> {
        self.expect_punct(Punctuator::LParen)?;
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = self.parse_argument_list();
        self.no_in = saved;
        let arguments = result?;
        self.expect_punct(Punctuator::RParen)?;
        Ok(arguments)
    }

    fn parse_argument_list(&mut self) -> ParseResult<Vec<Expression>> {
        let mut arguments = Vec::new();
        while !self.check_punct(Punctuator::RParen) {
            arguments.push(self.parse_spread_or_assignment()?);
            if !self.eat_punct(Punctuator::Comma) {
                break;
            }
        }
        Ok(arguments)
    }

    fn parse_spread_or_assignment(&mut self) -> ParseResult<Expression> {
        if self.check_punct(Punctuator::Spread) {
            let start = self.start_span();
            self.advance();
            let argument = self.parse_assignment()?;
            return Ok(Expression::SpreadElement {
                argument: Box::new(argument),
                span: self.finish(&start),
            });
        }
        self.parse_assignment()
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let token = self.peek().clone();
        let span = token.span.clone();
        match token.kind {
            TokenKind::Identifier => {
                if token.text == "async" && !self.peek_at(1).newline_before {
                    let next = self.peek_at(1).kind;
                    match next {
                        TokenKind::Keyword(Keyword::Function) => {
                            self.advance();
                            return self.parse_function_expression(true, span);
                        }
                        TokenKind::Identifier if self.peek_at(2).is_punct(Punctuator::Arrow) => {
                            self.advance();
                            let param = self.advance();
                            let params = vec![Pattern::Identifier(Identifier::new(param.text, param.span))];
                            self.advance();
                            return self.parse_arrow_body(params, true, span);
                        }
                        TokenKind::Punctuator(Punctuator::LParen) => {
                            return self.parse_async_call_or_arrow();
                        }
                        _ => {}
                    }
                }
                self.advance();
                let id = Identifier::new(token.text, span.clone());
                if self.check_punct(Punctuator::Arrow) && !self.peek().newline_before {
                    self.advance();
                    return self.parse_arrow_body(vec![Pattern::Identifier(id)], false, span);
                }
                Ok(Expression::Identifier(id))
            }
            TokenKind::Keyword(keyword) => {
                let literal = match keyword {
                    Keyword::True => Some(Literal::Boolean(true)),
                    Keyword::False => Some(Literal::Boolean(false)),
                    Keyword::Null => Some(Literal::Null),
                    _ => None,
                };
                if let Some(value) = literal {
                    self.advance();
                    return Ok(Expression::Literal { value, span });
                }
                match keyword {
                    Keyword::This => {
                        self.advance();
                        Ok(Expression::ThisExpression { span })
                    }
                    Keyword::Super => {
                        self.advance();
                        Ok(Expression::SuperExpression { span })
                    }
                    Keyword::Function => self.parse_function_expression(false, span),
                    Keyword::Class => {
                        let class = self.parse_class(false)?;
                        Ok(Expression::ClassExpression {
                            class,
                            span: self.finish(&span),
                        })
                    }
                    _ => Err(bad_expression(&token)),
                }
            }
            TokenKind::Number => {
                self.advance();
                Ok(Expression::Literal {
                    value: Literal::Number {
                        value: parse_number(&token.text),
                        raw: token.text,
                    },
                    span,
                })
            }
            TokenKind::BigInt => {
                self.advance();
                Ok(Expression::Literal {
                    value: Literal::BigInt(token.text),
                    span,
                })
            }
            TokenKind::String => {
                self.advance();
                Ok(Expression::Literal {
                    value: Literal::String {
                        value: token.value,
                        raw: token.text,
                    },
                    span,
                })
            }
            TokenKind::Template(TemplatePart::NoSubstitution | TemplatePart::Head) => {
                let (quasis, expressions) = self.parse_template()?;
                Ok(Expression::TemplateLiteral {
                    quasis,
                    expressions,
                    span: self.finish(&span),
                })
            }
            TokenKind::RegExp => {
                self.advance();
                Ok(Expression::RegExp {
                    raw: token.text,
                    span,
                })
            }
            TokenKind::Punctuator(Punctuator::LParen) => self.parse_parenthesized(),
            TokenKind::Punctuator(Punctuator::LBracket) => self.parse_array_literal(),
            TokenKind::Punctuator(Punctuator::LBrace) => self.parse_object_literal(),
            TokenKind::Error => {
                // Already reported by the lexer; leave a placeholder.
                self.advance();
                Ok(Expression::Error { span })
            }
            TokenKind::Punctuator(Punctuator::Slash | Punctuator::SlashEq) if self.rescan_regexp() => {
                self.parse_primary()
            }
            TokenKind::Punctuator(
                Punctuator::Semicolon
                | Punctuator::RParen
                | Punctuator::RBracket
                | Punctuator::RBrace
                | Punctuator::Comma
                | Punctuator::Colon,
            ) => {
                // Missing operand: report it and let the enclosing
                // construct carry on from the delimiter.
                let err = bad_expression(&token);
                self.diagnostics.push(err.to_context_error(&span));
                Ok(Expression::Error { span })
            }
            TokenKind::Eof => Err(unexpected_eof(&span)),
            _ => Err(bad_expression(&token)),
        }
    }

    fn parse_function_expression(&mut self, is_async: bool, start: SourceSpan) -> ParseResult<Expression> {
        let function = self.parse_function(is_async, false)?;
        Ok(Expression::FunctionExpression {
            function,
            span: self.finish(&start),
        })
    }

    fn parse_template(&mut self) -> ParseResult<(Vec<TemplateElement>, Vec<Expression>)> {
        let first = self.advance();
        let mut quasis = vec![TemplateElement { raw: first.text }];
        let mut expressions = Vec::new();
        if first.kind == TokenKind::Template(TemplatePart::NoSubstitution) {
            return Ok((quasis, expressions));
        }
        loop {
            expressions.push(self.with_in_allowed(Self::parse_expression)?);
            match self.peek_kind() {
                TokenKind::Template(TemplatePart::Middle) => {
                    quasis.push(TemplateElement { raw: self.advance().text });
                }
                TokenKind::Template(TemplatePart::Tail) => {
                    quasis.push(TemplateElement { raw: self.advance().text });
                    return Ok((quasis, expressions));
                }
                _ => return Err(self.unexpected("'}' closing template substitution")),
            }
        }
    }

    /// `( ... )` is either a parenthesized expression or arrow parameters.
    fn parse_parenthesized(&mut self) -> ParseResult<Expression> {
        let start = self.start_span();
        self.advance();
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = self.parse_cover_list();
        self.no_in = saved;
        let (items, rest) = result?;
        self.expect_punct(Punctuator::RParen)?;

        if self.check_punct(Punctuator::Arrow) && !self.peek().newline_before {
            self.advance();
            let params = self.to_params(items, rest)?;
            return self.parse_arrow_body(params, false, start);
        }
        if items.is_empty() || rest.is_some() {
            return Err(self.unexpected("'=>'"));
        }
        let mut items = items;
        if items.len() == 1 {
            return Ok(items.remove(0));
        }
        Ok(Expression::SequenceExpression {
            expressions: items,
            span: self.finish(&start),
        })
    }

    /// Items of a parenthesized list, plus a trailing `...rest` binding.
    fn parse_cover_list(&mut self) -> ParseResult<(Vec<Expression>, Option<Pattern>)> {
        let mut items = Vec::new();
        let mut rest = None;
        while !self.check_punct(Punctuator::RParen) {
            if self.check_punct(Punctuator::Spread) {
                let start = self.start_span();
                self.advance();
                let argument = self.parse_binding_target()?;
                rest = Some(Pattern::RestElement {
                    argument: Box::new(argument),
                    span: self.finish(&start),
                });
                break;
            }
            items.push(self.parse_assignment()?);
            if !self.eat_punct(Punctuator::Comma) {
                break;
            }
        }
        Ok((items, rest))
    }

    fn to_params(&self, items: Vec<Expression>, rest: Option<Pattern>) -> ParseResult<Vec<Pattern>> {
        let mut params = items
            .into_iter()
            .map(|item| self.to_pattern(item))
            .collect::<ParseResult<Vec<_>>>()?;
        params.extend(rest);
        Ok(params)
    }

    /// `async(...)` is a call unless an arrow follows.
    fn parse_async_call_or_arrow(&mut self) -> ParseResult<Expression> {
        let start = self.start_span();
        let callee = self.advance();
        self.expect_punct(Punctuator::LParen)?;
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = self.parse_argument_list();
        self.no_in = saved;
        let arguments = result?;
        self.expect_punct(Punctuator::RParen)?;

        if self.check_punct(Punctuator::Arrow) && !self.peek().newline_before {
            self.advance();
            let count = arguments.len();
            let mut params = Vec::with_capacity(count);
            for (index, argument) in arguments.into_iter().enumerate() {
                match argument {
                    Expression::SpreadElement { argument, span } if index + 1 == count => {
                        params.push(Pattern::RestElement {
                            argument: Box::new(self.to_pattern(*argument)?),
                            span,
                        });
                    }
                    other => params.push(self.to_pattern(other)?),
                }
            }
            return self.parse_arrow_body(params, true, start);
        }
        Ok(Expression::CallExpression {
            callee: Box::new(Expression::Identifier(Identifier::new(callee.text, callee.span))),
            arguments,
            optional: false,
            span: self.finish(&start),
        })
    }

    fn parse_arrow_body(&mut self, params: Vec<Pattern>, is_async: bool, start: SourceSpan) -> ParseResult<Expression> {
        let saved = (self.in_function, self.in_async, self.in_generator);
        self.in_function = true;
        self.in_async = is_async;
        self.in_generator = false;
        let body = if self.check_punct(Punctuator::LBrace) {
            let saved_in = std::mem::replace(&mut self.no_in, false);
            let body = self.parse_block_body();
            self.no_in = saved_in;
            body.map(ArrowFunctionBody::Block)
        } else {
            self.parse_assignment()
                .map(|expr| ArrowFunctionBody::Expression(Box::new(expr)))
        };
        (self.in_function, self.in_async, self.in_generator) = saved;
        Ok(Expression::ArrowFunctionExpression {
            params,
            body: body?,
            is_async,
            span: self.finish(&start),
        })
    }

    fn parse_array_literal(&mut self) -> ParseResult<Expression> {
        let start = self.start_span();
        self.advance();
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = self.parse_array_elements();
        self.no_in = saved;
        let elements = result?;
        self.expect_punct(Punctuator::RBracket)?;
        Ok(Expression::ArrayExpression {
            elements,
            span: self.finish(&start),
        })
    }

    fn parse_array_elements(&mut self) -> ParseResult<Vec<Option<Expression>>> {
        let mut elements = Vec::new();
        while !self.check_punct(Punctuator::RBracket) {
            if self.eat_punct(Punctuator::Comma) {
                elements.push(None);
                continue;
            }
            elements.push(Some(self.parse_spread_or_assignment()?));
            if !self.eat_punct(Punctuator::Comma) {
                break;
            }
        }
        Ok(elements)
    }

    fn parse_object_literal(&mut self) -> ParseResult<Expression> {
        let start = self.start_span();
        self.advance();
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = self.parse_object_properties();
        self.no_in = saved;
        let properties = result?;
        self.expect_punct(Punctuator::RBrace)?;
        Ok(Expression::ObjectExpression {
            properties,
            span: self.finish(&start),
        })
    }

    fn parse_object_properties(&mut self) -> ParseResult<Vec<ObjectProperty>> {
        let mut properties = Vec::new();
        while !self.check_punct(Punctuator::RBrace) {
            properties.push(self.parse_object_property()?);
            if !self.eat_punct(Punctuator::Comma) {
                break;
            }
        }
        Ok(properties)
    }

    fn parse_object_property(&mut self) -> ParseResult<ObjectProperty> {
        let start = self.start_span();
        if self.eat_punct(Punctuator::Spread) {
            let argument = self.parse_assignment()?;
            return Ok(ObjectProperty::Spread {
                argument,
                span: self.finish(&start),
            });
        }

        let (kind, is_async, is_generator) = self.parse_method_modifiers();
        let key_span = self.start_span();
        let (key, plain) = self.parse_property_key()?;

        if self.check_punct(Punctuator::LParen) || kind != MethodKind::Method || is_async || is_generator {
            let (params, body) = self.parse_function_rest(is_async, is_generator)?;
            return Ok(ObjectProperty::Method {
                key,
                kind,
                function: Function {
                    id: None,
                    params,
                    body,
                    is_async,
                    is_generator,
                },
                span: self.finish(&start),
            });
        }

        if self.eat_punct(Punctuator::Colon) {
            let value = self.parse_assignment()?;
            return Ok(ObjectProperty::Property {
                key,
                value,
                shorthand: false,
                span: self.finish(&start),
            });
        }

        // Shorthand `{ a }`, or `{ a = 1 }` which is only valid as a pattern.
        let name = match (&key, plain) {
            (PropertyKey::Identifier(name), true) => name.clone(),
            _ => return Err(self.unexpected("':'")),
        };
        let id = Identifier::new(name, key_span.clone());
        let value = if self.eat_punct(Punctuator::Assign) {
            let right = self.parse_assignment()?;
            Expression::AssignmentExpression {
                left: AssignmentTarget::Identifier(id),
                operator: AssignmentOperator::Assign,
                right: Box::new(right),
                span: self.finish(&key_span),
            }
        } else {
            Expression::Identifier(id)
        };
        Ok(ObjectProperty::Property {
            key,
            value,
            shorthand: true,
            span: self.finish(&start),
        })
    }
}

fn invalid_target(span: &SourceSpan) -> ParseError {
    ParseError {
        code: ErrorCode::InvalidAssignmentTarget,
        message: "Invalid assignment target".to_string(),
        span: span.clone(),
        reported: false,
    }
}

fn bad_expression(token: &Token) -> ParseError {
    ParseError {
        code: ErrorCode::BadExpression,
        message: format!("Expected an expression, got {}", token.describe()),
        span: token.span.clone(),
        reported: false,
    }
}

fn check_update_target(expr: &Expression) -> ParseResult<()> {
    match expr {
        Expression::Identifier(_) | Expression::MemberExpression { .. } | Expression::Error { .. } => Ok(()),
        other => Err(invalid_target(other.span())),
    }
}

/// Numeric value of a number literal's source text
pub(crate) fn parse_number(raw: &str) -> f64 {
    let text: String = raw.chars().filter(|&c| c != '_').collect();
    let lower = text.to_ascii_lowercase();
    if let Some(digits) = lower.strip_prefix("0x") {
        return radix_value(digits, 16);
    }
    if let Some(digits) = lower.strip_prefix("0o") {
        return radix_value(digits, 8);
    }
    if let Some(digits) = lower.strip_prefix("0b") {
        return radix_value(digits, 2);
    }
    // Legacy octal: 017
    if text.len() > 1 && text.starts_with('0') && text.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        return radix_value(&text[1..], 8);
    }
    text.parse().unwrap_or(f64::NAN)
}

fn radix_value(digits: &str, radix: u32) -> f64 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_source(source: &str) -> (Program, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let program = parse(tokenize(source, None), &ScriptSettings::default(), &mut diagnostics);
        (program, diagnostics)
    }

    fn parse_ok(source: &str) -> Program {
        let (program, diagnostics) = parse_source(source);
        assert!(
            diagnostics.is_empty(),
            "unexpected diagnostics for {:?}: {:?}",
            source,
            diagnostics.iter().map(|d| d.to_string()).collect::<Vec<_>>()
        );
        program
    }

    fn first_expression(source: &str) -> Expression {
        match parse_ok(source).body.into_iter().next() {
            Some(Statement::ExpressionStatement { expression, .. }) => expression,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_variable_declaration() {
        let program = parse_ok("var x = 1, y;");
        match &program.body[0] {
            Statement::VariableDeclaration { kind, declarations, .. } => {
                assert_eq!(*kind, VariableKind::Var);
                assert_eq!(declarations.len(), 2);
                assert!(declarations[1].init.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_let_as_identifier() {
        let program = parse_ok("let = 5;");
        assert!(matches!(program.body[0], Statement::ExpressionStatement { .. }));
    }

    #[test]
    fn test_binary_precedence() {
        match first_expression("a + b * c") {
            Expression::BinaryExpression { operator, right, .. } => {
                assert_eq!(operator, BinaryOperator::Add);
                assert!(matches!(
                    *right,
                    Expression::BinaryExpression {
                        operator: BinaryOperator::Mul,
                        ..
                    }
                ));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_exponent_is_right_associative() {
        match first_expression("a ** b ** c") {
            Expression::BinaryExpression { left, right, .. } => {
                assert!(matches!(*left, Expression::Identifier(_)));
                assert!(matches!(*right, Expression::BinaryExpression { .. }));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_arrow_functions() {
        assert!(matches!(first_expression("x => x + 1"), Expression::ArrowFunctionExpression { .. }));
        match first_expression("(a, {b}, [c] = [], ...d) => {}") {
            Expression::ArrowFunctionExpression { params, is_async, .. } => {
                assert_eq!(params.len(), 4);
                assert!(!is_async);
                assert!(matches!(params[3], Pattern::RestElement { .. }));
            }
            other => panic!("unexpected {:?}", other),
        }
        match first_expression("async (a) => await a") {
            Expression::ArrowFunctionExpression { is_async, body, .. } => {
                assert!(is_async);
                assert!(matches!(body, ArrowFunctionBody::Expression(e) if matches!(*e, Expression::AwaitExpression { .. })));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_async_call_is_not_arrow() {
        assert!(matches!(first_expression("async(1, 2)"), Expression::CallExpression { .. }));
    }

    #[test]
    fn test_destructuring_assignment() {
        match first_expression("[a, b] = [b, a]") {
            Expression::AssignmentExpression { left, .. } => {
                assert!(matches!(left, AssignmentTarget::Pattern(Pattern::ArrayPattern { .. })));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_regexp_after_closing_delimiters() {
        let program = parse_ok("if (a) /foo/.test(b)\nfunction f(){} /re/.test(x)");
        assert_eq!(program.body.len(), 3);
        let Statement::IfStatement { consequent, .. } = &program.body[0] else {
            panic!("expected if statement");
        };
        assert!(matches!(**consequent, Statement::ExpressionStatement { .. }));
        assert!(matches!(program.body[2], Statement::ExpressionStatement { .. }));
    }

    #[test]
    fn test_slash_after_operand_is_division() {
        match first_expression("(a) / b / c") {
            Expression::BinaryExpression { operator, .. } => assert_eq!(operator, BinaryOperator::Div),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_operand_keeps_statement() {
        let (program, diagnostics) = parse_source("var a = 1 +; b()");
        assert_eq!(program.body.len(), 2);
        match &program.body[0] {
            Statement::VariableDeclaration { declarations, .. } => match &declarations[0].init {
                Some(Expression::BinaryExpression { right, .. }) => {
                    assert!(matches!(**right, Expression::Error { .. }));
                }
                other => panic!("unexpected initializer {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
        let codes: Vec<ErrorCode> = diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![ErrorCode::BadExpression]);
        assert_eq!(diagnostics.iter().next().map(|d| d.start_column), Some(12));
    }

    #[test]
    fn test_stray_delimiter_line_makes_progress() {
        let (program, diagnostics) = parse_source("a()\n)\n");
        assert_eq!(program.body.len(), 1);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_invalid_assignment_target_reported() {
        let (_, diagnostics) = parse_source("1 = 2;");
        let codes: Vec<ErrorCode> = diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![ErrorCode::InvalidAssignmentTarget]);
    }

    #[test]
    fn test_class_elements() {
        let program = parse_ok(
            "class A extends B { #x = 1; static y; constructor() { super(); } get z() { return this.#x } static { init(); } *gen() {} async run() {} }",
        );
        let Statement::ClassDeclaration { class, .. } = &program.body[0] else {
            panic!("expected class");
        };
        assert!(class.super_class.is_some());
        assert_eq!(class.body.len(), 7);
        assert!(matches!(class.body[2], ClassElement::Method { kind: MethodKind::Constructor, .. }));
        assert!(matches!(class.body[3], ClassElement::Method { kind: MethodKind::Get, .. }));
        assert!(matches!(class.body[4], ClassElement::StaticBlock { .. }));
    }

    #[test]
    fn test_object_literal_forms() {
        match first_expression("({a, b: 1, [c]: 2, get d() {}, e() {}, ...f, 'g': 3, 4: 5})") {
            Expression::ObjectExpression { properties, .. } => assert_eq!(properties.len(), 8),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_template_and_tagged_template() {
        match first_expression("tag`a${b}c${d}`") {
            Expression::TaggedTemplate { quasis, expressions, .. } => {
                assert_eq!(quasis.len(), 3);
                assert_eq!(expressions.len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_optional_chaining_and_new() {
        assert!(matches!(first_expression("a?.b?.[c]?.()"), Expression::CallExpression { optional: true, .. }));
        match first_expression("new Foo.Bar(1)") {
            Expression::NewExpression { callee, arguments, .. } => {
                assert!(matches!(*callee, Expression::MemberExpression { .. }));
                assert_eq!(arguments.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_for_variants() {
        let program = parse_ok("for (var i = 0; i < n; i++) {} for (const k in o) {} for (let [a, b] of c) {} for (x.y of z);");
        assert!(matches!(program.body[0], Statement::ForStatement { .. }));
        assert!(matches!(program.body[1], Statement::ForInStatement { .. }));
        assert!(matches!(program.body[2], Statement::ForOfStatement { .. }));
        assert!(matches!(program.body[3], Statement::ForOfStatement { .. }));
    }

    #[test]
    fn test_for_init_with_in_inside_parens() {
        let program = parse_ok("for (var i = (a in b); i; ) {}");
        assert!(matches!(program.body[0], Statement::ForStatement { .. }));
    }

    #[test]
    fn test_asi_and_restricted_productions() {
        let program = parse_ok("a\n++b\nreturn_value\nx = 1");
        assert_eq!(program.body.len(), 4);
        let program = parse_ok("function f() { return\n42 }");
        let Statement::FunctionDeclaration { function, .. } = &program.body[0] else {
            panic!("expected function");
        };
        assert_eq!(function.body.len(), 2);
    }

    #[test]
    fn test_regex_literal() {
        assert!(matches!(first_expression("/ab+c/gi.test(s)"), Expression::CallExpression { .. }));
    }

    #[test]
    fn test_labels_switch_try() {
        let program = parse_ok(
            "outer: for (;;) { switch (x) { case 1: break outer; default: continue } } try { a() } catch { b() } finally { c() }",
        );
        assert!(matches!(program.body[0], Statement::LabeledStatement { .. }));
        assert!(matches!(program.body[1], Statement::TryStatement { .. }));
    }

    #[test]
    fn test_one_diagnostic_per_bad_statement() {
        let (program, diagnostics) = parse_source("var a = 1;\nvar = ;\nvar b = 2;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.iter().next().map(|d| d.start_line), Some(2));
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn test_recovery_stops_at_statement_keyword() {
        let (program, diagnostics) = parse_source("a = ) \n if (b) c();");
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(program.body[0], Statement::IfStatement { .. }));
    }

    #[test]
    fn test_recovery_inside_block_keeps_block() {
        let (program, diagnostics) = parse_source("function f() { x = ; y(); }\nz();");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(program.body.len(), 2);
        let Statement::FunctionDeclaration { function, .. } = &program.body[0] else {
            panic!("expected function");
        };
        assert_eq!(function.body.len(), 2);
        assert!(matches!(function.body[1], Statement::ExpressionStatement { .. }));
    }

    #[test]
    fn test_stray_closing_brace() {
        let (program, diagnostics) = parse_source("a(); } b();");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn test_lexer_error_not_reported_twice() {
        let (program, diagnostics) = parse_source("var s = \"abc\nvar a = 1;\nvar b = 2;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.iter().next().map(|d| d.code), Some(ErrorCode::UnterminatedString));
        assert_eq!(program.body.len(), 3);
    }

    #[test]
    fn test_import_is_rejected() {
        let (_, diagnostics) = parse_source("import x from 'y';");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_important_comments_become_statements() {
        let program = parse_ok("/*! license */\na();");
        assert!(matches!(program.body[0], Statement::ImportantComment { .. }));
    }

    #[test]
    fn test_json_mode_parses_one_expression() {
        let mut diagnostics = Diagnostics::new();
        let program = parse(tokenize(r#"{"a": [1, 2]}"#, None), &ScriptSettings::json(), &mut diagnostics);
        assert!(diagnostics.is_empty());
        assert!(matches!(
            &program.body[0],
            Statement::ExpressionStatement {
                expression: Expression::ObjectExpression { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(parse_number("0x1F"), 31.0);
        assert_eq!(parse_number("0b101"), 5.0);
        assert_eq!(parse_number("0o17"), 15.0);
        assert_eq!(parse_number("017"), 15.0);
        assert_eq!(parse_number("019"), 19.0);
        assert_eq!(parse_number("1_000"), 1000.0);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number("1e3"), 1000.0);
    }

    #[test]
    fn test_statement_spans() {
        let program = parse_ok("a();\n  var b = 2;");
        let span = program.body[1].span();
        assert_eq!((span.start_line, span.start_column), (2, 3));
        assert_eq!(span.end_column, 13);
    }
}
