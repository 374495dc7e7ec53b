//! Minified JavaScript output
//!
//! [`CodeGenerator`] prints an AST back to source with no insignificant
//! whitespace. Parentheses come from operator precedence, not from the
//! input, and separators are only written where two tokens would otherwise
//! merge (`return 1`, `a+ +b`, `a/ /r/`).

use crate::ast::*;
use crate::scope::ScopeTree;
use crate::settings::ScriptSettings;
use crate::visitor::{walk_expression, walk_statement, Visitor};

const SEQUENCE: u8 = 0;
const ASSIGN: u8 = 1;
const CONDITIONAL: u8 = 2;
const BITWISE_OR: u8 = 6;
const EXPONENT: u8 = 14;
const UNARY: u8 = 15;
const POSTFIX: u8 = 16;
const NEW: u8 = 17;
const CALL: u8 = 18;
const PRIMARY: u8 = 19;

/// Prints a program as minified JavaScript
pub struct CodeGenerator<'a> {
    out: String,
    scopes: Option<&'a ScopeTree>,
    collapse: bool,
    term_semicolons: bool,
    indent: usize,
    pending_semicolon: bool,
}

impl<'a> CodeGenerator<'a> {
    /// Create a generator. With a scope tree, resolved identifiers are
    /// printed under their generated names.
    pub fn new(settings: &ScriptSettings, scopes: Option<&'a ScopeTree>) -> Self {
        Self {
            out: String::new(),
            scopes,
            collapse: settings.collapse_whitespace,
            term_semicolons: settings.term_semicolons,
            indent: 0,
            pending_semicolon: false,
        }
    }

    /// Print `program`
    pub fn generate(mut self, program: &Program) -> String {
        program.accept(&mut self);
        self.out
    }

    /// Output written so far
    pub fn into_output(self) -> String {
        self.out
    }

    fn write(&mut self, text: &str) {
        if needs_space(&self.out, text) {
            self.out.push(' ');
        }
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    fn flush_semicolon(&mut self) {
        if self.pending_semicolon {
            self.out.push(';');
            self.pending_semicolon = false;
        }
    }

    fn begin_statement(&mut self) {
        self.flush_semicolon();
        if !self.collapse && !self.out.is_empty() {
            self.newline();
        }
    }

    fn output_name<'b>(&self, id: &'b Identifier) -> &'b str
    where
        'a: 'b,
    {
        match (self.scopes, id.field) {
            (Some(tree), Some(field)) => tree.field(field).output_name(),
            _ => &id.name,
        }
    }

    fn identifier(&mut self, id: &Identifier) {
        let name = self.output_name(id);
        self.write(name);
    }

    /// Returns whether anything was printed
    fn statements(&mut self, statements: &[Statement]) -> bool {
        let mut printed = false;
        for statement in statements {
            if matches!(statement, Statement::EmptyStatement { .. }) {
                continue;
            }
            if contains_error(statement) {
                log::trace!("dropping statement at line {}", statement.span().start_line);
                continue;
            }
            self.begin_statement();
            self.statement(statement);
            printed = true;
        }
        printed
    }

    fn block(&mut self, statements: &[Statement]) {
        self.write("{");
        self.indent += 1;
        let printed = self.statements(statements);
        self.indent -= 1;
        self.close_block(printed);
    }

    fn close_block(&mut self, printed: bool) {
        if self.collapse {
            self.pending_semicolon = false;
        } else {
            self.flush_semicolon();
            if printed {
                self.newline();
            }
        }
        self.write("}");
    }

    /// Body of `if`, loops, `with` and labels
    fn body(&mut self, statement: &Statement) {
        match statement {
            Statement::BlockStatement { body, .. } => self.block(body),
            Statement::EmptyStatement { .. } => self.write(";"),
            _ if contains_error(statement) => self.write(";"),
            _ => self.statement(statement),
        }
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::VariableDeclaration { kind, declarations, .. } => {
                self.declaration(*kind, declarations, false);
                self.pending_semicolon = true;
            }
            Statement::FunctionDeclaration { function, .. } => self.function(function),
            Statement::ClassDeclaration { class, .. } => self.class(class),
            Statement::ExpressionStatement { expression, .. } => {
                if starts_ambiguously(expression) {
                    self.write("(");
                    self.expression(expression, SEQUENCE);
                    self.write(")");
                } else {
                    self.expression(expression, SEQUENCE);
                }
                self.pending_semicolon = true;
            }
            Statement::ReturnStatement { argument, .. } => {
                self.write("return");
                if let Some(argument) = argument {
                    self.expression(argument, SEQUENCE);
                }
                self.pending_semicolon = true;
            }
            Statement::IfStatement {
                test,
                consequent,
                alternate,
                ..
            } => {
                self.write("if(");
                self.expression(test, SEQUENCE);
                self.write(")");
                self.body(consequent);
                if let Some(alternate) = alternate {
                    self.flush_semicolon();
                    self.write("else");
                    self.body(alternate);
                }
            }
            Statement::WhileStatement { test, body, .. } => {
                self.write("while(");
                self.expression(test, SEQUENCE);
                self.write(")");
                self.body(body);
            }
            Statement::DoWhileStatement { body, test, .. } => {
                self.write("do");
                self.body(body);
                self.flush_semicolon();
                self.write("while(");
                self.expression(test, SEQUENCE);
                self.write(")");
                self.pending_semicolon = true;
            }
            Statement::ForStatement {
                init,
                test,
                update,
                body,
                ..
            } => {
                self.write("for(");
                match init {
                    Some(ForInit::VariableDeclaration { kind, declarations }) => {
                        self.declaration(*kind, declarations, true);
                    }
                    Some(ForInit::Expression(expression)) => {
                        if contains_in(expression) {
                            self.write("(");
                            self.expression(expression, SEQUENCE);
                            self.write(")");
                        } else {
                            self.expression(expression, SEQUENCE);
                        }
                    }
                    None => {}
                }
                self.write(";");
                if let Some(test) = test {
                    self.expression(test, SEQUENCE);
                }
                self.write(";");
                if let Some(update) = update {
                    self.expression(update, SEQUENCE);
                }
                self.write(")");
                self.body(body);
            }
            Statement::ForInStatement { left, right, body, .. } => {
                self.write("for(");
                self.for_left(left);
                self.write("in");
                self.expression(right, SEQUENCE);
                self.write(")");
                self.body(body);
            }
            Statement::ForOfStatement {
                left,
                right,
                body,
                is_await,
                ..
            } => {
                self.write("for");
                if *is_await {
                    self.write("await");
                }
                self.write("(");
                self.for_left(left);
                self.write("of");
                self.expression(right, ASSIGN);
                self.write(")");
                self.body(body);
            }
            Statement::BlockStatement { body, .. } => self.block(body),
            Statement::EmptyStatement { .. } => self.write(";"),
            Statement::BreakStatement { label, .. } => {
                self.write("break");
                if let Some(label) = label {
                    self.write(label);
                }
                self.pending_semicolon = true;
            }
            Statement::ContinueStatement { label, .. } => {
                self.write("continue");
                if let Some(label) = label {
                    self.write(label);
                }
                self.pending_semicolon = true;
            }
            Statement::ThrowStatement { argument, .. } => {
                self.write("throw");
                self.expression(argument, SEQUENCE);
                self.pending_semicolon = true;
            }
            Statement::TryStatement {
                block,
                handler,
                finalizer,
                ..
            } => {
                self.write("try");
                self.block(block);
                if let Some(handler) = handler {
                    self.write("catch");
                    if let Some(param) = &handler.param {
                        self.write("(");
                        self.pattern(param);
                        self.write(")");
                    }
                    self.block(&handler.body);
                }
                if let Some(finalizer) = finalizer {
                    self.write("finally");
                    self.block(finalizer);
                }
            }
            Statement::SwitchStatement {
                discriminant, cases, ..
            } => {
                self.write("switch(");
                self.expression(discriminant, SEQUENCE);
                self.write("){");
                self.indent += 1;
                for case in cases {
                    self.begin_statement();
                    match &case.test {
                        Some(test) => {
                            self.write("case");
                            self.expression(test, SEQUENCE);
                        }
                        None => self.write("default"),
                    }
                    self.write(":");
                    self.indent += 1;
                    self.statements(&case.consequent);
                    self.indent -= 1;
                }
                self.indent -= 1;
                self.close_block(!cases.is_empty());
            }
            Statement::WithStatement { object, body, .. } => {
                self.write("with(");
                self.expression(object, SEQUENCE);
                self.write(")");
                self.body(body);
            }
            Statement::DebuggerStatement { .. } => {
                self.write("debugger");
                self.pending_semicolon = true;
            }
            Statement::LabeledStatement { label, body, .. } => {
                self.write(label);
                self.write(":");
                self.body(body);
            }
            Statement::ImportantComment { text, .. } => {
                self.out.push_str(text);
                if self.collapse {
                    self.out.push('\n');
                }
            }
        }
    }

    fn declaration(&mut self, kind: VariableKind, declarations: &[VariableDeclarator], guard_in: bool) {
        self.write(kind.as_str());
        for (index, declarator) in declarations.iter().enumerate() {
            if index > 0 {
                self.write(",");
            }
            self.pattern(&declarator.id);
            match &declarator.init {
                // Unparsable initializer; the declaration itself survives.
                Some(init) if has_error(init) => {}
                None => {}
                Some(init) => {
                    self.write("=");
                    if guard_in && contains_in(init) {
                        self.write("(");
                        self.expression(init, SEQUENCE);
                        self.write(")");
                    } else {
                        self.expression(init, ASSIGN);
                    }
                }
            }
        }
    }

    fn for_left(&mut self, left: &ForInOfLeft) {
        match left {
            ForInOfLeft::VariableDeclaration { kind, id } => {
                self.write(kind.as_str());
                self.pattern(id);
            }
            ForInOfLeft::Pattern(pattern) => self.pattern(pattern),
        }
    }

    fn function(&mut self, function: &Function) {
        if function.is_async {
            self.write("async");
        }
        self.write("function");
        if function.is_generator {
            self.write("*");
        }
        if let Some(id) = &function.id {
            self.identifier(id);
        }
        self.params_and_body(function);
    }

    fn params_and_body(&mut self, function: &Function) {
        self.params(&function.params);
        self.block(&function.body);
    }

    fn params(&mut self, params: &[Pattern]) {
        self.write("(");
        for (index, param) in params.iter().enumerate() {
            if index > 0 {
                self.write(",");
            }
            self.pattern(param);
        }
        self.write(")");
    }

    fn method(&mut self, key: &PropertyKey, kind: MethodKind, function: &Function, is_static: bool) {
        if is_static {
            self.write("static");
        }
        if function.is_async {
            self.write("async");
        }
        if function.is_generator {
            self.write("*");
        }
        match kind {
            MethodKind::Get => self.write("get"),
            MethodKind::Set => self.write("set"),
            MethodKind::Method | MethodKind::Constructor => {}
        }
        self.property_key(key);
        self.params_and_body(function);
    }

    fn class(&mut self, class: &Class) {
        self.write("class");
        if let Some(id) = &class.id {
            self.identifier(id);
        }
        if let Some(super_class) = &class.super_class {
            self.write("extends");
            self.expression(super_class, CALL);
        }
        self.write("{");
        for element in &class.body {
            match element {
                ClassElement::Method {
                    key,
                    kind,
                    function,
                    is_static,
                    ..
                } => self.method(key, *kind, function, *is_static),
                ClassElement::Property {
                    key, value, is_static, ..
                } => {
                    if *is_static {
                        self.write("static");
                    }
                    self.property_key(key);
                    if let Some(value) = value {
                        self.write("=");
                        self.expression(value, ASSIGN);
                    }
                    self.write(";");
                }
                ClassElement::StaticBlock { body, .. } => {
                    self.write("static");
                    self.block(body);
                }
            }
        }
        self.write("}");
    }

    fn property_key(&mut self, key: &PropertyKey) {
        match key {
            PropertyKey::Identifier(name) | PropertyKey::Private(name) => self.write(name),
            PropertyKey::String { value: Some(value), .. } if is_identifier_name(value) => self.write(value),
            PropertyKey::String { value: Some(value), .. } => self.write(&quote_string(value)),
            PropertyKey::String { value: None, raw } => self.write(raw),
            PropertyKey::Number { value, raw } => match shortest_number(*value) {
                Some(text) => self.write(&text),
                None => self.write(raw),
            },
            PropertyKey::Computed(expression) => {
                self.write("[");
                self.expression(expression, ASSIGN);
                self.write("]");
            }
        }
    }

    fn pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Identifier(id) => self.identifier(id),
            Pattern::ObjectPattern { properties, rest, .. } => {
                self.write("{");
                for (index, property) in properties.iter().enumerate() {
                    if index > 0 {
                        self.write(",");
                    }
                    self.pattern_property(property);
                }
                if let Some(rest) = rest {
                    if !properties.is_empty() {
                        self.write(",");
                    }
                    self.write("...");
                    self.pattern(rest);
                }
                self.write("}");
            }
            Pattern::ArrayPattern { elements, .. } => {
                self.write("[");
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        self.write(",");
                    }
                    if let Some(element) = element {
                        self.pattern(element);
                    }
                }
                if matches!(elements.last(), Some(None)) {
                    self.write(",");
                }
                self.write("]");
            }
            Pattern::AssignmentPattern { left, right, .. } => {
                self.pattern(left);
                self.write("=");
                self.expression(right, ASSIGN);
            }
            Pattern::RestElement { argument, .. } => {
                self.write("...");
                self.pattern(argument);
            }
            Pattern::Expression(expression) => self.expression(expression, CALL),
        }
    }

    fn pattern_property(&mut self, property: &ObjectPatternProperty) {
        if property.shorthand {
            let target = match &property.value {
                Pattern::Identifier(id) => Some(id),
                Pattern::AssignmentPattern { left, .. } => match &**left {
                    Pattern::Identifier(id) => Some(id),
                    _ => None,
                },
                _ => None,
            };
            if let (PropertyKey::Identifier(name), Some(id)) = (&property.key, target) {
                if self.output_name(id) == name {
                    self.pattern(&property.value);
                    return;
                }
            }
        }
        self.property_key(&property.key);
        self.write(":");
        self.pattern(&property.value);
    }

    fn assignment_target(&mut self, target: &AssignmentTarget) {
        match target {
            AssignmentTarget::Identifier(id) => self.identifier(id),
            AssignmentTarget::Member(member) => self.expression(member, CALL),
            AssignmentTarget::Pattern(pattern) => self.pattern(pattern),
        }
    }

    /// Print `expression`, parenthesized when it binds looser than `min`
    fn expression(&mut self, expression: &Expression, min: u8) {
        if precedence(expression) < min {
            self.write("(");
            self.expression_inner(expression, SEQUENCE);
            self.write(")");
        } else {
            self.expression_inner(expression, min);
        }
    }

    fn expression_inner(&mut self, expression: &Expression, min: u8) {
        match expression {
            Expression::Identifier(id) => self.identifier(id),
            Expression::Literal { value, .. } => self.literal(value),
            Expression::RegExp { raw, .. } => self.write(raw),
            Expression::TemplateLiteral {
                quasis, expressions, ..
            } => self.template(quasis, expressions),
            Expression::TaggedTemplate {
                tag,
                quasis,
                expressions,
                ..
            } => {
                self.expression(tag, CALL);
                self.template(quasis, expressions);
            }
            Expression::ArrayExpression { elements, .. } => {
                self.write("[");
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        self.write(",");
                    }
                    if let Some(element) = element {
                        self.expression(element, ASSIGN);
                    }
                }
                if matches!(elements.last(), Some(None)) {
                    self.write(",");
                }
                self.write("]");
            }
            Expression::ObjectExpression { properties, .. } => {
                self.write("{");
                for (index, property) in properties.iter().enumerate() {
                    if index > 0 {
                        self.write(",");
                    }
                    self.object_property(property);
                }
                self.write("}");
            }
            Expression::FunctionExpression { function, .. } => self.function(function),
            Expression::ArrowFunctionExpression {
                params, body, is_async, ..
            } => {
                if *is_async {
                    self.write("async");
                }
                match params.as_slice() {
                    [single @ Pattern::Identifier(_)] => self.pattern(single),
                    _ => self.params(params),
                }
                self.write("=>");
                match body {
                    ArrowFunctionBody::Expression(body) => {
                        if starts_with_brace(body) {
                            self.write("(");
                            self.expression(body, SEQUENCE);
                            self.write(")");
                        } else {
                            self.expression(body, ASSIGN);
                        }
                    }
                    ArrowFunctionBody::Block(statements) => self.block(statements),
                }
            }
            Expression::ClassExpression { class, .. } => self.class(class),
            Expression::UnaryExpression { operator, argument, .. } => {
                self.write(operator.as_str());
                self.expression(argument, UNARY);
            }
            Expression::UpdateExpression {
                operator,
                argument,
                prefix,
                ..
            } => {
                if *prefix {
                    self.write(operator.as_str());
                    self.expression(argument, UNARY);
                } else {
                    self.expression(argument, CALL);
                    self.write(operator.as_str());
                }
            }
            Expression::BinaryExpression {
                left, operator, right, ..
            } => {
                let level = operator.precedence();
                let (left_min, right_min) = if *operator == BinaryOperator::Exp {
                    (POSTFIX, EXPONENT)
                } else {
                    (level, level + 1)
                };
                self.expression(left, left_min);
                self.write(operator.as_str());
                self.expression(right, right_min);
            }
            Expression::LogicalExpression {
                left, operator, right, ..
            } => {
                let (left_min, right_min) = match operator {
                    // `??` cannot be mixed with `||` or `&&` without parentheses.
                    LogicalOperator::NullishCoalesce => {
                        let chained = matches!(
                            **left,
                            Expression::LogicalExpression {
                                operator: LogicalOperator::NullishCoalesce,
                                ..
                            }
                        );
                        (if chained { operator.precedence() } else { BITWISE_OR }, BITWISE_OR)
                    }
                    _ => (operator.precedence(), operator.precedence() + 1),
                };
                self.expression(left, left_min);
                self.write(operator.as_str());
                self.expression(right, right_min);
            }
            Expression::AssignmentExpression {
                left, operator, right, ..
            } => {
                self.assignment_target(left);
                self.write(operator.as_str());
                self.expression(right, ASSIGN);
            }
            Expression::ConditionalExpression {
                test,
                consequent,
                alternate,
                ..
            } => {
                self.expression(test, CONDITIONAL + 1);
                self.write("?");
                self.expression(consequent, ASSIGN);
                self.write(":");
                self.expression(alternate, ASSIGN);
            }
            Expression::CallExpression {
                callee,
                arguments,
                optional,
                ..
            } => {
                self.expression(callee, CALL);
                if *optional {
                    self.write("?.");
                }
                self.arguments(arguments);
            }
            Expression::NewExpression { callee, arguments, .. } => {
                self.write("new");
                if contains_call(callee) {
                    self.write("(");
                    self.expression(callee, SEQUENCE);
                    self.write(")");
                } else {
                    self.expression(callee, CALL);
                }
                if !arguments.is_empty() || min > NEW {
                    self.arguments(arguments);
                }
            }
            Expression::MemberExpression {
                object,
                property,
                computed,
                optional,
                ..
            } => {
                match &**object {
                    Expression::Literal {
                        value: Literal::Number { value, raw },
                        ..
                    } if !*computed && !*optional => {
                        let text = shortest_number(*value).unwrap_or_else(|| raw.clone());
                        self.write(&text);
                        if text.bytes().all(|b| b.is_ascii_digit()) {
                            self.write(".");
                        }
                    }
                    _ => self.expression(object, CALL),
                }
                if *optional {
                    self.write("?.");
                }
                if *computed {
                    self.write("[");
                    self.expression(property, SEQUENCE);
                    self.write("]");
                } else {
                    if !*optional {
                        self.write(".");
                    }
                    match &**property {
                        Expression::Identifier(name) => self.write(&name.name),
                        other => self.expression(other, PRIMARY),
                    }
                }
            }
            Expression::SequenceExpression { expressions, .. } => {
                for (index, expression) in expressions.iter().enumerate() {
                    if index > 0 {
                        self.write(",");
                    }
                    self.expression(expression, ASSIGN);
                }
            }
            Expression::ThisExpression { .. } => self.write("this"),
            Expression::SuperExpression { .. } => self.write("super"),
            Expression::MetaProperty { meta, property, .. } => {
                self.write(meta);
                self.write(".");
                self.write(property);
            }
            Expression::AwaitExpression { argument, .. } => {
                self.write("await");
                self.expression(argument, UNARY);
            }
            Expression::YieldExpression {
                argument, delegate, ..
            } => {
                self.write("yield");
                if *delegate {
                    self.write("*");
                }
                if let Some(argument) = argument {
                    self.expression(argument, ASSIGN);
                }
            }
            Expression::SpreadElement { argument, .. } => {
                self.write("...");
                self.expression(argument, ASSIGN);
            }
            // Statements holding a placeholder are dropped before printing.
            Expression::Error { .. } => {}
        }
    }

    fn arguments(&mut self, arguments: &[Expression]) {
        self.write("(");
        for (index, argument) in arguments.iter().enumerate() {
            if index > 0 {
                self.write(",");
            }
            self.expression(argument, ASSIGN);
        }
        self.write(")");
    }

    fn object_property(&mut self, property: &ObjectProperty) {
        match property {
            ObjectProperty::Property {
                key, value, shorthand, ..
            } => {
                if *shorthand {
                    if let (PropertyKey::Identifier(name), Expression::Identifier(id)) = (key, value) {
                        if self.output_name(id) == name {
                            self.write(name);
                            return;
                        }
                    }
                }
                self.property_key(key);
                self.write(":");
                self.expression(value, ASSIGN);
            }
            ObjectProperty::Method { key, kind, function, .. } => self.method(key, *kind, function, false),
            ObjectProperty::Spread { argument, .. } => {
                self.write("...");
                self.expression(argument, ASSIGN);
            }
        }
    }

    fn template(&mut self, quasis: &[TemplateElement], expressions: &[Expression]) {
        self.write("`");
        for (index, quasi) in quasis.iter().enumerate() {
            self.out.push_str(&quasi.raw);
            if let Some(expression) = expressions.get(index) {
                self.out.push_str("${");
                self.expression(expression, SEQUENCE);
                self.out.push('}');
            }
        }
        self.out.push('`');
    }

    fn literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Number { value, raw } => match shortest_number(*value) {
                Some(text) => self.write(&text),
                None => self.write(raw),
            },
            Literal::BigInt(raw) => self.write(raw),
            Literal::String { value: Some(value), .. } => self.write(&quote_string(value)),
            Literal::String { value: None, raw } => self.write(raw),
            Literal::Boolean(true) => self.write("true"),
            Literal::Boolean(false) => self.write("false"),
            Literal::Null => self.write("null"),
        }
    }
}

impl Visitor for CodeGenerator<'_> {
    fn visit_program(&mut self, program: &Program) {
        self.statements(&program.body);
        if self.term_semicolons || !self.collapse {
            self.flush_semicolon();
        }
        self.pending_semicolon = false;
    }

    fn visit_statement(&mut self, statement: &Statement) {
        self.statement(statement);
    }

    fn visit_expression(&mut self, expression: &Expression) {
        self.expression(expression, SEQUENCE);
    }

    fn visit_pattern(&mut self, pattern: &Pattern) {
        self.pattern(pattern);
    }

    fn visit_function(&mut self, function: &Function) {
        self.function(function);
    }

    fn visit_class(&mut self, class: &Class) {
        self.class(class);
    }
}

fn precedence(expression: &Expression) -> u8 {
    match expression {
        Expression::SequenceExpression { .. } => SEQUENCE,
        Expression::AssignmentExpression { .. }
        | Expression::ArrowFunctionExpression { .. }
        | Expression::YieldExpression { .. }
        | Expression::SpreadElement { .. } => ASSIGN,
        Expression::ConditionalExpression { .. } => CONDITIONAL,
        Expression::LogicalExpression { operator, .. } => operator.precedence(),
        Expression::BinaryExpression { operator, .. } => operator.precedence(),
        Expression::UnaryExpression { .. } | Expression::AwaitExpression { .. } => UNARY,
        Expression::UpdateExpression { prefix: true, .. } => UNARY,
        Expression::UpdateExpression { prefix: false, .. } => POSTFIX,
        Expression::CallExpression { .. }
        | Expression::NewExpression { .. }
        | Expression::MemberExpression { .. }
        | Expression::TaggedTemplate { .. } => CALL,
        _ => PRIMARY,
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '\\' || !c.is_ascii()
}

/// Whether `text` would merge with the end of `out`
fn needs_space(out: &str, text: &str) -> bool {
    let (Some(last), Some(next)) = (out.chars().next_back(), text.chars().next()) else {
        return false;
    };
    if is_identifier_char(last) {
        return is_identifier_char(next)
            || (next == '.' && text[1..].starts_with(|c: char| c.is_ascii_digit()));
    }
    match last {
        '+' | '-' if next == last => true,
        '/' => next == '/' || next == '*',
        '<' => next == '!',
        '-' => next == '>' && out.ends_with("--"),
        _ => false,
    }
}

/// Innermost expression printed first
fn leftmost(expression: &Expression) -> &Expression {
    match expression {
        Expression::BinaryExpression { left, .. } | Expression::LogicalExpression { left, .. } => leftmost(left),
        Expression::ConditionalExpression { test, .. } => leftmost(test),
        Expression::CallExpression { callee, .. } => leftmost(callee),
        Expression::MemberExpression { object, .. } => leftmost(object),
        Expression::TaggedTemplate { tag, .. } => leftmost(tag),
        Expression::UpdateExpression {
            prefix: false, argument, ..
        } => leftmost(argument),
        Expression::SequenceExpression { expressions, .. } => expressions.first().map_or(expression, leftmost),
        Expression::AssignmentExpression {
            left: AssignmentTarget::Member(member),
            ..
        } => leftmost(member),
        _ => expression,
    }
}

fn starts_with_brace(expression: &Expression) -> bool {
    matches!(
        leftmost(expression),
        Expression::ObjectExpression { .. }
            | Expression::AssignmentExpression {
                left: AssignmentTarget::Pattern(Pattern::ObjectPattern { .. }),
                ..
            }
    )
}

/// An expression statement that would read as a declaration or block
fn starts_ambiguously(expression: &Expression) -> bool {
    if starts_with_brace(expression) {
        return true;
    }
    match leftmost(expression) {
        Expression::FunctionExpression { .. } | Expression::ClassExpression { .. } => true,
        Expression::Identifier(id) => id.name == "let",
        _ => false,
    }
}

/// `new a().b` would bind the arguments to `a`
fn contains_call(expression: &Expression) -> bool {
    match expression {
        Expression::CallExpression { .. } => true,
        Expression::MemberExpression { object, .. } => contains_call(object),
        Expression::TaggedTemplate { tag, .. } => contains_call(tag),
        _ => false,
    }
}

#[derive(Default)]
struct ErrorFinder {
    found: bool,
}

impl Visitor for ErrorFinder {
    // Nested statements are checked when they are printed.
    fn visit_statement(&mut self, _statement: &Statement) {}

    fn visit_expression(&mut self, expression: &Expression) {
        if matches!(expression, Expression::Error { .. }) {
            self.found = true;
        } else {
            walk_expression(self, expression);
        }
    }
}

fn has_error(expression: &Expression) -> bool {
    let mut finder = ErrorFinder::default();
    finder.visit_expression(expression);
    finder.found
}

/// Whether the statement's own expressions hold a parse-error placeholder.
/// Placeholders inside the initializer of a `var` or `let` declarator do
/// not count; that initializer is dropped instead.
fn contains_error(statement: &Statement) -> bool {
    let mut finder = ErrorFinder::default();
    match statement {
        Statement::VariableDeclaration {
            kind: VariableKind::Var | VariableKind::Let,
            declarations,
            ..
        } => {
            for declarator in declarations {
                finder.visit_pattern(&declarator.id);
            }
        }
        _ => walk_statement(&mut finder, statement),
    }
    finder.found
}

#[derive(Default)]
struct InFinder {
    found: bool,
}

impl Visitor for InFinder {
    fn visit_function(&mut self, _function: &Function) {}

    fn visit_expression(&mut self, expression: &Expression) {
        if matches!(
            expression,
            Expression::BinaryExpression {
                operator: BinaryOperator::In,
                ..
            }
        ) {
            self.found = true;
        } else {
            walk_expression(self, expression);
        }
    }
}

/// `in` inside a `for` head would start a `for-in`
fn contains_in(expression: &Expression) -> bool {
    let mut finder = InFinder::default();
    finder.visit_expression(expression);
    finder.found
}

/// Shortest decimal form of a number literal, `None` when not finite
pub(crate) fn shortest_number(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value.fract() == 0.0 && value.abs() < 1e21 {
        let digits = format!("{}", value as i128);
        let mantissa = digits.trim_end_matches('0');
        let zeros = digits.len() - mantissa.len();
        if zeros > 2 {
            return Some(format!("{}e{}", mantissa, zeros));
        }
        return Some(digits);
    }
    let mut buffer = ryu::Buffer::new();
    let text = buffer.format_finite(value);
    Some(match text.strip_prefix("0.") {
        Some(fraction) => format!(".{}", fraction),
        None => text.to_string(),
    })
}

/// Quote `value` with whichever quote needs fewer escapes
pub(crate) fn quote_string(value: &str) -> String {
    let doubles = value.matches('"').count();
    let singles = value.matches('\'').count();
    let quote = if doubles > singles { '\'' } else { '"' };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{b}' => out.push_str("\\v"),
            '\u{c}' => out.push_str("\\f"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            '\0' => {
                if chars.peek().is_some_and(|next| next.is_ascii_digit()) {
                    out.push_str("\\x00");
                } else {
                    out.push_str("\\0");
                }
            }
            '/' if out.ends_with('<') => out.push_str("\\/"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 && c != '\t' => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn is_identifier_name(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;
    use crate::scope::{declare_scopes, rename_locals, resolve_references};
    use core_types::Diagnostics;

    fn minify_with(source: &str, settings: &ScriptSettings) -> String {
        let mut diagnostics = Diagnostics::new();
        let mut program = parse(tokenize(source, None), settings, &mut diagnostics);
        let mut tree = declare_scopes(&mut program, settings, &mut diagnostics);
        resolve_references(&mut program, &mut tree, settings, &mut diagnostics);
        if settings.local_renaming {
            rename_locals(&mut tree);
        }
        CodeGenerator::new(settings, Some(&tree)).generate(&program)
    }

    fn minify(source: &str) -> String {
        minify_with(source, &ScriptSettings::default())
    }

    #[test]
    fn test_return_keeps_one_space() {
        assert_eq!(minify("function f() {\n  return 1;\n}"), "function f(){return 1}");
    }

    #[test]
    fn test_operator_separators() {
        assert_eq!(minify("x = a + +b;"), "x=a+ +b");
        assert_eq!(minify("x = a - -b;"), "x=a- -b");
        assert_eq!(minify("x = a / /re/g;"), "x=a/ /re/g");
        assert_eq!(minify("x = a++ + b;"), "x=a++ +b");
        assert_eq!(minify("x = typeof a;"), "x=typeof a");
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(minify("x = [0.50, 1000000, 0xff, 1.5e3, 100, 1e-7];"), "x=[.5,1e6,255,1500,100,1e-7]");
        assert_eq!(minify("(1).toString();"), "1..toString()");
        assert_eq!(minify("x = 1.5.toFixed();"), "x=1.5.toFixed()");
    }

    #[test]
    fn test_string_quotes() {
        assert_eq!(
            minify(r#"x = ['it\'s', "say \"hi\"", 'plain', "a\nb"];"#),
            r#"x=["it's",'say "hi"',"plain","a\nb"]"#
        );
        assert_eq!(quote_string("</script>"), r#""<\/script>""#);
        assert_eq!(quote_string("\u{0}1"), r#""\x001""#);
    }

    #[test]
    fn test_precedence_parentheses() {
        assert_eq!(minify("x = (a, b);"), "x=(a,b)");
        assert_eq!(minify("y = (1 + 2) * 3;"), "y=(1+2)*3");
        assert_eq!(minify("y = 1 + (2 * 3);"), "y=1+2*3");
        assert_eq!(minify("y = a - (b - c);"), "y=a-(b-c)");
        assert_eq!(minify("z = (-a) ** b;"), "z=(-a)**b");
        assert_eq!(minify("z = a ** -b;"), "z=a**-b");
        assert_eq!(minify("z = (a || b) ?? c;"), "z=(a||b)??c");
        assert_eq!(minify("z = (a ? b : c) ? d : e;"), "z=(a?b:c)?d:e");
    }

    #[test]
    fn test_statement_start_parentheses() {
        assert_eq!(minify("(function () { go(); })();"), "(function(){go()}())");
        assert_eq!(minify("({}).x;"), "({}.x)");
        assert_eq!(minify("({ a } = b);"), "({a}=b)");
        assert_eq!(minify("f = () => ({ a: 1 });"), "f=()=>({a:1})");
    }

    #[test]
    fn test_new_expressions() {
        assert_eq!(minify("x = new Foo;"), "x=new Foo");
        assert_eq!(minify("x = new Foo().bar;"), "x=new Foo().bar");
        assert_eq!(minify("x = new (getClass())();"), "x=new(getClass())");
    }

    #[test]
    fn test_if_else_semicolons() {
        assert_eq!(minify("if (a) b(); else c();"), "if(a)b();else c()");
        assert_eq!(minify("do x(); while (a); y();"), "do x();while(a);y()");
        assert_eq!(minify("if (a) ; else { }"), "if(a);else{}");
    }

    #[test]
    fn test_class_output() {
        assert_eq!(
            minify("class A extends B { static x = 1; constructor() { super(); } get y() { return 2; } }"),
            "class A extends B{static x=1;constructor(){super()}get y(){return 2}}"
        );
    }

    #[test]
    fn test_for_head_guards_in() {
        assert_eq!(
            minify("for (var i = ('a' in o) ? 1 : 0; i < 3; i++) {}"),
            r#"for(var i=("a"in o?1:0);i<3;i++){}"#
        );
        assert_eq!(minify("for (const k in o) f(k);"), "for(const a in o)f(a)");
    }

    #[test]
    fn test_renamed_locals_and_shorthand() {
        assert_eq!(
            minify("function f(first) { var { value } = first; return { value }; }"),
            "function f(a){var{value:b}=a;return{value:b}}"
        );
        let settings = ScriptSettings {
            local_renaming: false,
            ..ScriptSettings::default()
        };
        assert_eq!(
            minify_with("function f(first) { var { value } = first; return { value }; }", &settings),
            "function f(first){var{value}=first;return{value}}"
        );
    }

    #[test]
    fn test_regexp_statement_after_block() {
        assert_eq!(minify("if (a) /foo/.test(b)"), "if(a)/foo/.test(b)");
        assert_eq!(minify("function f(){} /re/.test(x)"), "function f(){}/re/.test(x)");
    }

    #[test]
    fn test_error_placeholders_are_dropped() {
        assert_eq!(minify("var a = \"abc\nvar b = 1;"), "var a;var b=1");
        assert_eq!(minify("x = \"abc\ny();"), "y()");
        assert_eq!(minify("var a = 1 +; b()"), "var a;b()");
        assert_eq!(minify("let c = f(2 *), d = 3;"), "let c,d=3");
        assert_eq!(minify("f(1 +);\ng();"), "g()");
    }

    #[test]
    fn test_term_semicolons() {
        let settings = ScriptSettings {
            term_semicolons: true,
            ..ScriptSettings::default()
        };
        assert_eq!(minify("a(); b()"), "a();b()");
        assert_eq!(minify_with("a(); b()", &settings), "a();b();");
    }

    #[test]
    fn test_multi_line_output() {
        let settings = ScriptSettings {
            collapse_whitespace: false,
            ..ScriptSettings::default()
        };
        assert_eq!(minify_with("if (a) { b(); c(); }", &settings), "if(a){\n  b();\n  c();\n}");
    }

    #[test]
    fn test_important_comment_kept() {
        assert_eq!(minify("/*! keep */\na();"), "/*! keep */\na()");
    }

    #[test]
    fn test_shortest_number() {
        assert_eq!(shortest_number(0.5).as_deref(), Some(".5"));
        assert_eq!(shortest_number(1000.0).as_deref(), Some("1e3"));
        assert_eq!(shortest_number(100.0).as_deref(), Some("100"));
        assert_eq!(shortest_number(0.0).as_deref(), Some("0"));
        assert_eq!(shortest_number(f64::INFINITY), None);
    }
}
