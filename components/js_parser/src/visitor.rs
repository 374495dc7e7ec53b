//! Read-only traversal over the AST
//!
//! Implementers override `visit_*` methods to add behavior and call the
//! matching `walk_*` function to continue into children. Not calling it
//! prunes the subtree.

use crate::ast::*;

/// Visitor over a borrowed AST
#[allow(missing_docs)]
pub trait Visitor {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_statement(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }

    fn visit_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_pattern(&mut self, pattern: &Pattern) {
        walk_pattern(self, pattern);
    }

    fn visit_function(&mut self, function: &Function) {
        walk_function(self, function);
    }

    fn visit_class(&mut self, class: &Class) {
        walk_class(self, class);
    }
}

impl Program {
    /// Dispatch to [`Visitor::visit_program`]
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_program(self);
    }
}

impl Statement {
    /// Dispatch to [`Visitor::visit_statement`]
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_statement(self);
    }
}

impl Expression {
    /// Dispatch to [`Visitor::visit_expression`]
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_expression(self);
    }
}

/// Visit every top-level statement
pub fn walk_program<V: Visitor + ?Sized>(visitor: &mut V, program: &Program) {
    for statement in &program.body {
        visitor.visit_statement(statement);
    }
}

/// Visit the direct children of a statement
pub fn walk_statement<V: Visitor + ?Sized>(visitor: &mut V, statement: &Statement) {
    match statement {
        Statement::VariableDeclaration { declarations, .. } => walk_declarators(visitor, declarations),
        Statement::FunctionDeclaration { function, .. } => visitor.visit_function(function),
        Statement::ClassDeclaration { class, .. } => visitor.visit_class(class),
        Statement::ExpressionStatement { expression, .. } => visitor.visit_expression(expression),
        Statement::ReturnStatement { argument, .. } => {
            if let Some(argument) = argument {
                visitor.visit_expression(argument);
            }
        }
        Statement::IfStatement {
            test,
            consequent,
            alternate,
            ..
        } => {
            visitor.visit_expression(test);
            visitor.visit_statement(consequent);
            if let Some(alternate) = alternate {
                visitor.visit_statement(alternate);
            }
        }
        Statement::WhileStatement { test, body, .. } => {
            visitor.visit_expression(test);
            visitor.visit_statement(body);
        }
        Statement::DoWhileStatement { body, test, .. } => {
            visitor.visit_statement(body);
            visitor.visit_expression(test);
        }
        Statement::ForStatement {
            init,
            test,
            update,
            body,
            ..
        } => {
            match init {
                Some(ForInit::VariableDeclaration { declarations, .. }) => walk_declarators(visitor, declarations),
                Some(ForInit::Expression(expr)) => visitor.visit_expression(expr),
                None => {}
            }
            if let Some(test) = test {
                visitor.visit_expression(test);
            }
            if let Some(update) = update {
                visitor.visit_expression(update);
            }
            visitor.visit_statement(body);
        }
        Statement::ForInStatement { left, right, body, .. } | Statement::ForOfStatement { left, right, body, .. } => {
            match left {
                ForInOfLeft::VariableDeclaration { id, .. } => visitor.visit_pattern(id),
                ForInOfLeft::Pattern(pattern) => visitor.visit_pattern(pattern),
            }
            visitor.visit_expression(right);
            visitor.visit_statement(body);
        }
        Statement::BlockStatement { body, .. } => walk_statements(visitor, body),
        Statement::ThrowStatement { argument, .. } => visitor.visit_expression(argument),
        Statement::TryStatement {
            block,
            handler,
            finalizer,
            ..
        } => {
            walk_statements(visitor, block);
            if let Some(handler) = handler {
                if let Some(param) = &handler.param {
                    visitor.visit_pattern(param);
                }
                walk_statements(visitor, &handler.body);
            }
            if let Some(finalizer) = finalizer {
                walk_statements(visitor, finalizer);
            }
        }
        Statement::SwitchStatement { discriminant, cases, .. } => {
            visitor.visit_expression(discriminant);
            for case in cases {
                if let Some(test) = &case.test {
                    visitor.visit_expression(test);
                }
                walk_statements(visitor, &case.consequent);
            }
        }
        Statement::WithStatement { object, body, .. } => {
            visitor.visit_expression(object);
            visitor.visit_statement(body);
        }
        Statement::LabeledStatement { body, .. } => visitor.visit_statement(body),
        Statement::EmptyStatement { .. }
        | Statement::BreakStatement { .. }
        | Statement::ContinueStatement { .. }
        | Statement::DebuggerStatement { .. }
        | Statement::ImportantComment { .. } => {}
    }
}

fn walk_statements<V: Visitor + ?Sized>(visitor: &mut V, statements: &[Statement]) {
    for statement in statements {
        visitor.visit_statement(statement);
    }
}

fn walk_declarators<V: Visitor + ?Sized>(visitor: &mut V, declarations: &[VariableDeclarator]) {
    for declarator in declarations {
        visitor.visit_pattern(&declarator.id);
        if let Some(init) = &declarator.init {
            visitor.visit_expression(init);
        }
    }
}

/// Visit the direct children of an expression
pub fn walk_expression<V: Visitor + ?Sized>(visitor: &mut V, expression: &Expression) {
    match expression {
        Expression::TemplateLiteral { expressions, .. } => {
            for expr in expressions {
                visitor.visit_expression(expr);
            }
        }
        Expression::TaggedTemplate { tag, expressions, .. } => {
            visitor.visit_expression(tag);
            for expr in expressions {
                visitor.visit_expression(expr);
            }
        }
        Expression::ArrayExpression { elements, .. } => {
            for element in elements.iter().flatten() {
                visitor.visit_expression(element);
            }
        }
        Expression::ObjectExpression { properties, .. } => {
            for property in properties {
                match property {
                    ObjectProperty::Property { key, value, .. } => {
                        walk_property_key(visitor, key);
                        visitor.visit_expression(value);
                    }
                    ObjectProperty::Method { key, function, .. } => {
                        walk_property_key(visitor, key);
                        visitor.visit_function(function);
                    }
                    ObjectProperty::Spread { argument, .. } => visitor.visit_expression(argument),
                }
            }
        }
        Expression::FunctionExpression { function, .. } => visitor.visit_function(function),
        Expression::ArrowFunctionExpression { params, body, .. } => {
            for param in params {
                visitor.visit_pattern(param);
            }
            match body {
                ArrowFunctionBody::Expression(expr) => visitor.visit_expression(expr),
                ArrowFunctionBody::Block(statements) => walk_statements(visitor, statements),
            }
        }
        Expression::ClassExpression { class, .. } => visitor.visit_class(class),
        Expression::UnaryExpression { argument, .. }
        | Expression::UpdateExpression { argument, .. }
        | Expression::AwaitExpression { argument, .. }
        | Expression::SpreadElement { argument, .. } => visitor.visit_expression(argument),
        Expression::BinaryExpression { left, right, .. } | Expression::LogicalExpression { left, right, .. } => {
            visitor.visit_expression(left);
            visitor.visit_expression(right);
        }
        Expression::AssignmentExpression { left, right, .. } => {
            match left {
                AssignmentTarget::Identifier(_) => {}
                AssignmentTarget::Member(member) => visitor.visit_expression(member),
                AssignmentTarget::Pattern(pattern) => visitor.visit_pattern(pattern),
            }
            visitor.visit_expression(right);
        }
        Expression::ConditionalExpression {
            test,
            consequent,
            alternate,
            ..
        } => {
            visitor.visit_expression(test);
            visitor.visit_expression(consequent);
            visitor.visit_expression(alternate);
        }
        Expression::CallExpression { callee, arguments, .. } | Expression::NewExpression { callee, arguments, .. } => {
            visitor.visit_expression(callee);
            for argument in arguments {
                visitor.visit_expression(argument);
            }
        }
        Expression::MemberExpression {
            object,
            property,
            computed,
            ..
        } => {
            visitor.visit_expression(object);
            if *computed {
                visitor.visit_expression(property);
            }
        }
        Expression::SequenceExpression { expressions, .. } => {
            for expr in expressions {
                visitor.visit_expression(expr);
            }
        }
        Expression::YieldExpression { argument, .. } => {
            if let Some(argument) = argument {
                visitor.visit_expression(argument);
            }
        }
        Expression::Identifier(_)
        | Expression::Literal { .. }
        | Expression::RegExp { .. }
        | Expression::ThisExpression { .. }
        | Expression::SuperExpression { .. }
        | Expression::MetaProperty { .. }
        | Expression::Error { .. } => {}
    }
}

/// Visit the direct children of a pattern
pub fn walk_pattern<V: Visitor + ?Sized>(visitor: &mut V, pattern: &Pattern) {
    match pattern {
        Pattern::Identifier(_) => {}
        Pattern::ObjectPattern { properties, rest, .. } => {
            for property in properties {
                walk_property_key(visitor, &property.key);
                visitor.visit_pattern(&property.value);
            }
            if let Some(rest) = rest {
                visitor.visit_pattern(rest);
            }
        }
        Pattern::ArrayPattern { elements, .. } => {
            for element in elements.iter().flatten() {
                visitor.visit_pattern(element);
            }
        }
        Pattern::AssignmentPattern { left, right, .. } => {
            visitor.visit_pattern(left);
            visitor.visit_expression(right);
        }
        Pattern::RestElement { argument, .. } => visitor.visit_pattern(argument),
        Pattern::Expression(expr) => visitor.visit_expression(expr),
    }
}

/// Visit parameters, then the body
pub fn walk_function<V: Visitor + ?Sized>(visitor: &mut V, function: &Function) {
    for param in &function.params {
        visitor.visit_pattern(param);
    }
    walk_statements(visitor, &function.body);
}

/// Visit the superclass and every class element
pub fn walk_class<V: Visitor + ?Sized>(visitor: &mut V, class: &Class) {
    if let Some(super_class) = &class.super_class {
        visitor.visit_expression(super_class);
    }
    for element in &class.body {
        match element {
            ClassElement::Method { key, function, .. } => {
                walk_property_key(visitor, key);
                visitor.visit_function(function);
            }
            ClassElement::Property { key, value, .. } => {
                walk_property_key(visitor, key);
                if let Some(value) = value {
                    visitor.visit_expression(value);
                }
            }
            ClassElement::StaticBlock { body, .. } => walk_statements(visitor, body),
        }
    }
}

fn walk_property_key<V: Visitor + ?Sized>(visitor: &mut V, key: &PropertyKey) {
    if let PropertyKey::Computed(expr) = key {
        visitor.visit_expression(expr);
    }
}
