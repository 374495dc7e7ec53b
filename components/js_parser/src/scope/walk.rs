//! Mutable AST walk shared by the scope passes

use super::ScopeKind;
use crate::ast::*;

/// How an identifier is being bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindingKind {
    Var,
    Let,
    Const,
    Class,
    Function,
    Parameter,
    /// Name of a function or class expression
    ExpressionName,
    CatchParameter,
}

impl From<VariableKind> for BindingKind {
    fn from(kind: VariableKind) -> Self {
        match kind {
            VariableKind::Var => BindingKind::Var,
            VariableKind::Let => BindingKind::Let,
            VariableKind::Const => BindingKind::Const,
        }
    }
}

/// Hooks called by [`walk_program`]
pub(crate) trait ScopeVisitor {
    /// A scope opens. `arguments` is true for non-arrow functions.
    fn enter_scope(&mut self, kind: ScopeKind, arguments: bool);

    fn exit_scope(&mut self);

    fn binding(&mut self, id: &mut Identifier, kind: BindingKind);

    fn reference(&mut self, id: &mut Identifier);

    /// A direct `eval` call or a `with` body makes the current scope chain
    /// observable by name.
    fn dynamic_scope(&mut self) {}
}

pub(crate) fn walk_program<V: ScopeVisitor>(visitor: &mut V, program: &mut Program) {
    visitor.enter_scope(ScopeKind::Global, false);
    walk_statements(visitor, &mut program.body);
    visitor.exit_scope();
}

fn walk_statements<V: ScopeVisitor>(visitor: &mut V, statements: &mut [Statement]) {
    for statement in statements {
        walk_statement(visitor, statement);
    }
}

fn in_block<V: ScopeVisitor>(visitor: &mut V, statements: &mut [Statement]) {
    visitor.enter_scope(ScopeKind::Block, false);
    walk_statements(visitor, statements);
    visitor.exit_scope();
}

fn walk_declarators<V: ScopeVisitor>(visitor: &mut V, kind: VariableKind, declarations: &mut [VariableDeclarator]) {
    for declarator in declarations {
        walk_binding(visitor, &mut declarator.id, kind.into());
        if let Some(init) = &mut declarator.init {
            walk_expression(visitor, init);
        }
    }
}

fn walk_statement<V: ScopeVisitor>(visitor: &mut V, statement: &mut Statement) {
    match statement {
        Statement::VariableDeclaration { kind, declarations, .. } => walk_declarators(visitor, *kind, declarations),
        Statement::FunctionDeclaration { function, .. } => {
            if let Some(id) = &mut function.id {
                visitor.binding(id, BindingKind::Function);
            }
            walk_function(visitor, function, false);
        }
        Statement::ClassDeclaration { class, .. } => {
            if let Some(id) = &mut class.id {
                visitor.binding(id, BindingKind::Class);
            }
            walk_class(visitor, class);
        }
        Statement::ExpressionStatement { expression, .. } => walk_expression(visitor, expression),
        Statement::ReturnStatement { argument, .. } => {
            if let Some(argument) = argument {
                walk_expression(visitor, argument);
            }
        }
        Statement::IfStatement {
            test,
            consequent,
            alternate,
            ..
        } => {
            walk_expression(visitor, test);
            walk_statement(visitor, consequent);
            if let Some(alternate) = alternate {
                walk_statement(visitor, alternate);
            }
        }
        Statement::WhileStatement { test, body, .. } => {
            walk_expression(visitor, test);
            walk_statement(visitor, body);
        }
        Statement::DoWhileStatement { body, test, .. } => {
            walk_statement(visitor, body);
            walk_expression(visitor, test);
        }
        Statement::ForStatement {
            init,
            test,
            update,
            body,
            ..
        } => {
            visitor.enter_scope(ScopeKind::Block, false);
            match init {
                Some(ForInit::VariableDeclaration { kind, declarations }) => {
                    walk_declarators(visitor, *kind, declarations)
                }
                Some(ForInit::Expression(expr)) => walk_expression(visitor, expr),
                None => {}
            }
            if let Some(test) = test {
                walk_expression(visitor, test);
            }
            if let Some(update) = update {
                walk_expression(visitor, update);
            }
            walk_statement(visitor, body);
            visitor.exit_scope();
        }
        Statement::ForInStatement { left, right, body, .. } | Statement::ForOfStatement { left, right, body, .. } => {
            visitor.enter_scope(ScopeKind::Block, false);
            match left {
                ForInOfLeft::VariableDeclaration { kind, id } => walk_binding(visitor, id, (*kind).into()),
                ForInOfLeft::Pattern(pattern) => walk_assignment_pattern(visitor, pattern),
            }
            walk_expression(visitor, right);
            walk_statement(visitor, body);
            visitor.exit_scope();
        }
        Statement::BlockStatement { body, .. } => in_block(visitor, body),
        Statement::ThrowStatement { argument, .. } => walk_expression(visitor, argument),
        Statement::TryStatement {
            block,
            handler,
            finalizer,
            ..
        } => {
            in_block(visitor, block);
            if let Some(handler) = handler {
                visitor.enter_scope(ScopeKind::Block, false);
                if let Some(param) = &mut handler.param {
                    walk_binding(visitor, param, BindingKind::CatchParameter);
                }
                walk_statements(visitor, &mut handler.body);
                visitor.exit_scope();
            }
            if let Some(finalizer) = finalizer {
                in_block(visitor, finalizer);
            }
        }
        Statement::SwitchStatement { discriminant, cases, .. } => {
            walk_expression(visitor, discriminant);
            visitor.enter_scope(ScopeKind::Block, false);
            for case in cases {
                if let Some(test) = &mut case.test {
                    walk_expression(visitor, test);
                }
                walk_statements(visitor, &mut case.consequent);
            }
            visitor.exit_scope();
        }
        Statement::WithStatement { object, body, .. } => {
            walk_expression(visitor, object);
            visitor.dynamic_scope();
            walk_statement(visitor, body);
        }
        Statement::LabeledStatement { body, .. } => walk_statement(visitor, body),
        Statement::EmptyStatement { .. }
        | Statement::BreakStatement { .. }
        | Statement::ContinueStatement { .. }
        | Statement::DebuggerStatement { .. }
        | Statement::ImportantComment { .. } => {}
    }
}

/// `named` binds the function's own name inside its scope (function
/// expressions).
fn walk_function<V: ScopeVisitor>(visitor: &mut V, function: &mut Function, named: bool) {
    visitor.enter_scope(ScopeKind::Function, true);
    if named {
        if let Some(id) = &mut function.id {
            visitor.binding(id, BindingKind::ExpressionName);
        }
    }
    for param in &mut function.params {
        walk_binding(visitor, param, BindingKind::Parameter);
    }
    walk_statements(visitor, &mut function.body);
    visitor.exit_scope();
}

fn walk_class<V: ScopeVisitor>(visitor: &mut V, class: &mut Class) {
    if let Some(super_class) = &mut class.super_class {
        walk_expression(visitor, super_class);
    }
    for element in &mut class.body {
        match element {
            ClassElement::Method { key, function, .. } => {
                walk_key(visitor, key);
                walk_function(visitor, function, false);
            }
            ClassElement::Property { key, value, .. } => {
                walk_key(visitor, key);
                if let Some(value) = value {
                    walk_expression(visitor, value);
                }
            }
            ClassElement::StaticBlock { body, .. } => {
                visitor.enter_scope(ScopeKind::Function, false);
                walk_statements(visitor, body);
                visitor.exit_scope();
            }
        }
    }
}

fn walk_key<V: ScopeVisitor>(visitor: &mut V, key: &mut PropertyKey) {
    if let PropertyKey::Computed(expr) = key {
        walk_expression(visitor, expr);
    }
}

fn walk_expression<V: ScopeVisitor>(visitor: &mut V, expression: &mut Expression) {
    match expression {
        Expression::Identifier(id) => visitor.reference(id),
        Expression::TemplateLiteral { expressions, .. } => {
            for expr in expressions {
                walk_expression(visitor, expr);
            }
        }
        Expression::TaggedTemplate { tag, expressions, .. } => {
            walk_expression(visitor, tag);
            for expr in expressions {
                walk_expression(visitor, expr);
            }
        }
        Expression::ArrayExpression { elements, .. } => {
            for element in elements.iter_mut().flatten() {
                walk_expression(visitor, element);
            }
        }
        Expression::ObjectExpression { properties, .. } => {
            for property in properties {
                match property {
                    ObjectProperty::Property { key, value, .. } => {
                        walk_key(visitor, key);
                        walk_expression(visitor, value);
                    }
                    ObjectProperty::Method { key, function, .. } => {
                        walk_key(visitor, key);
                        walk_function(visitor, function, false);
                    }
                    ObjectProperty::Spread { argument, .. } => walk_expression(visitor, argument),
                }
            }
        }
        Expression::FunctionExpression { function, .. } => walk_function(visitor, function, true),
        Expression::ArrowFunctionExpression { params, body, .. } => {
            visitor.enter_scope(ScopeKind::Function, false);
            for param in params {
                walk_binding(visitor, param, BindingKind::Parameter);
            }
            match body {
                ArrowFunctionBody::Expression(expr) => walk_expression(visitor, expr),
                ArrowFunctionBody::Block(statements) => walk_statements(visitor, statements),
            }
            visitor.exit_scope();
        }
        Expression::ClassExpression { class, .. } => {
            if class.id.is_some() {
                visitor.enter_scope(ScopeKind::Block, false);
                if let Some(id) = &mut class.id {
                    visitor.binding(id, BindingKind::ExpressionName);
                }
                walk_class(visitor, class);
                visitor.exit_scope();
            } else {
                walk_class(visitor, class);
            }
        }
        Expression::UnaryExpression { argument, .. }
        | Expression::UpdateExpression { argument, .. }
        | Expression::AwaitExpression { argument, .. }
        | Expression::SpreadElement { argument, .. } => walk_expression(visitor, argument),
        Expression::BinaryExpression { left, right, .. } | Expression::LogicalExpression { left, right, .. } => {
            walk_expression(visitor, left);
            walk_expression(visitor, right);
        }
        Expression::AssignmentExpression { left, right, .. } => {
            match left {
                AssignmentTarget::Identifier(id) => visitor.reference(id),
                AssignmentTarget::Member(member) => walk_expression(visitor, member),
                AssignmentTarget::Pattern(pattern) => walk_assignment_pattern(visitor, pattern),
            }
            walk_expression(visitor, right);
        }
        Expression::ConditionalExpression {
            test,
            consequent,
            alternate,
            ..
        } => {
            walk_expression(visitor, test);
            walk_expression(visitor, consequent);
            walk_expression(visitor, alternate);
        }
        Expression::CallExpression { callee, arguments, .. } => {
            if matches!(&**callee, Expression::Identifier(id) if id.name == "eval") {
                visitor.dynamic_scope();
            }
            walk_expression(visitor, callee);
            for argument in arguments {
                walk_expression(visitor, argument);
            }
        }
        Expression::NewExpression { callee, arguments, .. } => {
            walk_expression(visitor, callee);
            for argument in arguments {
                walk_expression(visitor, argument);
            }
        }
        Expression::MemberExpression {
            object,
            property,
            computed,
            ..
        } => {
            walk_expression(visitor, object);
            if *computed {
                walk_expression(visitor, property);
            }
        }
        Expression::SequenceExpression { expressions, .. } => {
            for expr in expressions {
                walk_expression(visitor, expr);
            }
        }
        Expression::YieldExpression { argument, .. } => {
            if let Some(argument) = argument {
                walk_expression(visitor, argument);
            }
        }
        Expression::Literal { .. }
        | Expression::RegExp { .. }
        | Expression::ThisExpression { .. }
        | Expression::SuperExpression { .. }
        | Expression::MetaProperty { .. }
        | Expression::Error { .. } => {}
    }
}

/// A pattern that declares names
fn walk_binding<V: ScopeVisitor>(visitor: &mut V, pattern: &mut Pattern, kind: BindingKind) {
    match pattern {
        Pattern::Identifier(id) => visitor.binding(id, kind),
        Pattern::ObjectPattern { properties, rest, .. } => {
            for property in properties {
                walk_key(visitor, &mut property.key);
                walk_binding(visitor, &mut property.value, kind);
            }
            if let Some(rest) = rest {
                walk_binding(visitor, rest, kind);
            }
        }
        Pattern::ArrayPattern { elements, .. } => {
            for element in elements.iter_mut().flatten() {
                walk_binding(visitor, element, kind);
            }
        }
        Pattern::AssignmentPattern { left, right, .. } => {
            walk_binding(visitor, left, kind);
            walk_expression(visitor, right);
        }
        Pattern::RestElement { argument, .. } => walk_binding(visitor, argument, kind),
        Pattern::Expression(expr) => walk_expression(visitor, expr),
    }
}

/// A pattern that assigns to existing names
fn walk_assignment_pattern<V: ScopeVisitor>(visitor: &mut V, pattern: &mut Pattern) {
    match pattern {
        Pattern::Identifier(id) => visitor.reference(id),
        Pattern::ObjectPattern { properties, rest, .. } => {
            for property in properties {
                walk_key(visitor, &mut property.key);
                walk_assignment_pattern(visitor, &mut property.value);
            }
            if let Some(rest) = rest {
                walk_assignment_pattern(visitor, rest);
            }
        }
        Pattern::ArrayPattern { elements, .. } => {
            for element in elements.iter_mut().flatten() {
                walk_assignment_pattern(visitor, element);
            }
        }
        Pattern::AssignmentPattern { left, right, .. } => {
            walk_assignment_pattern(visitor, left);
            walk_expression(visitor, right);
        }
        Pattern::RestElement { argument, .. } => walk_assignment_pattern(visitor, argument),
        Pattern::Expression(expr) => walk_expression(visitor, expr),
    }
}
