//! Declaration pass: builds the scope tree and its fields

use super::walk::{walk_program, BindingKind, ScopeVisitor};
use super::{FieldAttributes, FieldKind, ScopeId, ScopeKind, ScopeTree};
use crate::ast::{Identifier, Program};
use crate::settings::ScriptSettings;
use core_types::{ContextError, Diagnostics, ErrorCode, SourceSpan};

/// Build the scope tree for `program`.
///
/// Binding identifiers get their field attached as they are declared.
/// Incompatible redeclarations are reported as `DuplicateDeclaration`.
pub fn declare_scopes(program: &mut Program, settings: &ScriptSettings, diagnostics: &mut Diagnostics) -> ScopeTree {
    let mut declarer = Declarer {
        tree: ScopeTree::new(),
        stack: Vec::new(),
        diagnostics,
    };
    walk_program(&mut declarer, program);
    log::debug!(
        "declared {} fields in {} scopes{}",
        declarer.tree.fields().count(),
        declarer.tree.scope_count(),
        settings
            .file_name
            .as_deref()
            .map(|name| format!(" ({})", name))
            .unwrap_or_default()
    );
    declarer.tree
}

struct Declarer<'a> {
    tree: ScopeTree,
    stack: Vec<ScopeId>,
    diagnostics: &'a mut Diagnostics,
}

impl Declarer<'_> {
    fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId::GLOBAL)
    }

    fn report_duplicate(&mut self, name: &str, span: &SourceSpan) {
        self.diagnostics.push(ContextError::new(
            ErrorCode::DuplicateDeclaration,
            format!("'{}' is already declared in this scope", name),
            span,
        ));
    }

    /// `var` and function declarations: bind in the nearest function or
    /// global scope.
    fn declare_hoisted(&mut self, id: &mut Identifier) {
        let current = self.current();
        let target = self.tree.variable_scope(current);

        let mut conflict = false;
        let mut crossed = Vec::new();
        let mut catch_parameters = Vec::new();
        let mut scope = current;
        while scope != target {
            if let Some(existing) = self.tree.scope(scope).get(&id.name) {
                if self.tree.field(existing).attributes.contains(FieldAttributes::LEXICAL) {
                    conflict = true;
                } else {
                    // `catch (e) { var e = 1 }` writes the catch parameter.
                    catch_parameters.push(existing);
                }
            }
            crossed.push(scope);
            let block = self.tree.scope_mut(scope);
            block.hoisted_through.insert(id.name.clone());
            match block.parent {
                Some(parent) => scope = parent,
                None => break,
            }
        }

        let kind = self.field_kind(target, FieldKind::Local);
        self.declare(id, target, kind, FieldAttributes::empty(), conflict);

        let Some(field) = id.field else { return };
        // Blocks the declaration is written in must not reuse its name.
        for scope in crossed {
            self.tree.scope_mut(scope).outer_references.insert(field);
        }
        if !catch_parameters.is_empty() {
            self.tree.field_mut(field).attributes |= FieldAttributes::NO_RENAME;
            for parameter in catch_parameters {
                self.tree.field_mut(parameter).attributes |= FieldAttributes::NO_RENAME;
            }
        }
    }

    /// `let`, `const` and `class`: bind in the innermost scope.
    fn declare_lexical(&mut self, id: &mut Identifier, attributes: FieldAttributes) {
        let current = self.current();
        let conflict = self.tree.scope(current).hoisted_through.contains(&id.name);
        let kind = self.field_kind(current, FieldKind::Local);
        self.declare(id, current, kind, attributes | FieldAttributes::LEXICAL, conflict);
    }

    fn field_kind(&self, scope: ScopeId, kind: FieldKind) -> FieldKind {
        if scope == ScopeId::GLOBAL {
            FieldKind::Global
        } else {
            kind
        }
    }

    fn declare(
        &mut self,
        id: &mut Identifier,
        scope: ScopeId,
        kind: FieldKind,
        attributes: FieldAttributes,
        mut conflict: bool,
    ) {
        if let Some(existing) = self.tree.scope(scope).get(&id.name) {
            let field = self.tree.field(existing);
            if field.kind == FieldKind::Arguments {
                // Declaring `arguments` simply replaces the implicit one.
            } else if attributes.contains(FieldAttributes::LEXICAL)
                || field.attributes.contains(FieldAttributes::LEXICAL)
            {
                conflict = true;
            } else {
                // var/function/parameter redeclarations share one field.
                id.field = Some(existing);
                return;
            }
            if conflict {
                self.tree.field_mut(existing).attributes |= FieldAttributes::NO_RENAME;
            }
        }

        let attributes = if conflict {
            self.report_duplicate(&id.name, &id.span);
            attributes | FieldAttributes::NO_RENAME
        } else {
            attributes
        };
        id.field = Some(self.tree.add_field(scope, &id.name, kind, attributes, &id.span));
    }
}

impl ScopeVisitor for Declarer<'_> {
    fn enter_scope(&mut self, kind: ScopeKind, arguments: bool) {
        let id = match kind {
            ScopeKind::Global => ScopeId::GLOBAL,
            _ => self.tree.add_scope(self.current(), kind),
        };
        if arguments {
            self.tree.add_field(
                id,
                "arguments",
                FieldKind::Arguments,
                FieldAttributes::NO_RENAME,
                &SourceSpan::synthetic(),
            );
        }
        self.stack.push(id);
    }

    fn exit_scope(&mut self) {
        self.stack.pop();
    }

    fn binding(&mut self, id: &mut Identifier, kind: BindingKind) {
        match kind {
            BindingKind::Var | BindingKind::Function => self.declare_hoisted(id),
            BindingKind::Let | BindingKind::Class => self.declare_lexical(id, FieldAttributes::empty()),
            BindingKind::Const => self.declare_lexical(id, FieldAttributes::READ_ONLY),
            BindingKind::Parameter => {
                let scope = self.current();
                self.declare(id, scope, FieldKind::Parameter, FieldAttributes::empty(), false);
            }
            BindingKind::ExpressionName => {
                let scope = self.current();
                self.declare(id, scope, FieldKind::FunctionName, FieldAttributes::empty(), false);
            }
            BindingKind::CatchParameter => {
                let scope = self.current();
                self.declare(id, scope, FieldKind::Local, FieldAttributes::empty(), false);
            }
        }
    }

    fn reference(&mut self, _id: &mut Identifier) {}

    fn dynamic_scope(&mut self) {
        let current = self.current();
        let chain: Vec<ScopeId> = self.tree.ancestors(current).collect();
        for scope in chain {
            self.tree.scope_mut(scope).dynamic = true;
        }
    }
}
