//! Reference pass: binds identifier references to fields

use super::walk::{walk_program, BindingKind, ScopeVisitor};
use super::{ScopeId, ScopeKind, ScopeTree};
use crate::ast::{Identifier, Program};
use crate::settings::ScriptSettings;
use core_types::{ContextError, Diagnostics, ErrorCode};
use std::collections::HashSet;

/// Names provided by every host environment the minifier targets.
const KNOWN_GLOBALS: &[&str] = &[
    "AbortController", "Array", "ArrayBuffer", "Atomics", "BigInt", "Blob", "Boolean",
    "DataView", "Date", "Element", "Error", "EvalError", "Event", "FormData", "Function",
    "Headers", "Image", "Infinity", "Intl", "JSON", "Map", "Math", "NaN", "Node", "Number",
    "Object", "Promise", "Proxy", "RangeError", "ReferenceError", "Reflect", "RegExp",
    "Request", "Response", "Set", "SharedArrayBuffer", "String", "Symbol", "SyntaxError",
    "TextDecoder", "TextEncoder", "TypeError", "URIError", "URL", "URLSearchParams",
    "Uint8Array", "WeakMap", "WeakRef", "WeakSet", "XMLHttpRequest", "alert", "atob",
    "btoa", "cancelAnimationFrame", "clearInterval", "clearTimeout", "confirm", "console",
    "crypto", "decodeURI", "decodeURIComponent", "document", "encodeURI",
    "encodeURIComponent", "escape", "eval", "exports", "fetch", "getComputedStyle",
    "globalThis", "history", "isFinite", "isNaN", "localStorage", "location", "module",
    "navigator", "parseFloat", "parseInt", "performance", "process", "prompt",
    "queueMicrotask", "require", "requestAnimationFrame", "screen", "self",
    "sessionStorage", "setInterval", "setTimeout", "structuredClone", "undefined",
    "unescape", "window",
];

/// Bind every identifier reference in `program` to the innermost visible
/// field, counting uses. References that resolve nowhere are reported once
/// per name unless the name is a known global.
pub fn resolve_references(
    program: &mut Program,
    tree: &mut ScopeTree,
    settings: &ScriptSettings,
    diagnostics: &mut Diagnostics,
) {
    let mut known: HashSet<&str> = KNOWN_GLOBALS.iter().copied().collect();
    known.extend(settings.known_globals.iter().map(String::as_str));

    let mut resolver = Resolver {
        tree,
        stack: Vec::new(),
        next_scope: 0,
        known,
        reported: HashSet::new(),
        diagnostics,
    };
    walk_program(&mut resolver, program);
    log::debug!("resolved references, {} undeclared names", resolver.reported.len());
}

struct Resolver<'a> {
    tree: &'a mut ScopeTree,
    stack: Vec<ScopeId>,
    next_scope: u32,
    known: HashSet<&'a str>,
    reported: HashSet<String>,
    diagnostics: &'a mut Diagnostics,
}

impl Resolver<'_> {
    fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId::GLOBAL)
    }
}

impl ScopeVisitor for Resolver<'_> {
    fn enter_scope(&mut self, kind: ScopeKind, _arguments: bool) {
        let id = match kind {
            ScopeKind::Global => ScopeId::GLOBAL,
            _ => {
                // Scopes were created in walk order, right after the global one.
                self.next_scope += 1;
                ScopeId(self.next_scope)
            }
        };
        self.stack.push(id);
    }

    fn exit_scope(&mut self) {
        self.stack.pop();
    }

    fn binding(&mut self, id: &mut Identifier, _kind: BindingKind) {
        if id.field.is_none() {
            id.field = self.tree.lookup(self.current(), &id.name);
        }
    }

    fn reference(&mut self, id: &mut Identifier) {
        let current = self.current();
        match self.tree.lookup(current, &id.name) {
            Some(field) => {
                id.field = Some(field);
                let owner = {
                    let field = self.tree.field_mut(field);
                    field.use_count += 1;
                    field.scope
                };
                let mut scope = current;
                while scope != owner {
                    let entry = self.tree.scope_mut(scope);
                    entry.outer_references.insert(field);
                    match entry.parent {
                        Some(parent) => scope = parent,
                        None => break,
                    }
                }
            }
            None => {
                id.field = None;
                let chain: Vec<ScopeId> = self.tree.ancestors(current).collect();
                for scope in chain {
                    self.tree.scope_mut(scope).free_names.insert(id.name.clone());
                }
                if !self.known.contains(id.name.as_str()) && self.reported.insert(id.name.clone()) {
                    self.diagnostics.push(ContextError::new(
                        ErrorCode::UndeclaredVariable,
                        format!("'{}' is not declared", id.name),
                        &id.span,
                    ));
                }
            }
        }
    }
}
