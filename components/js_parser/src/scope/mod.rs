//! Lexical scope model
//!
//! Scopes live in an arena ([`ScopeTree`]) and refer to each other by
//! index. Two passes fill it in:
//!
//! 1. [`declare_scopes`] creates one scope per program, function, arrow and
//!    block, and one field per declaration, hoisting `var` and function
//!    declarations to the nearest function or global scope.
//! 2. [`resolve_references`] binds every identifier reference to the
//!    innermost field with its name.
//!
//! [`rename_locals`] then chooses short names for local fields.
//!
//! Both passes drive the same walker, so scopes are entered in the same
//! order and the AST itself stores no scope ids.

mod declare;
mod rename;
mod resolve;
mod walk;

pub use declare::declare_scopes;
pub use rename::rename_locals;
pub use resolve::resolve_references;

use bitflags::bitflags;
use core_types::SourceSpan;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Index of a scope in a [`ScopeTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The global scope
    pub const GLOBAL: Self = Self(0);

    /// Raw index
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a variable field in a [`ScopeTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(u32);

impl FieldId {
    /// Raw index
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind of scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// The program
    Global,
    /// Function, method, arrow function or static block
    Function,
    /// Block statement, loop head, switch body, catch clause, or the name
    /// of a class expression
    Block,
}

/// What declared a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Declared inside a function or block
    Local,
    /// Function parameter
    Parameter,
    /// Name of a function or class expression, visible only inside it
    FunctionName,
    /// Declared in the global scope
    Global,
    /// The implicit `arguments` object of a function
    Arguments,
}

bitflags! {
    /// Field attributes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FieldAttributes: u8 {
        /// Declared `const`
        const READ_ONLY = 1 << 0;
        /// Keep the original name
        const NO_RENAME = 1 << 1;
        /// Block-scoped binding (`let`, `const`, `class`)
        const LEXICAL = 1 << 2;
    }
}

/// A declared name
#[derive(Debug, Clone)]
pub struct VariableField {
    /// Name as declared
    pub name: String,
    /// What declared it
    pub kind: FieldKind,
    /// Attribute bits
    pub attributes: FieldAttributes,
    /// Number of resolved references
    pub use_count: u32,
    /// Owning scope
    pub scope: ScopeId,
    /// Where it was declared
    pub span: SourceSpan,
    /// Generated short name, when renamed
    pub crunched_name: Option<String>,
}

impl VariableField {
    /// The name the field is emitted under
    pub fn output_name(&self) -> &str {
        self.crunched_name.as_deref().unwrap_or(&self.name)
    }

    /// Whether the renamer may give this field a new name
    pub fn can_rename(&self) -> bool {
        !self.attributes.contains(FieldAttributes::NO_RENAME)
            && !matches!(self.kind, FieldKind::Global | FieldKind::Arguments)
    }
}

/// A lexical environment
#[derive(Debug, Clone)]
pub struct Scope {
    /// Kind of scope
    pub kind: ScopeKind,
    /// Enclosing scope, `None` only for the global scope
    pub parent: Option<ScopeId>,
    /// Nested scopes in source order
    pub children: Vec<ScopeId>,
    /// Fields owned by this scope in declaration order, including fields
    /// later shadowed by a redeclaration
    pub fields: Vec<FieldId>,
    names: HashMap<String, FieldId>,
    /// Names of `var` declarations hoisted through this block
    pub(crate) hoisted_through: HashSet<String>,
    /// Contains a direct `eval` call or a `with` statement somewhere below
    pub(crate) dynamic: bool,
    /// Fields of enclosing scopes referenced from inside this scope
    pub(crate) outer_references: BTreeSet<FieldId>,
    /// Unresolved names referenced from inside this scope
    pub(crate) free_names: BTreeSet<String>,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            fields: Vec::new(),
            names: HashMap::new(),
            hoisted_through: HashSet::new(),
            dynamic: false,
            outer_references: BTreeSet::new(),
            free_names: BTreeSet::new(),
        }
    }

    /// Field currently bound to `name` in this scope
    pub fn get(&self, name: &str) -> Option<FieldId> {
        self.names.get(name).copied()
    }

    /// Number of distinct names bound in this scope
    pub fn binding_count(&self) -> usize {
        self.names.len()
    }

    /// Whether `eval` or `with` makes names in this scope observable
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }
}

/// Arena of scopes and fields for one program
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    fields: Vec<VariableField>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// Create a tree holding only the global scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(ScopeKind::Global, None)],
            fields: Vec::new(),
        }
    }

    /// Scope by id
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub(crate) fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    /// Field by id
    pub fn field(&self, id: FieldId) -> &VariableField {
        &self.fields[id.index()]
    }

    pub(crate) fn field_mut(&mut self, id: FieldId) -> &mut VariableField {
        &mut self.fields[id.index()]
    }

    /// Number of scopes, the global scope included
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// All scope ids in creation order
    pub fn scope_ids(&self) -> impl Iterator<Item = ScopeId> {
        (0..self.scopes.len() as u32).map(ScopeId)
    }

    /// All fields in creation order
    pub fn fields(&self) -> impl Iterator<Item = (FieldId, &VariableField)> {
        self.fields
            .iter()
            .enumerate()
            .map(|(index, field)| (FieldId(index as u32), field))
    }

    /// Create a child scope
    pub fn add_scope(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(kind, Some(parent)));
        self.scope_mut(parent).children.push(id);
        id
    }

    /// Add a field to `scope`. A field already bound to the same name is
    /// kept in the scope's field list but no longer found by lookup.
    pub fn add_field(
        &mut self,
        scope: ScopeId,
        name: &str,
        kind: FieldKind,
        attributes: FieldAttributes,
        span: &SourceSpan,
    ) -> FieldId {
        let id = FieldId(self.fields.len() as u32);
        self.fields.push(VariableField {
            name: name.to_string(),
            kind,
            attributes,
            use_count: 0,
            scope,
            span: span.clone(),
            crunched_name: None,
        });
        let owner = self.scope_mut(scope);
        owner.fields.push(id);
        owner.names.insert(name.to_string(), id);
        id
    }

    /// `scope` followed by each of its ancestors
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |id| self.scope(*id).parent)
    }

    /// Innermost field named `name` visible from `scope`
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<FieldId> {
        self.ancestors(scope).find_map(|id| self.scope(id).get(name))
    }

    /// Nearest function or global scope, where `var` declarations land
    pub fn variable_scope(&self, scope: ScopeId) -> ScopeId {
        self.ancestors(scope)
            .find(|id| self.scope(*id).kind != ScopeKind::Block)
            .unwrap_or(ScopeId::GLOBAL)
    }
}
