//! Local renaming: short generated names for function and block bindings

use super::{FieldId, ScopeId, ScopeKind, ScopeTree};
use crate::lexer::Keyword;
use std::collections::HashSet;

const FIRST_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_$";
const NEXT_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_$";

// Words that are not keywords to the lexer but still cannot be binding names
// in every context.
const RESERVED: &[&str] = &[
    "arguments", "async", "await", "enum", "eval", "implements", "interface", "let",
    "package", "private", "protected", "public", "static", "yield",
];

/// Give every renamable field a short generated name.
///
/// Scopes are processed parents first. A scope is skipped when it is the
/// global scope or contains a direct `eval` or `with`. Within a scope the
/// most used fields get the shortest names.
pub fn rename_locals(tree: &mut ScopeTree) {
    let renamable: Vec<bool> = tree
        .scope_ids()
        .map(|id| {
            let scope = tree.scope(id);
            scope.kind != ScopeKind::Global && !scope.is_dynamic()
        })
        .collect();

    // Names kept as written anywhere strictly below each scope. Children are
    // always created after their parent, so one reverse sweep collects them.
    let mut kept_below: Vec<HashSet<String>> = vec![HashSet::new(); tree.scope_count()];
    for id in tree.scope_ids().collect::<Vec<_>>().into_iter().rev() {
        let scope = tree.scope(id);
        let Some(parent) = scope.parent else { continue };
        let mut names: Vec<String> = kept_below[id.index()].iter().cloned().collect();
        names.extend(
            scope
                .fields
                .iter()
                .map(|field| tree.field(*field))
                .filter(|field| !renamable[id.index()] || !field.can_rename())
                .map(|field| field.name.clone()),
        );
        kept_below[parent.index()].extend(names);
    }

    let mut renamed = 0usize;
    for id in tree.scope_ids().collect::<Vec<_>>() {
        if !renamable[id.index()] {
            continue;
        }
        renamed += rename_scope(tree, id, &kept_below[id.index()]);
    }
    log::debug!("renamed {} local fields", renamed);
}

fn rename_scope(tree: &mut ScopeTree, id: ScopeId, kept_below: &HashSet<String>) -> usize {
    let scope = tree.scope(id);

    let mut avoid: HashSet<String> = scope.free_names.iter().cloned().collect();
    avoid.extend(
        scope
            .outer_references
            .iter()
            .map(|field| tree.field(*field).output_name().to_string()),
    );
    avoid.extend(
        scope
            .fields
            .iter()
            .map(|field| tree.field(*field))
            .filter(|field| !field.can_rename())
            .map(|field| field.name.clone()),
    );
    avoid.extend(kept_below.iter().cloned());

    let mut candidates: Vec<FieldId> = scope
        .fields
        .iter()
        .copied()
        .filter(|field| tree.field(*field).can_rename())
        .collect();
    candidates.sort_by(|a, b| {
        tree.field(*b)
            .use_count
            .cmp(&tree.field(*a).use_count)
            .then(a.cmp(b))
    });

    let mut names = NameGenerator::default();
    for field in &candidates {
        let name = names.next_avoiding(&avoid);
        avoid.insert(name.clone());
        tree.field_mut(*field).crunched_name = Some(name);
    }
    candidates.len()
}

/// Yields `a`..`z`, `A`..`Z`, `_`, `$`, then two-character names and so on.
#[derive(Debug, Default)]
struct NameGenerator {
    next: usize,
}

impl NameGenerator {
    fn next_avoiding(&mut self, avoid: &HashSet<String>) -> String {
        loop {
            let name = generated_name(self.next);
            self.next += 1;
            if !is_reserved(&name) && !avoid.contains(&name) {
                return name;
            }
        }
    }
}

fn generated_name(mut index: usize) -> String {
    let mut name = String::new();
    name.push(FIRST_CHARS[index % FIRST_CHARS.len()] as char);
    index /= FIRST_CHARS.len();
    while index > 0 {
        index -= 1;
        name.push(NEXT_CHARS[index % NEXT_CHARS.len()] as char);
        index /= NEXT_CHARS.len();
    }
    name
}

fn is_reserved(name: &str) -> bool {
    Keyword::lookup(name).is_some() || RESERVED.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;
    use crate::scope::{declare_scopes, resolve_references};
    use crate::settings::ScriptSettings;
    use core_types::Diagnostics;

    fn renamed(source: &str) -> ScopeTree {
        let settings = ScriptSettings::default();
        let mut diagnostics = Diagnostics::new();
        let mut program = parse(tokenize(source, None), &settings, &mut diagnostics);
        let mut tree = declare_scopes(&mut program, &settings, &mut diagnostics);
        resolve_references(&mut program, &mut tree, &settings, &mut diagnostics);
        rename_locals(&mut tree);
        tree
    }

    fn output(tree: &ScopeTree, scope: ScopeId, name: &str) -> Option<String> {
        tree.scope(scope)
            .get(name)
            .map(|id| tree.field(id).output_name().to_string())
    }

    #[test]
    fn test_generated_name_sequence() {
        assert_eq!(generated_name(0), "a");
        assert_eq!(generated_name(25), "z");
        assert_eq!(generated_name(26), "A");
        assert_eq!(generated_name(53), "$");
        assert_eq!(generated_name(54), "aa");
        assert_eq!(generated_name(55), "ba");
        let distinct: HashSet<String> = (0..10_000).map(generated_name).collect();
        assert_eq!(distinct.len(), 10_000);
    }

    #[test]
    fn test_generator_skips_reserved_and_avoided() {
        assert_eq!(generated_name(764), "in");
        let mut generator = NameGenerator { next: 764 };
        let avoid: HashSet<String> = ["jn".to_string()].into_iter().collect();
        assert_eq!(generator.next_avoiding(&avoid), "kn");
        assert!(is_reserved("do"));
        assert!(is_reserved("let"));
    }

    #[test]
    fn test_globals_are_kept() {
        let tree = renamed("var longName = 1; function helper(value) { return value + longName; }");
        assert_eq!(output(&tree, ScopeId::GLOBAL, "longName").as_deref(), Some("longName"));
        assert_eq!(output(&tree, ScopeId::GLOBAL, "helper").as_deref(), Some("helper"));
        let function = tree.scope(ScopeId::GLOBAL).children[0];
        assert_eq!(output(&tree, function, "value").as_deref(), Some("a"));
        assert_eq!(output(&tree, function, "arguments").as_deref(), Some("arguments"));
    }

    #[test]
    fn test_most_used_field_gets_first_name() {
        let tree = renamed("function f(first, second) { return second + second + first; }");
        let function = tree.scope(ScopeId::GLOBAL).children[0];
        assert_eq!(output(&tree, function, "second").as_deref(), Some("a"));
        assert_eq!(output(&tree, function, "first").as_deref(), Some("b"));
    }

    #[test]
    fn test_free_names_are_avoided() {
        let tree = renamed("function f(x) { return a(x); }");
        let function = tree.scope(ScopeId::GLOBAL).children[0];
        assert_eq!(output(&tree, function, "x").as_deref(), Some("b"));
    }

    #[test]
    fn test_inner_scope_does_not_capture_outer_reference() {
        let tree = renamed("function f(outer) { return function (inner) { return inner + outer; }; }");
        let f = tree.scope(ScopeId::GLOBAL).children[0];
        let g = tree.scope(f).children[0];
        assert_eq!(output(&tree, f, "outer").as_deref(), Some("a"));
        assert_eq!(output(&tree, g, "inner").as_deref(), Some("b"));
    }

    #[test]
    fn test_sibling_scopes_reuse_names() {
        let tree = renamed("function f(x) { return x; } function g(y) { return y; }");
        let f = tree.scope(ScopeId::GLOBAL).children[0];
        let g = tree.scope(ScopeId::GLOBAL).children[1];
        assert_eq!(output(&tree, f, "x").as_deref(), Some("a"));
        assert_eq!(output(&tree, g, "y").as_deref(), Some("a"));
    }

    #[test]
    fn test_eval_disables_renaming() {
        let tree = renamed("function f(value) { return function () { eval('value'); }; }");
        let f = tree.scope(ScopeId::GLOBAL).children[0];
        assert_eq!(output(&tree, f, "value").as_deref(), Some("value"));
    }
}
