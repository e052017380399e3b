//! Symbol resolver: indexes class/function declarations across the whole
//! tree, then resolves each file's implementations and declared
//! inheritances into annotations on the file record.

use crate::symbol::{ScopedName, SymbolTrie};
use crate::tree::node::NodeId;
use crate::tree::FileTree;

pub struct SymbolIndex {
    pub classes: SymbolTrie,
    pub functions: SymbolTrie,
}

impl SymbolIndex {
    /// Single serial indexing pass over every regular file's declarations.
    /// Must run after all per-file parsing completes; concurrent trie
    /// insertion is not supported.
    pub fn build(tree: &FileTree) -> Self {
        let mut classes = SymbolTrie::new();
        let mut functions = SymbolTrie::new();
        for n in tree.regular_files() {
            let record = &tree.graph[n].record;
            for class_name in &record.declared_classes {
                classes.insert(class_name, n);
            }
            for func_name in &record.declared_functions {
                functions.insert(func_name, n);
            }
        }
        SymbolIndex { classes, functions }
    }

    /// Tries `scope`, then `scope` prefixed by each active `using namespace`
    /// directive, in file order. The using-namespace directives act as
    /// alternative roots for the lookup.
    fn find_with_usings<'a>(
        trie: &'a SymbolTrie,
        scope: &ScopedName,
        usings: &[ScopedName],
    ) -> Option<&'a [NodeId]> {
        if let Some(hit) = trie.find(scope) {
            return Some(hit);
        }
        for ns in usings {
            let mut qualified = ns.segments().to_vec();
            qualified.extend(scope.segments().iter().cloned());
            let qualified = ScopedName::new(qualified);
            if let Some(hit) = trie.find(&qualified) {
                return Some(hit);
            }
        }
        None
    }

    /// Longest-suffix class match: tries decreasing-length trailing suffixes
    /// of `name`, splitting each into a candidate class scope (all but the
    /// last segment) and method name (the last segment, constant across
    /// suffixes). First hit wins; ties at that hit keep every declarer.
    /// Falls back to a free-function lookup of the whole name when no class
    /// match exists anywhere.
    pub fn resolve_implementation(&self, name: &ScopedName, usings: &[ScopedName]) -> Vec<NodeId> {
        let segs = name.segments();
        for len in (2..=segs.len()).rev() {
            let suffix = &segs[segs.len() - len..];
            let class_scope = ScopedName::new(suffix[..len - 1].to_vec());
            if let Some(hit) = Self::find_with_usings(&self.classes, &class_scope, usings) {
                return hit.to_vec();
            }
        }
        Self::find_with_usings(&self.functions, name, usings)
            .map(|hit| hit.to_vec())
            .unwrap_or_default()
    }

    pub fn resolve_base_class(&self, base: &ScopedName, usings: &[ScopedName]) -> Vec<NodeId> {
        Self::find_with_usings(&self.classes, base, usings).map(|hit| hit.to_vec()).unwrap_or_default()
    }
}

/// Annotates every regular file's record with `implement_files` and
/// `base_class_files`, the resolver's output consumed by `edges.rs`.
pub fn annotate_records(tree: &mut FileTree, index: &SymbolIndex) {
    let files: Vec<NodeId> = tree.regular_files().collect();
    for n in files {
        let (implementations, inheritances, usings) = {
            let record = &tree.graph[n].record;
            (record.implementations.clone(), record.inheritances.clone(), record.using_namespaces.clone())
        };

        let mut implement_files = Vec::new();
        for impl_name in &implementations {
            implement_files.extend(index.resolve_implementation(impl_name, &usings));
        }

        let mut base_class_files = Vec::new();
        for inh in &inheritances {
            base_class_files.extend(index.resolve_base_class(&inh.base, &usings));
        }

        let record = &mut tree.graph[n].record;
        record.implement_files = implement_files;
        record.base_class_files = base_class_files;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::RelPath;
    use crate::record::InheritsFrom;
    use std::path::PathBuf;

    #[test]
    fn resolves_scoped_method_to_declaring_class_file() {
        let mut tree = FileTree::new(PathBuf::from("/proj"));
        let header = tree.add_file(&RelPath::parse("widget.h"));
        tree.graph[header].record.declared_classes.push(ScopedName::parse("Widget"));

        let source = tree.add_file(&RelPath::parse("widget.c"));
        tree.graph[source].record.implementations.push(ScopedName::parse("Widget::draw"));

        let index = SymbolIndex::build(&tree);
        annotate_records(&mut tree, &index);

        assert_eq!(tree.graph[source].record.implement_files, vec![header]);
    }

    #[test]
    fn using_namespace_enables_unqualified_lookup() {
        let mut tree = FileTree::new(PathBuf::from("/proj"));
        let header = tree.add_file(&RelPath::parse("ns_widget.h"));
        tree.graph[header].record.declared_classes.push(ScopedName::parse("ns::Widget"));

        let source = tree.add_file(&RelPath::parse("ns_widget.c"));
        tree.graph[source].record.using_namespaces.push(ScopedName::parse("ns"));
        tree.graph[source].record.implementations.push(ScopedName::parse("Widget::draw"));

        let index = SymbolIndex::build(&tree);
        annotate_records(&mut tree, &index);

        assert_eq!(tree.graph[source].record.implement_files, vec![header]);
    }

    #[test]
    fn unscoped_implementation_resolves_as_free_function() {
        let mut tree = FileTree::new(PathBuf::from("/proj"));
        let header = tree.add_file(&RelPath::parse("util.h"));
        tree.graph[header].record.declared_functions.push(ScopedName::parse("helper"));

        let source = tree.add_file(&RelPath::parse("util.c"));
        tree.graph[source].record.implementations.push(ScopedName::parse("helper"));

        let index = SymbolIndex::build(&tree);
        annotate_records(&mut tree, &index);

        assert_eq!(tree.graph[source].record.implement_files, vec![header]);
    }

    #[test]
    fn inheritance_resolves_base_class_file() {
        let mut tree = FileTree::new(PathBuf::from("/proj"));
        let base_header = tree.add_file(&RelPath::parse("base.h"));
        tree.graph[base_header].record.declared_classes.push(ScopedName::parse("Base"));

        let derived = tree.add_file(&RelPath::parse("derived.h"));
        tree.graph[derived].record.declared_classes.push(ScopedName::parse("Derived"));
        tree.graph[derived].record.inheritances.push(InheritsFrom {
            derived: ScopedName::parse("Derived"),
            base: ScopedName::parse("Base"),
        });

        let index = SymbolIndex::build(&tree);
        annotate_records(&mut tree, &index);

        assert_eq!(tree.graph[derived].record.base_class_files, vec![base_header]);
    }
}
