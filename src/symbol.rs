//! Scoped names and the symbol trie used to index class and function
//! declarations across the whole tree.

use crate::tree::node::NodeId;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A single path segment plus its precomputed hash, for O(1) trie keying.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashedName {
    pub name: String,
    hash: u64,
}

impl HashedName {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        let hash = hasher.finish();
        HashedName { name, hash }
    }

    pub fn hash_key(&self) -> u64 {
        self.hash
    }
}

/// A fully qualified symbolic name, e.g. `ns::Class::method`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ScopedName(Vec<HashedName>);

impl ScopedName {
    pub fn new(segments: Vec<HashedName>) -> Self {
        ScopedName(segments)
    }

    /// Parses `a::b::c` into its segments. A bare name is a single-segment
    /// scoped name.
    pub fn parse(s: &str) -> Self {
        ScopedName(s.split("::").filter(|p| !p.is_empty()).map(HashedName::new).collect())
    }

    pub fn segments(&self) -> &[HashedName] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last_segment(&self) -> Option<&HashedName> {
        self.0.last()
    }

    /// Every prefix of this name, longest first. Used to try decreasing
    /// scope depths when searching a namespace chain.
    pub fn prefixes_longest_first(&self) -> impl Iterator<Item = ScopedName> + '_ {
        (1..=self.0.len()).rev().map(move |n| ScopedName(self.0[..n].to_vec()))
    }

    /// Splits off the last segment, returning (scope, leaf) when there is
    /// more than one segment.
    pub fn split_leaf(&self) -> Option<(ScopedName, HashedName)> {
        if self.0.len() < 2 {
            return None;
        }
        let (scope, leaf) = self.0.split_at(self.0.len() - 1);
        Some((ScopedName(scope.to_vec()), leaf[0].clone()))
    }

    pub fn to_display(&self) -> String {
        self.0.iter().map(|s| s.name.as_str()).collect::<Vec<_>>().join("::")
    }
}

struct TrieNode {
    children: HashMap<u64, usize>,
    declarers: Vec<NodeId>,
}

/// A scope tree keyed by segment hash. Two instances exist in the resolver:
/// one indexing class declarations, one indexing free-function declarations.
pub struct SymbolTrie {
    nodes: Vec<TrieNode>,
}

impl SymbolTrie {
    pub fn new() -> Self {
        SymbolTrie { nodes: vec![TrieNode { children: HashMap::new(), declarers: Vec::new() }] }
    }

    const ROOT: usize = 0;

    fn find_or_new_child(&mut self, at: usize, seg: &HashedName) -> usize {
        if let Some(&idx) = self.nodes[at].children.get(&seg.hash_key()) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(TrieNode { children: HashMap::new(), declarers: Vec::new() });
        self.nodes[at].children.insert(seg.hash_key(), idx);
        idx
    }

    /// Records that `declarer` declares the symbol at `path`. Ties (the same
    /// path declared by more than one file) keep every declaring node;
    /// there is no tie-break, every declarer becomes an edge target.
    pub fn insert(&mut self, path: &ScopedName, declarer: NodeId) {
        let mut at = Self::ROOT;
        for seg in path.segments() {
            at = self.find_or_new_child(at, seg);
        }
        self.nodes[at].declarers.push(declarer);
    }

    fn find_node(&self, path: &ScopedName) -> Option<usize> {
        let mut at = Self::ROOT;
        for seg in path.segments() {
            at = *self.nodes[at].children.get(&seg.hash_key())?;
        }
        Some(at)
    }

    /// Looks up `path` from the trie root (absolute scope search).
    pub fn find(&self, path: &ScopedName) -> Option<&[NodeId]> {
        let at = self.find_node(path)?;
        let decls = &self.nodes[at].declarers;
        if decls.is_empty() { None } else { Some(decls) }
    }
}

impl Default for SymbolTrie {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::NodeIndex;

    fn nid(i: u32) -> NodeId {
        NodeIndex::new(i as usize)
    }

    #[test]
    fn insert_and_find_roundtrip() {
        let mut trie = SymbolTrie::new();
        let path = ScopedName::parse("ns::Widget");
        trie.insert(&path, nid(1));
        assert_eq!(trie.find(&path).unwrap(), &[nid(1)]);
        assert!(trie.find(&ScopedName::parse("ns::Other")).is_none());
    }

    #[test]
    fn ties_keep_every_declarer() {
        let mut trie = SymbolTrie::new();
        let path = ScopedName::parse("Widget");
        trie.insert(&path, nid(1));
        trie.insert(&path, nid(2));
        assert_eq!(trie.find(&path).unwrap(), &[nid(1), nid(2)]);
    }

    #[test]
    fn prefixes_are_longest_first() {
        let name = ScopedName::parse("a::b::c");
        let prefixes: Vec<String> = name.prefixes_longest_first().map(|p| p.to_display()).collect();
        assert_eq!(prefixes, vec!["a::b::c", "a::b", "a"]);
    }
}
