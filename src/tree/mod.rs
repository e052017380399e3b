pub mod node;

use crate::hash::hash_file;
use crate::path::RelPath;
use crate::record::IncludeDirective;
use crate::tree::node::{FileNodeData, NodeId, NodeKind};
use petgraph::stable_graph::StableDiGraph;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Tree-wide lifecycle. Transitions are monotonic in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TreeState {
    Clean,
    Filled,
    Filtered,
    CachesCalculated,
    Parsed,
    Restored,
}

/// Hierarchical container of file nodes. Nodes live in a
/// `StableDiGraph` so dependency edges (installed later, see `edges.rs`)
/// and tree-structural removal (`remove_empty_directories`) can coexist
/// without invalidating node indices held elsewhere.
pub struct FileTree {
    pub graph: StableDiGraph<FileNodeData, ()>,
    pub root: NodeId,
    pub root_path: PathBuf,
    pub include_paths: Vec<NodeId>,
    pub state: TreeState,
}

impl FileTree {
    pub fn new(root_path: PathBuf) -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(FileNodeData::new_dir("", None));
        FileTree {
            graph,
            root,
            root_path,
            include_paths: Vec::new(),
            state: TreeState::Clean,
        }
    }

    fn find_child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.graph[parent]
            .children
            .iter()
            .copied()
            .find(|&c| self.graph[c].name == name)
    }

    fn find_or_new_child(&mut self, parent: NodeId, name: &str, kind: NodeKind) -> NodeId {
        if let Some(existing) = self.find_child_by_name(parent, name) {
            return existing;
        }
        let data = match kind {
            NodeKind::Directory => FileNodeData::new_dir(name, Some(parent)),
            NodeKind::RegularFile => FileNodeData::new_file(name, Some(parent)),
        };
        let child = self.graph.add_node(data);
        self.graph[parent].children.push(child);
        child
    }

    /// Walks `rel`, creating intermediate directory nodes and a terminal
    /// regular-file node. Idempotent: re-adding the same path returns the
    /// existing node.
    pub fn add_file(&mut self, rel: &RelPath) -> NodeId {
        let segs = rel.segments();
        let mut at = self.root;
        for (i, seg) in segs.iter().enumerate() {
            let kind = if i + 1 == segs.len() { NodeKind::RegularFile } else { NodeKind::Directory };
            at = self.find_or_new_child(at, seg, kind);
        }
        at
    }

    /// Looks up a node by relative path from the tree root. `rel` is
    /// expected to already be normalized (`RelPath::parse` resolves `.`/`..`).
    pub fn search(&self, rel: &RelPath) -> Option<NodeId> {
        self.search_from(self.root, rel)
    }

    pub fn search_from(&self, start: NodeId, rel: &RelPath) -> Option<NodeId> {
        let mut at = start;
        for seg in rel.segments() {
            at = self.find_child_by_name(at, seg)?;
        }
        Some(at)
    }

    /// Registers `dir` (relative to the tree root) as an include-path root,
    /// used by `search_included_file` for bracketed/quoted resolution.
    pub fn add_include_path(&mut self, dir: &RelPath) {
        let mut at = self.root;
        for seg in dir.segments() {
            at = self.find_or_new_child(at, seg, NodeKind::Directory);
        }
        self.include_paths.push(at);
    }

    /// Resolves an `#include` directive written in the file at `from`.
    ///
    /// Quoted includes try the including file's own directory first, then
    /// fall back to the configured include paths. Bracketed includes try
    /// the include paths first, then the sibling directory. This ordering
    /// is a hard contract; tie-break is the first match in configured
    /// include-path order.
    pub fn search_included_file(&self, from: NodeId, directive: &IncludeDirective) -> Option<NodeId> {
        let target = RelPath::parse(&directive.filename);
        let sibling_dir = self.graph[from].parent;

        let try_sibling = |tree: &Self| sibling_dir.and_then(|dir| tree.search_from(dir, &target));
        let try_include_paths = |tree: &Self| {
            tree.include_paths.iter().find_map(|&ip| tree.search_from(ip, &target))
        };

        if directive.quoted {
            try_sibling(self).or_else(|| try_include_paths(self))
        } else {
            try_include_paths(self).or_else(|| try_sibling(self))
        }
    }

    /// Deletes every directory with no descendant regular file.
    pub fn remove_empty_directories(&mut self) {
        self.remove_empty_directories_from(self.root);
    }

    /// Returns true if the subtree rooted at `node` still contains at least
    /// one regular file after pruning.
    fn remove_empty_directories_from(&mut self, node: NodeId) -> bool {
        if self.graph[node].is_regular_file() {
            return true;
        }
        let children = self.graph[node].children.clone();
        let mut kept = Vec::with_capacity(children.len());
        for child in children {
            if self.remove_empty_directories_from(child) {
                kept.push(child);
            } else {
                self.graph.remove_node(child);
            }
        }
        self.graph[node].children = kept;
        !self.graph[node].children.is_empty()
    }

    /// Sets the content digest of every regular file from bytes on disk.
    /// Unreadable files are logged and left hash-invalid, so the diff in
    /// `diff.rs` treats them as modified on every subsequent run.
    pub fn calculate_file_hashes(&mut self) {
        let regular_files: Vec<NodeId> = self
            .graph
            .node_indices()
            .filter(|&n| self.graph[n].is_regular_file())
            .collect();
        for n in regular_files {
            let path = self.abs_path(n);
            match hash_file(&path) {
                Ok(h) => {
                    self.graph[n].record.hash = h;
                    self.graph[n].record.hash_valid = true;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to hash file");
                    self.graph[n].record.hash_valid = false;
                }
            }
        }
    }

    /// Reconstructs the absolute path of `node` by walking parent pointers.
    pub fn abs_path(&self, node: NodeId) -> PathBuf {
        self.rel_path(node).to_pathbuf_abs(&self.root_path)
    }

    /// Reconstructs the path of `node` relative to the tree root.
    pub fn rel_path(&self, node: NodeId) -> RelPath {
        let mut segs = Vec::new();
        let mut at = node;
        loop {
            let data = &self.graph[at];
            if data.name.is_empty() {
                break;
            }
            segs.push(data.name.clone());
            match data.parent {
                Some(p) => at = p,
                None => break,
            }
        }
        segs.reverse();
        RelPath::from_segments(segs)
    }

    pub fn regular_files(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices().filter(|&n| self.graph[n].is_regular_file())
    }
}

trait RelPathExt {
    fn to_pathbuf_abs(&self, root: &Path) -> PathBuf;
}

impl RelPathExt for RelPath {
    fn to_pathbuf_abs(&self, root: &Path) -> PathBuf {
        root.join(self.to_pathbuf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_file_is_idempotent_and_creates_intermediate_dirs() {
        let mut tree = FileTree::new(PathBuf::from("/proj"));
        let a = tree.add_file(&RelPath::parse("a/b/c.h"));
        let b = tree.add_file(&RelPath::parse("a/b/c.h"));
        assert_eq!(a, b);
        assert_eq!(tree.rel_path(a).to_string(), "a/b/c.h");
    }

    #[test]
    fn search_finds_added_file() {
        let mut tree = FileTree::new(PathBuf::from("/proj"));
        tree.add_file(&RelPath::parse("x.h"));
        assert!(tree.search(&RelPath::parse("x.h")).is_some());
        assert!(tree.search(&RelPath::parse("y.h")).is_none());
    }

    #[test]
    fn remove_empty_directories_prunes_childless_dirs() {
        let mut tree = FileTree::new(PathBuf::from("/proj"));
        tree.add_file(&RelPath::parse("keep/has_file.h"));
        // force an empty directory with no files
        let empty_dir = RelPath::parse("empty");
        let mut at = tree.root;
        for seg in empty_dir.segments() {
            at = tree.find_or_new_child(at, seg, NodeKind::Directory);
        }
        assert!(tree.search(&RelPath::parse("empty")).is_some());
        tree.remove_empty_directories();
        assert!(tree.search(&RelPath::parse("empty")).is_none());
        assert!(tree.search(&RelPath::parse("keep/has_file.h")).is_some());
    }

    #[test]
    fn quoted_include_prefers_sibling_directory() {
        let mut tree = FileTree::new(PathBuf::from("/proj"));
        tree.add_file(&RelPath::parse("a/main.c"));
        let sibling_header = tree.add_file(&RelPath::parse("a/helper.h"));
        tree.add_include_path(&RelPath::parse("inc"));
        tree.add_file(&RelPath::parse("inc/helper.h"));

        let from = tree.search(&RelPath::parse("a/main.c")).unwrap();
        let directive = IncludeDirective { quoted: true, filename: "helper.h".into() };
        assert_eq!(tree.search_included_file(from, &directive), Some(sibling_header));
    }

    #[test]
    fn bracketed_include_prefers_include_paths() {
        let mut tree = FileTree::new(PathBuf::from("/proj"));
        tree.add_file(&RelPath::parse("a/main.c"));
        tree.add_file(&RelPath::parse("a/helper.h"));
        tree.add_include_path(&RelPath::parse("inc"));
        let inc_header = tree.add_file(&RelPath::parse("inc/helper.h"));

        let from = tree.search(&RelPath::parse("a/main.c")).unwrap();
        let directive = IncludeDirective { quoted: false, filename: "helper.h".into() };
        assert_eq!(tree.search_included_file(from, &directive), Some(inc_header));
    }
}
