//! File-node data and flags.
//!
//! A node's index into the dependency graph doubles as its identity
//! throughout the tree; there is no separate owning pointer to chase, which
//! is what lets `removeEmptyDirectories` drop a node without invalidating
//! every other reference to it (`StableDiGraph` keeps indices stable across
//! removals).

use crate::record::FileRecord;
use bitflags::bitflags;
use std::collections::BTreeSet;

pub type NodeId = petgraph::stable_graph::NodeIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    RegularFile,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeFlags: u8 {
        /// Content changed (or is new) since the restored snapshot.
        const MODIFIED  = 1 << 0;
        /// Lives under a configured test directory.
        const TEST_FILE = 1 << 1;
        /// Carries a cap-bounded label, currently only "test-main".
        const LABELED   = 1 << 2;
    }
}

#[derive(Debug, Clone)]
pub struct FileNodeData {
    pub name: String,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub record: FileRecord,
    pub flags: NodeFlags,

    /// Transitive closure, computed by the reachability engine. Includes
    /// self once the closure pass for this node has run.
    pub deps: BTreeSet<NodeId>,
    pub dep_by: BTreeSet<NodeId>,
    /// Reused across both closure passes; cleared in between.
    pub visited: bool,
}

impl FileNodeData {
    pub fn new_dir(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        FileNodeData {
            name: name.into(),
            kind: NodeKind::Directory,
            parent,
            children: Vec::new(),
            record: FileRecord::new(),
            flags: NodeFlags::empty(),
            deps: BTreeSet::new(),
            dep_by: BTreeSet::new(),
            visited: false,
        }
    }

    pub fn new_file(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        FileNodeData {
            name: name.into(),
            kind: NodeKind::RegularFile,
            parent,
            children: Vec::new(),
            record: FileRecord::new(),
            flags: NodeFlags::empty(),
            deps: BTreeSet::new(),
            dep_by: BTreeSet::new(),
            visited: false,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory)
    }

    pub fn is_regular_file(&self) -> bool {
        matches!(self.kind, NodeKind::RegularFile)
    }

    pub fn is_modified(&self) -> bool {
        self.flags.contains(NodeFlags::MODIFIED)
    }

    pub fn is_test_file(&self) -> bool {
        self.flags.contains(NodeFlags::TEST_FILE)
    }

    pub fn is_labeled(&self) -> bool {
        self.flags.contains(NodeFlags::LABELED)
    }
}
