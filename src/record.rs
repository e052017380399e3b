//! Per-file parsed facts.

use crate::hash::ContentHash;
use crate::symbol::ScopedName;
use crate::tree::node::NodeId;

/// One `#include` directive as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    pub quoted: bool,
    pub filename: String,
}

/// A declared inheritance: `derived : base`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritsFrom {
    pub derived: ScopedName,
    pub base: ScopedName,
}

/// Per-file parsed facts plus the resolver's annotations on top of them.
/// Unmodified files inherit this whole record, untouched, from the prior
/// snapshot untouched; modified files get a fresh one from the parser.
#[derive(Debug, Clone, Default)]
pub struct FileRecord {
    pub hash: ContentHash,
    pub hash_valid: bool,

    pub includes: Vec<IncludeDirective>,
    pub implementations: Vec<ScopedName>,
    pub declared_classes: Vec<ScopedName>,
    pub declared_functions: Vec<ScopedName>,
    pub inheritances: Vec<InheritsFrom>,
    pub using_namespaces: Vec<ScopedName>,

    /// Files that declare a symbol this file implements (edge installer
    /// reverses this into an explicit dependency from the declarer onto
    /// this file).
    pub implement_files: Vec<NodeId>,
    /// Files that declare a base class this file inherits from.
    pub base_class_files: Vec<NodeId>,
}

impl FileRecord {
    pub fn new() -> Self {
        FileRecord::default()
    }

    /// Clears everything the parser or resolver populated, keeping only the
    /// hash fields. Used when a file is about to be re-parsed.
    pub fn reset_parsed(&mut self) {
        self.includes.clear();
        self.implementations.clear();
        self.declared_classes.clear();
        self.declared_functions.clear();
        self.inheritances.clear();
        self.using_namespaces.clear();
        self.implement_files.clear();
        self.base_class_files.clear();
    }
}
