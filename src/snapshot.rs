//! Binary snapshot codec.
//!
//! The snapshot only carries what the diff step (`diff.rs`) needs to skip
//! re-parsing: path, kind, content digest, and the parsed facts. Graph
//! edges and resolved `implement_files`/`base_class_files` are rebuilt
//! fresh every run by the resolver and edge installer, so they are not
//! persisted.

use crate::error::{AnalyzerError, Result};
use crate::hash::ContentHash;
use crate::path::RelPath;
use crate::record::{FileRecord, IncludeDirective, InheritsFrom};
use crate::symbol::ScopedName;
use crate::tree::FileTree;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SnapshotInclude {
    quoted: bool,
    filename: String,
}

#[derive(Serialize, Deserialize)]
struct SnapshotInherits {
    derived: String,
    base: String,
}

#[derive(Serialize, Deserialize)]
enum SnapshotKind {
    Directory,
    RegularFile,
}

#[derive(Serialize, Deserialize)]
struct SnapshotNode {
    path: String,
    kind: SnapshotKind,
    hash: [u8; 16],
    hash_valid: bool,
    includes: Vec<SnapshotInclude>,
    implementations: Vec<String>,
    declared_classes: Vec<String>,
    declared_functions: Vec<String>,
    inheritances: Vec<SnapshotInherits>,
    using_namespaces: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    root: String,
    nodes: Vec<SnapshotNode>,
}

/// Persists every regular file's parsed record to `path`. Directories are
/// not recorded; they are cheap to recreate on restore via `add_file`.
pub fn serialize(tree: &FileTree, path: &Path) -> Result<()> {
    let mut nodes = Vec::new();
    for n in tree.regular_files() {
        let record = &tree.graph[n].record;
        nodes.push(SnapshotNode {
            path: tree.rel_path(n).to_string(),
            kind: SnapshotKind::RegularFile,
            hash: record.hash.0,
            hash_valid: record.hash_valid,
            includes: record
                .includes
                .iter()
                .map(|i| SnapshotInclude { quoted: i.quoted, filename: i.filename.clone() })
                .collect(),
            implementations: record.implementations.iter().map(|s| s.to_display()).collect(),
            declared_classes: record.declared_classes.iter().map(|s| s.to_display()).collect(),
            declared_functions: record.declared_functions.iter().map(|s| s.to_display()).collect(),
            inheritances: record
                .inheritances
                .iter()
                .map(|i| SnapshotInherits { derived: i.derived.to_display(), base: i.base.to_display() })
                .collect(),
            using_namespaces: record.using_namespaces.iter().map(|s| s.to_display()).collect(),
        });
    }

    let snapshot = SnapshotFile { version: SNAPSHOT_VERSION, root: tree.root_path.to_string_lossy().into_owned(), nodes };
    let bytes = bincode::serde::encode_to_vec(&snapshot, bincode::config::standard())
        .map_err(|e| AnalyzerError::Snapshot(e.to_string()))?;
    fs::write(path, bytes).map_err(|e| AnalyzerError::Io { path: path.to_path_buf(), source: e })
}

/// Restores a `FileTree` from `path`. A missing file, schema mismatch, or
/// truncated read is reported and surfaces as `Err` so the caller can fall
/// back to a full parse; never treated as fatal.
pub fn deserialize(path: &Path, root_path: PathBuf) -> Result<FileTree> {
    let bytes = fs::read(path).map_err(|e| AnalyzerError::Io { path: path.to_path_buf(), source: e })?;
    let (snapshot, _): (SnapshotFile, usize) =
        bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
            .map_err(|e| AnalyzerError::Snapshot(e.to_string()))?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(AnalyzerError::Snapshot(format!(
            "unsupported snapshot schema version {} (expected {})",
            snapshot.version, SNAPSHOT_VERSION
        )));
    }

    let mut tree = FileTree::new(root_path);
    for node in snapshot.nodes {
        let rel = RelPath::parse(&node.path);
        let n = tree.add_file(&rel);
        let mut record = FileRecord::new();
        record.hash = ContentHash(node.hash);
        record.hash_valid = node.hash_valid;
        record.includes = node
            .includes
            .into_iter()
            .map(|i| IncludeDirective { quoted: i.quoted, filename: i.filename })
            .collect();
        record.implementations = node.implementations.iter().map(|s| ScopedName::parse(s)).collect();
        record.declared_classes = node.declared_classes.iter().map(|s| ScopedName::parse(s)).collect();
        record.declared_functions = node.declared_functions.iter().map(|s| ScopedName::parse(s)).collect();
        record.inheritances = node
            .inheritances
            .into_iter()
            .map(|i| InheritsFrom { derived: ScopedName::parse(&i.derived), base: ScopedName::parse(&i.base) })
            .collect();
        record.using_namespaces = node.using_namespaces.iter().map(|s| ScopedName::parse(s)).collect();
        tree.graph[n].record = record;
    }
    tree.state = crate::tree::TreeState::Restored;
    Ok(tree)
}

/// Loads the prior snapshot if present and well-formed; logs and returns
/// `None` otherwise so the caller degrades to a full parse of every file.
pub fn try_load(path: &Path, root_path: PathBuf) -> Option<FileTree> {
    if !path.exists() {
        warn!(path = %path.display(), "no prior snapshot found; full parse");
        return None;
    }
    match deserialize(path, root_path) {
        Ok(tree) => Some(tree),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "snapshot unreadable; full parse");
            None
        }
    }
}
