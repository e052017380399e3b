//! Manually declared extra-dependencies reader.

use crate::edges::install_pairs;
use crate::error::{AnalyzerError, Result};
use crate::path::RelPath;
use crate::tree::FileTree;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct ExtraEdge {
    from: String,
    to: String,
}

/// Reads `path` (a JSON array of `{"from": ..., "to": ...}` pairs, relative
/// to the project root) and installs each resolvable pair as an explicit
/// edge, exactly like an include edge. Unresolvable paths are dropped
/// silently; a warning is logged but the run continues.
pub fn load_and_install(tree: &mut FileTree, path: &Path) -> Result<()> {
    let bytes = fs::read(path).map_err(|e| AnalyzerError::Io { path: path.to_path_buf(), source: e })?;
    let edges: Vec<ExtraEdge> = serde_json::from_slice(&bytes)
        .map_err(|e| AnalyzerError::Usage(format!("malformed extra-deps file {}: {e}", path.display())))?;

    let mut pairs = Vec::new();
    for edge in edges {
        let from = tree.search(&RelPath::parse(&edge.from));
        let to = tree.search(&RelPath::parse(&edge.to));
        match (from, to) {
            (Some(f), Some(t)) => pairs.push((f, t)),
            _ => warn!(from = %edge.from, to = %edge.to, "extra dependency references an unknown file; dropped"),
        }
    }

    install_pairs(tree, &pairs);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn installs_resolvable_pairs_and_skips_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = FileTree::new(PathBuf::from("/proj"));
        let a = tree.add_file(&RelPath::parse("a.h"));
        let b = tree.add_file(&RelPath::parse("b.h"));

        let json_path = dir.path().join("extra.json");
        fs::write(&json_path, r#"[{"from":"a.h","to":"b.h"},{"from":"a.h","to":"missing.h"}]"#).unwrap();

        load_and_install(&mut tree, &json_path).unwrap();
        assert!(tree.graph.contains_edge(a, b));
    }
}
