//! Top-level orchestration: owns the tree for the duration of one run and
//! drives it through every pipeline stage (traversal, hashing, diffing,
//! parsing, resolution, edge installation, reachability, and affected-set
//! extraction), then persists the new snapshot.

use crate::affected::{self, AffectedLists};
use crate::config::{AnalyzerConfig, SNAPSHOT_FILE_NAME};
use crate::diff;
use crate::edges;
use crate::error::Result;
use crate::extra_deps;
use crate::parser::SourceParser;
use crate::record::FileRecord;
use crate::resolver::{self, SymbolIndex};
use crate::snapshot;
use crate::traversal;
use crate::tree::node::NodeId;
use crate::tree::{FileTree, TreeState};
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Runs the full pipeline and returns the affected-file lists. The new
/// snapshot is written to `config.output_dir` as a side effect; text output
/// files are the caller's responsibility; the CLI front end is treated as
/// an external collaborator, not part of the core.
pub fn run(config: &AnalyzerConfig, parser: &dyn SourceParser) -> Result<AffectedLists> {
    traversal::validate_config(config)?;

    let mut tree = FileTree::new(config.root.clone());
    traversal::read_sources(&mut tree, config);
    tree.remove_empty_directories();
    tree.calculate_file_hashes();
    info!(files = tree.regular_files().count(), "traversal and hashing complete");

    let snapshot_path = config.input_dir.join(SNAPSHOT_FILE_NAME);
    match snapshot::try_load(&snapshot_path, config.root.clone()) {
        Some(restored) => diff::parse_modified_files(&mut tree, &restored),
        None => diff::mark_all_modified(&mut tree),
    }
    info!("snapshot diff complete");

    parse_modified(&mut tree, parser);
    tree.state = TreeState::Parsed;
    info!("parsing complete");

    if let Some(extra_path) = &config.extra_deps_file {
        extra_deps::load_and_install(&mut tree, extra_path)?;
    }

    let index = SymbolIndex::build(&tree);
    resolver::annotate_records(&mut tree, &index);
    edges::install_edges(&mut tree);
    info!("symbol resolution and edge installation complete");

    crate::reachability::compute_closures(&mut tree);
    info!("reachability closures complete");

    let lists = affected::run(&mut tree, config.no_main);
    info!(
        src = lists.src_affected.len(),
        test = lists.test_affected.len(),
        "affected-set extraction complete"
    );

    fs::create_dir_all(&config.output_dir)
        .map_err(|e| crate::error::AnalyzerError::Io { path: config.output_dir.clone(), source: e })?;
    let out_snapshot = config.output_dir.join(SNAPSHOT_FILE_NAME);
    snapshot::serialize(&tree, &out_snapshot)?;

    Ok(lists)
}

/// Parses every `Modified` regular file. Each worker only ever reads its
/// own file and returns an owned `FileRecord`; nothing touches the tree
/// until every worker has finished, so no two workers ever share a node.
fn parse_modified(tree: &mut FileTree, parser: &dyn SourceParser) {
    let targets: Vec<(NodeId, PathBuf)> = tree
        .regular_files()
        .filter(|&n| tree.graph[n].is_modified())
        .map(|n| (n, tree.abs_path(n)))
        .collect();

    let parsed: Vec<(NodeId, FileRecord)> = targets
        .par_iter()
        .map(|(n, path)| {
            let record = match fs::read(path) {
                Ok(bytes) => parser.parse(path, &bytes),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to read file for parsing");
                    FileRecord::new()
                }
            };
            (*n, record)
        })
        .collect();

    for (n, mut record) in parsed {
        let hash = tree.graph[n].record.hash;
        let hash_valid = tree.graph[n].record.hash_valid;
        record.hash = hash;
        record.hash_valid = hash_valid;
        tree.graph[n].record = record;
    }
}
