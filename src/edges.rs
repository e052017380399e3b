//! Edge installer: converts resolved symbols and includes into explicit
//! node→node dependency edges in the tree's graph. An edge `a -> b` means
//! "a depends on b"; `reachability.rs` reads outgoing edges as `deps` and
//! incoming edges as `dep_by`, so storing the edge once is enough to
//! preserve both directions.

use crate::tree::node::NodeId;
use crate::tree::FileTree;

/// Installs one dependency edge per resolved fact. Implements are reversed:
/// the file that *declares* a symbol depends on whoever implements it, since
/// the declaring header must be retested whenever its implementation changes.
pub fn install_edges(tree: &mut FileTree) {
    let mut pairs: Vec<(NodeId, NodeId)> = Vec::new();

    for n in tree.regular_files() {
        let record = tree.graph[n].record.clone();

        for include in &record.includes {
            if let Some(target) = tree.search_included_file(n, include) {
                pairs.push((n, target));
            }
        }

        for base_file in &record.base_class_files {
            pairs.push((n, *base_file));
        }

        for decl_file in &record.implement_files {
            pairs.push((*decl_file, n));
        }
    }

    install_pairs(tree, &pairs);
}

/// Installs explicit edges from a flat `(from, to)` list. Used both by the
/// include/inheritance/implements pass above and by `extra_deps.rs`, which
/// treats manually declared edges the same way an include edge is treated.
pub fn install_pairs(tree: &mut FileTree, pairs: &[(NodeId, NodeId)]) {
    for &(from, to) in pairs {
        if from == to {
            continue;
        }
        if !tree.graph.contains_edge(from, to) {
            tree.graph.add_edge(from, to, ());
        }
    }
}
