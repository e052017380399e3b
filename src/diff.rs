//! Snapshot diffing.
//!
//! Cross-walks the freshly traversed tree against the tree restored from
//! the prior snapshot, matching nodes by child name. Every regular file
//! whose content digest is unchanged inherits its parsed record from the
//! restored tree instead of being re-parsed; everything else (new files,
//! changed files, and any subtree the restored snapshot never saw) is
//! marked `Modified`.

use crate::tree::node::{NodeFlags, NodeId};
use crate::tree::FileTree;
use tracing::debug;

/// Marks every regular file `Modified` with no parsed data to inherit.
/// This is the snapshot-less path, taken on a first run.
pub fn mark_all_modified(current: &mut FileTree) {
    let files: Vec<NodeId> = current.regular_files().collect();
    for n in files {
        current.graph[n].flags |= NodeFlags::MODIFIED;
    }
}

/// Diffs `current` against `restored`, inheriting parsed records for
/// unchanged regular files and marking everything else modified.
pub fn parse_modified_files(current: &mut FileTree, restored: &FileTree) {
    diff_recursive(current, restored, current.root, restored.root);
}

fn diff_recursive(current: &mut FileTree, restored: &FileTree, cur: NodeId, rest: NodeId) {
    let cur_is_file = current.graph[cur].is_regular_file();
    let rest_is_file = restored.graph[rest].is_regular_file();

    if cur_is_file {
        if rest_is_file {
            let cur_hash = current.graph[cur].record.hash;
            let cur_valid = current.graph[cur].record.hash_valid;
            let rest_record = restored.graph[rest].record.clone();
            if cur_valid && rest_record.hash_valid && cur_hash == rest_record.hash {
                let hash = current.graph[cur].record.hash;
                current.graph[cur].record = rest_record;
                current.graph[cur].record.hash = hash;
                current.graph[cur].record.hash_valid = true;
                debug!(path = %current.rel_path(cur).to_string(), "unchanged; parsed record inherited");
                return;
            }
        }
        current.graph[cur].flags |= NodeFlags::MODIFIED;
        current.graph[cur].record.reset_parsed();
        return;
    }

    // current is a directory: recurse per child, matching restored children
    // by name; anything new relative to the restored tree is modified wholesale.
    let cur_children = current.graph[cur].children.clone();
    for child in cur_children {
        let name = current.graph[child].name.clone();
        let rest_child = if rest_is_file {
            None
        } else {
            restored.graph[rest].children.iter().copied().find(|&c| restored.graph[c].name == name)
        };
        match rest_child {
            Some(rc) => diff_recursive(current, restored, child, rc),
            None => mark_subtree_modified(current, child),
        }
    }
}

fn mark_subtree_modified(current: &mut FileTree, node: NodeId) {
    if current.graph[node].is_regular_file() {
        current.graph[node].flags |= NodeFlags::MODIFIED;
        return;
    }
    let children = current.graph[node].children.clone();
    for c in children {
        mark_subtree_modified(current, c);
    }
}
