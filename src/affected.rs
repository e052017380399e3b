//! Affected-set extractor: walks the tree after reachability has run and
//! collects affected source/test paths, honoring the optional
//! "no-main" mode that suppresses test files declaring their own `main`.

use crate::config::MAX_MAIN_CANDIDATES;
use crate::path::RelPath;
use crate::tree::node::NodeFlags;
use crate::tree::FileTree;

#[derive(Debug, Default)]
pub struct AffectedLists {
    pub src_affected: Vec<RelPath>,
    pub test_affected: Vec<RelPath>,
    pub total_affected: Vec<RelPath>,
    pub src_modified: Vec<RelPath>,
    pub test_modified: Vec<RelPath>,
}

/// A file is affected if any node in its `deps` or `dep_by` closure
/// (self included, since both closures are self-inclusive) is `Modified`.
fn is_affected(tree: &FileTree, node: crate::tree::node::NodeId) -> bool {
    tree.graph[node].deps.iter().any(|d| tree.graph[*d].is_modified())
        || tree.graph[node].dep_by.iter().any(|d| tree.graph[*d].is_modified())
}

/// Flags up to `cap` test files that implement an unqualified `main` as
/// `Labeled`. The cap exists to bound a pathological test tree; its exact
/// value is a convention rather than a derived constant.
pub fn label_test_mains(tree: &mut FileTree, cap: usize) {
    let mut found = 0usize;
    let candidates: Vec<_> = tree.regular_files().collect();
    for n in candidates {
        if found >= cap {
            break;
        }
        if !tree.graph[n].is_test_file() {
            continue;
        }
        let has_main = tree.graph[n].record.implementations.iter().any(|s| s.to_display() == "main");
        if has_main {
            tree.graph[n].flags |= NodeFlags::LABELED;
            found += 1;
        }
    }
}

pub fn extract(tree: &FileTree, no_main: bool) -> AffectedLists {
    let mut lists = AffectedLists::default();

    for n in tree.regular_files() {
        let is_test = tree.graph[n].is_test_file();

        if tree.graph[n].is_modified() {
            if is_test {
                lists.test_modified.push(tree.rel_path(n));
            } else {
                lists.src_modified.push(tree.rel_path(n));
            }
        }

        if !is_affected(tree, n) {
            continue;
        }

        if is_test {
            if no_main && tree.graph[n].is_labeled() {
                continue;
            }
            lists.test_affected.push(tree.rel_path(n));
        } else {
            lists.src_affected.push(tree.rel_path(n));
        }
    }

    lists.src_affected.sort();
    lists.test_affected.sort();
    lists.src_modified.sort();
    lists.test_modified.sort();

    lists.total_affected = lists.src_affected.iter().chain(lists.test_affected.iter()).cloned().collect();
    lists.total_affected.sort();

    lists
}

/// Convenience wrapper used by the CLI: labels test-mains (if requested)
/// then extracts every list in one call.
pub fn run(tree: &mut FileTree, no_main: bool) -> AffectedLists {
    if no_main {
        label_test_mains(tree, MAX_MAIN_CANDIDATES);
    }
    extract(tree, no_main)
}
