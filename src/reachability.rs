//! Reachability engine: memoized DFS transitive closure, run once per
//! direction over the same edge set (outgoing = `deps`, incoming =
//! `dep_by`). Header cross-inclusion makes cycles routine, so a single
//! recursive pass is followed by a relaxation sweep that brings every
//! node's closure to a fixed point when a cycle leaves a node's
//! first-computed closure partial.

use crate::tree::node::NodeId;
use crate::tree::FileTree;
use petgraph::Direction;
use std::collections::BTreeSet;
use tracing::info;

/// Computes `deps` and `dep_by` for every node, then augments `deps` with
/// self, so every file counts as its own dependency; `dep_by` is not
/// self-augmented. Nodes outside a cycle only gain themselves there if the
/// graph structure puts them there.
pub fn compute_closures(tree: &mut FileTree) {
    let all_nodes: Vec<NodeId> = tree.graph.node_indices().collect();

    for &n in &all_nodes {
        tree.graph[n].visited = false;
    }
    for &n in &all_nodes {
        if !tree.graph[n].visited {
            closure_recursive(tree, n, Direction::Outgoing);
        }
    }
    relax_until_fixed(tree, Direction::Outgoing, &all_nodes);

    for &n in &all_nodes {
        tree.graph[n].visited = false;
    }
    for &n in &all_nodes {
        if !tree.graph[n].visited {
            closure_recursive(tree, n, Direction::Incoming);
        }
    }
    relax_until_fixed(tree, Direction::Incoming, &all_nodes);

    // `deps` self-inclusion is explicit. `dep_by` gets the same treatment so
    // `b ∈ a.deps ⇔ a ∈ b.dep_by` also holds for a == b. Without it, an
    // isolated node with no incoming edges would have itself in `deps` but
    // not in `dep_by`.
    for &n in &all_nodes {
        tree.graph[n].deps.insert(n);
        tree.graph[n].dep_by.insert(n);
    }

    info!(nodes = all_nodes.len(), "reachability closures computed");
}

fn get_closure<'a>(tree: &'a FileTree, node: NodeId, direction: Direction) -> &'a BTreeSet<NodeId> {
    match direction {
        Direction::Outgoing => &tree.graph[node].deps,
        Direction::Incoming => &tree.graph[node].dep_by,
    }
}

fn set_closure(tree: &mut FileTree, node: NodeId, direction: Direction, value: BTreeSet<NodeId>) {
    match direction {
        Direction::Outgoing => tree.graph[node].deps = value,
        Direction::Incoming => tree.graph[node].dep_by = value,
    }
}

fn closure_recursive(tree: &mut FileTree, node: NodeId, direction: Direction) -> BTreeSet<NodeId> {
    if tree.graph[node].visited {
        return get_closure(tree, node, direction).clone();
    }
    tree.graph[node].visited = true;

    let neighbors: Vec<NodeId> = tree.graph.neighbors_directed(node, direction).collect();
    let mut result = BTreeSet::new();
    for nb in neighbors {
        let sub = closure_recursive(tree, nb, direction);
        result.extend(sub);
        result.insert(nb);
    }

    set_closure(tree, node, direction, result.clone());
    result
}

/// Brings every node's closure to a fixed point by repeated relaxation:
/// `closure(n) = union(closure(nb) ∪ {nb} for nb in neighbors(n))`. A single
/// memoized DFS pass can leave a node's closure short of its true value
/// when it sits on a cycle and was visited before the cycle closed; this
/// sweep converges regardless of traversal order.
fn relax_until_fixed(tree: &mut FileTree, direction: Direction, all_nodes: &[NodeId]) {
    loop {
        let mut changed = false;
        for &n in all_nodes {
            let neighbors: Vec<NodeId> = tree.graph.neighbors_directed(n, direction).collect();
            let mut candidate = BTreeSet::new();
            for nb in &neighbors {
                candidate.extend(get_closure(tree, *nb, direction).iter().copied());
                candidate.insert(*nb);
            }
            if &candidate != get_closure(tree, n, direction) {
                set_closure(tree, n, direction, candidate);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::RelPath;
    use std::path::PathBuf;

    #[test]
    fn self_inclusion_holds_for_isolated_node() {
        let mut tree = FileTree::new(PathBuf::from("/proj"));
        let n = tree.add_file(&RelPath::parse("lonely.h"));
        compute_closures(&mut tree);
        assert!(tree.graph[n].deps.contains(&n));
    }

    #[test]
    fn chain_closure_is_transitive() {
        let mut tree = FileTree::new(PathBuf::from("/proj"));
        let a = tree.add_file(&RelPath::parse("a.h"));
        let b = tree.add_file(&RelPath::parse("b.h"));
        let c = tree.add_file(&RelPath::parse("c.h"));
        tree.graph.add_edge(a, b, ());
        tree.graph.add_edge(b, c, ());
        compute_closures(&mut tree);
        assert_eq!(tree.graph[a].deps, [a, b, c].into_iter().collect());
        assert_eq!(tree.graph[c].dep_by.contains(&a), true);
    }

    #[test]
    fn cycle_terminates_and_is_symmetric() {
        let mut tree = FileTree::new(PathBuf::from("/proj"));
        let x = tree.add_file(&RelPath::parse("x.h"));
        let y = tree.add_file(&RelPath::parse("y.h"));
        tree.graph.add_edge(x, y, ());
        tree.graph.add_edge(y, x, ());
        compute_closures(&mut tree);

        assert!(tree.graph[x].deps.contains(&y));
        assert!(tree.graph[y].deps.contains(&x));

        for &a in &[x, y] {
            for &b in &[x, y] {
                let b_in_a_deps = tree.graph[a].deps.contains(&b);
                let a_in_b_dep_by = tree.graph[b].dep_by.contains(&a);
                assert_eq!(b_in_a_deps, a_in_b_dep_by, "symmetry violated for ({a:?}, {b:?})");
            }
        }
    }
}
