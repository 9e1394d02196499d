//! Cycle-safe subtree traversal
//!
//! Breadth-first collection of every node reachable from a start token.
//! Traversal is iterative (explicit queue, no recursion) and guarded by a
//! visited set, so it terminates on cyclic or otherwise malformed graphs.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::graph::DependencyGraph;

/// Collect the full reachable subtree of `start`, including `start` itself.
///
/// Returns `seq_id`s in ascending order regardless of discovery order. On a
/// cyclic graph every node is visited exactly once.
pub fn collect_subtree(graph: &DependencyGraph, start: u32) -> Vec<u32> {
    let mut visited = FxHashSet::default();
    let mut ids = visit_subtree(graph, start, &mut visited);
    ids.sort_unstable();
    ids
}

/// Breadth-first expansion of `start` against a shared visited set.
///
/// Nodes already in `visited` are not collected again, but `start`'s
/// dependents are still expanded, so a node added earlier as a single token
/// can have its subtree pulled in later. Returns the newly visited ids in
/// discovery order; callers sort as needed.
pub fn visit_subtree(
    graph: &DependencyGraph,
    start: u32,
    visited: &mut FxHashSet<u32>,
) -> Vec<u32> {
    let mut collected = Vec::new();
    if visited.insert(start) {
        collected.push(start);
    }

    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        for &child in graph.dependents(current) {
            if visited.insert(child) {
                collected.push(child);
                queue.push_back(child);
            }
        }
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_from_edges(edges: &[(u32, u32)]) -> DependencyGraph {
        let mut graph = DependencyGraph::default();
        for &(head, dep) in edges {
            graph.insert_edge(head, dep);
        }
        graph
    }

    #[test]
    fn test_collects_full_subtree_sorted() {
        // 8 -> {6, 7, 13}, 13 -> {9, 10, 11, 12}
        let graph = graph_from_edges(&[
            (8, 6),
            (8, 7),
            (8, 13),
            (13, 9),
            (13, 10),
            (13, 11),
            (13, 12),
        ]);
        assert_eq!(collect_subtree(&graph, 8), vec![6, 7, 8, 9, 10, 11, 12, 13]);
    }

    #[test]
    fn test_leaf_subtree_is_itself() {
        let graph = graph_from_edges(&[(2, 1)]);
        assert_eq!(collect_subtree(&graph, 1), vec![1]);
    }

    #[test]
    fn test_cycle_terminates_and_visits_once() {
        // A -> B -> A
        let graph = graph_from_edges(&[(1, 2), (2, 1)]);
        assert_eq!(collect_subtree(&graph, 1), vec![1, 2]);
        assert_eq!(collect_subtree(&graph, 2), vec![1, 2]);
    }

    #[test]
    fn test_self_loop_terminates() {
        let graph = graph_from_edges(&[(1, 1)]);
        assert_eq!(collect_subtree(&graph, 1), vec![1]);
    }

    #[test]
    fn test_shared_visited_set_skips_collected_nodes() {
        let graph = graph_from_edges(&[(8, 13), (13, 9)]);
        let mut visited = FxHashSet::default();
        visited.insert(13);

        // 13 is already visited, but its children still get expanded.
        let new = visit_subtree(&graph, 13, &mut visited);
        assert_eq!(new, vec![9]);
    }
}
