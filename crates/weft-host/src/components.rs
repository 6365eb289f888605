//! Undirected connected components and selection filtering.

use crate::extract::ExtractedGraph;
use std::collections::BTreeSet;
use weft::NodeId;

/// Components of the extracted graph, ignoring edge direction and kind.
///
/// Seeds are visited in node-key order and every component lists its ids by node key, so the
/// result does not depend on document order.
pub fn connected_components(extracted: &ExtractedGraph) -> Vec<Vec<NodeId>> {
    let n = extracted.keys.len();
    let mut adjacency: Vec<BTreeSet<NodeId>> = vec![BTreeSet::new(); n];
    for e in &extracted.graph.edges {
        if e.src >= n || e.dst >= n || e.src == e.dst {
            continue;
        }
        adjacency[e.src].insert(e.dst);
        adjacency[e.dst].insert(e.src);
    }

    let mut visited = vec![false; n];
    let mut components = Vec::new();
    for &seed in extracted.index.values() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let mut component = Vec::new();
        let mut stack = vec![seed];
        while let Some(v) = stack.pop() {
            component.push(v);
            for &w in &adjacency[v] {
                if !visited[w] {
                    visited[w] = true;
                    stack.push(w);
                }
            }
        }
        component.sort_by_key(|&id| extracted.keys[id]);
        components.push(component);
    }
    components
}

/// Components that contain at least one selected id, in their original order.
pub fn select_components(components: &[Vec<NodeId>], selected: &BTreeSet<NodeId>) -> Vec<Vec<NodeId>> {
    components
        .iter()
        .filter(|c| c.iter().any(|id| selected.contains(id)))
        .cloned()
        .collect()
}
