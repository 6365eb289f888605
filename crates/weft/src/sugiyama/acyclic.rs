//! Break cycles by reversing back edges, one at a time.
//!
//! Each round runs a full three-colour DFS (start nodes in key order, out-edges in
//! [`SugiyamaGraph::effective_out_edges`] order), picks the smallest back edge by
//! (source key, source pin, destination key, destination pin) and flips it.

use super::SugiyamaGraph;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    Visiting,
    Done,
}

/// Flips edges until the effective graph is acyclic. Returns the number of reversed edges.
pub fn remove_cycles(g: &mut SugiyamaGraph) -> usize {
    let cap = 2 * g.edges.len() + 1;
    for _ in 0..cap {
        let back = find_back_edges(g);
        let Some(pick) = back
            .iter()
            .copied()
            .min_by(|&a, &b| compare_back_edges(g, a, b))
        else {
            return reversed_count(g);
        };
        if g.wants_detail() {
            let e = &g.edges[pick];
            tracing::trace!(edge = %e.stable_key, candidates = back.len(), "reversing back edge");
        }
        g.edges[pick].reversed = !g.edges[pick].reversed;
    }

    // Reversing every back edge of a single DFS always yields a DAG.
    let back = find_back_edges(g);
    if !back.is_empty() {
        tracing::warn!(
            remaining = back.len(),
            "cycle removal did not settle; reversing all remaining back edges"
        );
        for e in back {
            g.edges[e].reversed = !g.edges[e].reversed;
        }
    }
    reversed_count(g)
}

/// Makes every pending reversal permanent by swapping endpoints and pins.
pub fn apply_edge_directions(g: &mut SugiyamaGraph) {
    for e in &mut g.edges {
        if !e.reversed {
            continue;
        }
        std::mem::swap(&mut e.src, &mut e.dst);
        std::mem::swap(&mut e.src_pin, &mut e.dst_pin);
        e.reversed = false;
        e.flipped = !e.flipped;
    }
}

/// Back edges found by one deterministic DFS, in discovery order.
pub fn find_back_edges(g: &SugiyamaGraph) -> Vec<usize> {
    let out = g.effective_out_edges();
    let mut color = vec![Color::Unvisited; g.nodes.len()];
    let mut back: Vec<usize> = Vec::new();

    for start in g.nodes_by_key() {
        if color[start] != Color::Unvisited {
            continue;
        }
        color[start] = Color::Visiting;
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        while let Some(top) = stack.last_mut() {
            let (v, next) = *top;
            let Some(&ei) = out[v].get(next) else {
                color[v] = Color::Done;
                stack.pop();
                continue;
            };
            top.1 += 1;
            let w = g.edges[ei].effective_dst();
            match color[w] {
                Color::Unvisited => {
                    color[w] = Color::Visiting;
                    stack.push((w, 0));
                }
                Color::Visiting => back.push(ei),
                Color::Done => {}
            }
        }
    }
    back
}

fn compare_back_edges(g: &SugiyamaGraph, a: usize, b: usize) -> Ordering {
    let ea = &g.edges[a];
    let eb = &g.edges[b];
    g.nodes[ea.effective_src()]
        .key
        .cmp(&g.nodes[eb.effective_src()].key)
        .then_with(|| ea.effective_src_pin().cmp(eb.effective_src_pin()))
        .then_with(|| {
            g.nodes[ea.effective_dst()]
                .key
                .cmp(&g.nodes[eb.effective_dst()].key)
        })
        .then_with(|| ea.effective_dst_pin().cmp(eb.effective_dst_pin()))
        .then(a.cmp(&b))
}

fn reversed_count(g: &SugiyamaGraph) -> usize {
    g.edges.iter().filter(|e| e.reversed).count()
}
