//! Rank assignment.
//!
//! Ranks come from a longest-path pass over a key-ordered topological order. When any edge touches
//! a node without exec pins, a bounded number of backward sweeps then pulls the sources of those
//! edges towards their destinations.

use super::{DummyKind, SugiyamaEdge, SugiyamaGraph, SugiyamaNode};
use crate::key::{NodeKey, PinKey, edge_stable_key};
use crate::model::EdgeKind;
use std::collections::BTreeSet;

/// Upper bound on backward tightening sweeps.
pub const MAX_TIGHTEN_SWEEPS: usize = 10;

/// Sets `min_len` on every edge: variable-get producers feeding exactly one node use
/// `variable_get_min_length`, everything else uses 1.
pub fn assign_min_lens(g: &mut SugiyamaGraph, variable_get_min_length: usize) {
    let mut consumers: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); g.nodes.len()];
    for e in &g.edges {
        consumers[e.src].insert(e.dst);
    }
    for i in 0..g.edges.len() {
        let src = g.edges[i].src;
        let single_consumer = g.nodes[src].is_variable_get
            && !g.nodes[src].is_dummy()
            && consumers[src].len() == 1;
        g.edges[i].min_len = if single_consumer {
            variable_get_min_length
        } else {
            1
        };
    }
}

/// True when the edge must stay short (either endpoint is a pure data node).
pub fn edge_has_finite_max_len(g: &SugiyamaGraph, e: &SugiyamaEdge) -> bool {
    e.src != e.dst && (!g.nodes[e.src].has_exec_pins || !g.nodes[e.dst].has_exec_pins)
}

/// Kahn's algorithm with the ready set ordered by node key; unreached nodes follow in key order.
pub fn topological_order(g: &SugiyamaGraph) -> Vec<usize> {
    let n = g.nodes.len();
    let out = g.effective_out_edges();
    let mut in_degree = vec![0usize; n];
    for e in &g.edges {
        in_degree[e.effective_dst()] += 1;
    }

    let mut ready: BTreeSet<(NodeKey, usize)> = (0..n)
        .filter(|&v| in_degree[v] == 0)
        .map(|v| (g.nodes[v].key, v))
        .collect();
    let mut seen = vec![false; n];
    let mut order: Vec<usize> = Vec::with_capacity(n);
    while let Some((_, v)) = ready.pop_first() {
        order.push(v);
        seen[v] = true;
        for &ei in &out[v] {
            let w = g.edges[ei].effective_dst();
            in_degree[w] -= 1;
            if in_degree[w] == 0 {
                ready.insert((g.nodes[w].key, w));
            }
        }
    }

    if order.len() < n {
        tracing::debug!(
            reached = order.len(),
            total = n,
            "topological order left nodes unreached"
        );
        order.extend(g.nodes_by_key().into_iter().filter(|&v| !seen[v]));
    }
    order
}

/// Assigns `rank` to every node; the smallest rank is 0.
pub fn assign_ranks(g: &mut SugiyamaGraph) {
    let n = g.nodes.len();
    if n == 0 {
        return;
    }
    let topo = topological_order(g);
    let out = g.effective_out_edges();
    let mut rank = vec![0usize; n];

    for &v in &topo {
        for &ei in &out[v] {
            let e = &g.edges[ei];
            let candidate = rank[v] + e.min_len;
            if candidate > rank[e.dst] {
                rank[e.dst] = candidate;
            }
        }
    }

    let bounded: Vec<bool> = (0..n)
        .map(|v| out[v].iter().any(|&ei| edge_has_finite_max_len(g, &g.edges[ei])))
        .collect();
    if bounded.iter().any(|&b| b) {
        tracing::debug!("rank tightening enabled for data edges");
        for sweep in 0..MAX_TIGHTEN_SWEEPS {
            let mut updated = false;
            for &v in topo.iter().rev() {
                if !bounded[v] {
                    continue;
                }
                // Every out-edge bounds the pull so that rank[dst] >= rank[src] + min_len keeps holding.
                let Some(limit) = out[v]
                    .iter()
                    .map(|&ei| {
                        let e = &g.edges[ei];
                        rank[e.dst].saturating_sub(e.min_len)
                    })
                    .min()
                else {
                    continue;
                };
                if limit > rank[v] {
                    if g.wants_detail() {
                        tracing::trace!(node = %g.nodes[v].key, from = rank[v], to = limit, sweep, "tightened rank");
                    }
                    rank[v] = limit;
                    updated = true;
                }
            }
            if !updated {
                break;
            }
        }
    }

    let min = rank.iter().copied().min().unwrap_or(0);
    for (node, r) in g.nodes.iter_mut().zip(rank) {
        node.rank = r - min;
    }
}

/// Adds an exec-tail dummy at the last rank for each real exec node with no outgoing exec edge.
/// Returns the number of tails added.
pub fn pad_exec_tails(g: &mut SugiyamaGraph) -> usize {
    let max_rank = g.max_rank();
    let mut has_exec_out = vec![false; g.nodes.len()];
    for e in &g.edges {
        if e.kind == EdgeKind::Exec {
            has_exec_out[e.src] = true;
        }
    }

    let candidates: Vec<usize> = g
        .nodes_by_key()
        .into_iter()
        .filter(|&v| {
            let n = &g.nodes[v];
            !n.is_dummy() && n.has_exec_pins && !has_exec_out[v] && n.rank < max_rank
        })
        .collect();

    for &v in &candidates {
        let owner = g.nodes[v].key;
        let key = NodeKey::synthetic(&format!("ExecTail|{owner}"));
        let tail = g.nodes.len();
        g.nodes.push(SugiyamaNode::dummy(
            key,
            DummyKind::ExecTail,
            EdgeKind::Exec,
            max_rank,
        ));
        let src_pin = PinKey::output(owner, "ExecTail", 0);
        let dst_pin = PinKey::input(key, "Dummy", 0);
        let stable_key = edge_stable_key(&src_pin, &dst_pin);
        g.edges.push(SugiyamaEdge {
            src: v,
            dst: tail,
            src_pin,
            dst_pin,
            kind: EdgeKind::Exec,
            stable_key,
            min_len: 1,
            reversed: false,
            flipped: false,
        });
    }
    if !candidates.is_empty() {
        tracing::debug!(tails = candidates.len(), max_rank, "padded dead-end exec nodes");
    }
    candidates.len()
}
