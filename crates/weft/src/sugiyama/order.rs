//! Ordering within ranks: initial seed, barycenter sweeps, zero-gap grouping.

use super::{SugiyamaEdge, SugiyamaGraph, SugiyamaNode};
use crate::key::PinKey;
use crate::model::EdgeKind;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use std::cmp::Ordering;

/// Seeds `order` in every rank: exec nodes first, larger exec fan-out first, then key.
pub fn init_order(g: &mut SugiyamaGraph) {
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); g.max_rank() + 1];
    for (i, n) in g.nodes.iter().enumerate() {
        layers[n.rank].push(i);
    }
    for layer in &mut layers {
        layer.sort_by(|&a, &b| seed_cmp(&g.nodes[a], &g.nodes[b]).then(a.cmp(&b)));
        for (order, &v) in layer.iter().enumerate() {
            g.nodes[v].order = order;
        }
    }
}

fn seed_cmp(a: &SugiyamaNode, b: &SugiyamaNode) -> Ordering {
    b.has_exec_pins
        .cmp(&a.has_exec_pins)
        .then_with(|| {
            if a.has_exec_pins {
                b.exec_output_pins.cmp(&a.exec_output_pins)
            } else {
                Ordering::Equal
            }
        })
        .then(a.key.cmp(&b.key))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// Incoming neighbours at `rank - 1`.
    Forward,
    /// Outgoing neighbours at `rank + 1`; `data_only` ignores exec edges and exec consumers.
    Backward { data_only: bool },
}

impl Pass {
    fn label(self) -> &'static str {
        match self {
            Pass::Forward => "fwd",
            Pass::Backward { data_only: true } => "bwd-data",
            Pass::Backward { data_only: false } => "bwd",
        }
    }

    fn neighbor(self, e: &SugiyamaEdge) -> usize {
        match self {
            Pass::Forward => e.src,
            Pass::Backward { .. } => e.dst,
        }
    }

    fn neighbor_rank(self, rank: usize) -> Option<usize> {
        match self {
            Pass::Forward => rank.checked_sub(1),
            Pass::Backward { .. } => Some(rank + 1),
        }
    }

    fn pin(self, e: &SugiyamaEdge) -> &PinKey {
        match self {
            Pass::Forward => &e.src_pin,
            Pass::Backward { .. } => &e.dst_pin,
        }
    }

    fn pin_count(self, n: &SugiyamaNode) -> usize {
        match self {
            Pass::Forward => n.output_pins,
            Pass::Backward { .. } => n.input_pins,
        }
    }

    fn skips(self, e: &SugiyamaEdge, neighbor: &SugiyamaNode) -> bool {
        match self {
            Pass::Forward => neighbor.exec_output_pins == 0 && e.kind != EdgeKind::Exec,
            Pass::Backward { data_only } => {
                data_only && (e.kind == EdgeKind::Exec || neighbor.exec_input_pins > 0)
            }
        }
    }
}

/// Fractional position of a pin on its side, always in `[0, 1)`.
pub fn pin_offset(index: usize, count: usize) -> f64 {
    let count = count.max(1);
    index.min(count - 1) as f64 / count as f64
}

fn adjacency(g: &SugiyamaGraph) -> (Vec<Vec<usize>>, Vec<Vec<usize>>) {
    let mut ins: Vec<Vec<usize>> = vec![Vec::new(); g.nodes.len()];
    let mut outs: Vec<Vec<usize>> = vec![Vec::new(); g.nodes.len()];
    for (i, e) in g.edges.iter().enumerate() {
        if e.src == e.dst {
            continue;
        }
        outs[e.src].push(i);
        ins[e.dst].push(i);
    }
    (ins, outs)
}

fn barycenter(g: &SugiyamaGraph, v: usize, rank: usize, adj: &[Vec<usize>], pass: Pass) -> (f64, usize) {
    let Some(neighbor_rank) = pass.neighbor_rank(rank) else {
        return (g.nodes[v].order as f64, 0);
    };
    let mut edges: Vec<usize> = adj[v]
        .iter()
        .copied()
        .filter(|&ei| g.nodes[pass.neighbor(&g.edges[ei])].rank == neighbor_rank)
        .collect();
    edges.sort_by(|&a, &b| pass.pin(&g.edges[a]).cmp(pass.pin(&g.edges[b])).then(a.cmp(&b)));

    let mut sum = 0.0;
    let mut count = 0usize;
    for ei in edges {
        let e = &g.edges[ei];
        let neighbor = &g.nodes[pass.neighbor(e)];
        if pass.skips(e, neighbor) {
            continue;
        }
        sum += neighbor.order as f64 + pin_offset(pass.pin(e).index, pass.pin_count(neighbor));
        count += 1;
    }
    if count == 0 {
        (g.nodes[v].order as f64, 0)
    } else {
        (sum / count as f64, count)
    }
}

fn sweep_rank(
    g: &mut SugiyamaGraph,
    layer: &mut Vec<usize>,
    rank: usize,
    adj: &[Vec<usize>],
    pass: Pass,
    sweep: usize,
    detail: bool,
) {
    if layer.is_empty() {
        return;
    }
    let mut items: Vec<(f64, usize)> = Vec::with_capacity(layer.len());
    for &v in layer.iter() {
        let (bary, neighbors) = barycenter(g, v, rank, adj, pass);
        if detail {
            tracing::trace!(
                pass = pass.label(),
                sweep,
                rank,
                node = %g.nodes[v].key,
                bary,
                neighbors,
                "barycenter"
            );
        }
        items.push((bary, v));
    }
    items.sort_by(|a, b| {
        a.0.total_cmp(&b.0)
            .then_with(|| g.nodes[a.1].key.cmp(&g.nodes[b.1].key))
            .then(a.1.cmp(&b.1))
    });

    layer.clear();
    for (order, (_, v)) in items.into_iter().enumerate() {
        g.nodes[v].order = order;
        layer.push(v);
    }
}

/// Runs `sweeps` rounds of barycenter ordering.
///
/// Each round does a forward pass, then (except in the last round) a data-only backward pass,
/// then (except in the last two rounds) a full backward pass. The trailing forward-only rounds
/// settle exec lanes that end early.
pub fn reduce_crossings(g: &mut SugiyamaGraph, sweeps: usize) {
    let max_rank = g.max_rank();
    if max_rank == 0 || sweeps == 0 {
        return;
    }
    let detail = g.wants_crossing_detail();
    let mut layers = g.rank_layers();
    let (ins, outs) = adjacency(g);

    for sweep in 0..sweeps {
        for rank in 1..=max_rank {
            sweep_rank(g, &mut layers[rank], rank, &ins, Pass::Forward, sweep, detail);
        }
        if sweep + 1 < sweeps {
            let pass = Pass::Backward { data_only: true };
            for rank in (0..max_rank).rev() {
                sweep_rank(g, &mut layers[rank], rank, &outs, pass, sweep, detail);
            }
        }
        if sweep + 2 < sweeps {
            let pass = Pass::Backward { data_only: false };
            for rank in (0..max_rank).rev() {
                sweep_rank(g, &mut layers[rank], rank, &outs, pass, sweep, detail);
            }
        }
        for layer in &mut layers {
            layer.sort_by(|&a, &b| {
                let na = &g.nodes[a];
                let nb = &g.nodes[b];
                na.order.cmp(&nb.order).then(na.key.cmp(&nb.key))
            });
        }
    }
    tracing::debug!(sweeps, max_rank, crossings = count_crossings(g), "crossing reduction finished");
}

/// Places each zero-gap producer directly after the node it feeds in the same rank, chaining
/// through producers of producers. Producers of one consumer follow its input pin order.
pub fn apply_min_len_zero_ordering(g: &mut SugiyamaGraph) {
    let mut by_dst: HashMap<usize, Vec<usize>> = HashMap::default();
    let mut sources: HashSet<usize> = HashSet::default();
    for (i, e) in g.edges.iter().enumerate() {
        if e.min_len != 0 || e.src == e.dst {
            continue;
        }
        let src = &g.nodes[e.src];
        let dst = &g.nodes[e.dst];
        if src.is_dummy() || dst.is_dummy() || src.rank != dst.rank {
            continue;
        }
        by_dst.entry(e.dst).or_default().push(i);
        sources.insert(e.src);
    }
    if by_dst.is_empty() {
        return;
    }
    for list in by_dst.values_mut() {
        list.sort_by(|&a, &b| {
            let ea = &g.edges[a];
            let eb = &g.edges[b];
            ea.dst_pin
                .index
                .cmp(&eb.dst_pin.index)
                .then_with(|| g.nodes[ea.src].key.cmp(&g.nodes[eb.src].key))
                .then(a.cmp(&b))
        });
    }

    for layer in g.rank_layers() {
        let mut added: HashSet<usize> = HashSet::default();
        let mut reordered: Vec<usize> = Vec::with_capacity(layer.len());
        for &v in &layer {
            if added.contains(&v) || sources.contains(&v) {
                continue;
            }
            append_with_sources(g, v, &by_dst, &mut added, &mut reordered);
        }
        for &v in &layer {
            if !added.contains(&v) {
                append_with_sources(g, v, &by_dst, &mut added, &mut reordered);
            }
        }
        for (order, &v) in reordered.iter().enumerate() {
            g.nodes[v].order = order;
        }
    }
}

fn append_with_sources(
    g: &SugiyamaGraph,
    start: usize,
    by_dst: &HashMap<usize, Vec<usize>>,
    added: &mut HashSet<usize>,
    out: &mut Vec<usize>,
) {
    let mut stack = vec![start];
    while let Some(v) = stack.pop() {
        if !added.insert(v) {
            continue;
        }
        out.push(v);
        if let Some(edges) = by_dst.get(&v) {
            stack.extend(edges.iter().rev().map(|&ei| g.edges[ei].src));
        }
    }
}

/// Number of pairwise crossings between edges joining adjacent ranks.
pub fn count_crossings(g: &SugiyamaGraph) -> usize {
    let mut by_rank: Vec<Vec<(usize, usize)>> = vec![Vec::new(); g.max_rank() + 1];
    for e in &g.edges {
        let src = &g.nodes[e.src];
        let dst = &g.nodes[e.dst];
        if dst.rank == src.rank + 1 {
            by_rank[src.rank].push((src.order, dst.order));
        }
    }
    let mut crossings = 0usize;
    for segs in &by_rank {
        for (i, a) in segs.iter().enumerate() {
            for b in &segs[i + 1..] {
                if (a.0 < b.0 && a.1 > b.1) || (a.0 > b.0 && a.1 < b.1) {
                    crossings += 1;
                }
            }
        }
    }
    crossings
}
