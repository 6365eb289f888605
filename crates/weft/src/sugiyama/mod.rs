//! Layering: cycle removal, ranks, long-edge splitting and ordering.
//!
//! Nodes live in one arena. Real nodes come first (same indices as the working graph), dummy nodes
//! are appended by the splitting stages and never leave this module's output.

pub mod acyclic;
pub mod normalize;
pub mod order;
pub mod rank;

use crate::key::{NodeKey, PinKey};
use crate::model::{EdgeKind, Size};
use crate::settings::LayoutSettings;
use crate::work::WorkGraph;

/// Crossing-reduction sweeps per layout.
pub const DEFAULT_SWEEPS: usize = 8;

const VERBOSE_NODE_LIMIT: usize = 120;
const VERBOSE_EDGE_LIMIT: usize = 240;
const VERBOSE_CROSSING_DETAIL_LIMIT: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DummyKind {
    /// Interior point of a split long edge.
    EdgeSegment,
    /// Right-most padding for a dead-end exec node.
    ExecTail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Real { work: usize },
    Dummy(DummyKind),
}

#[derive(Debug, Clone)]
pub struct SugiyamaNode {
    pub key: NodeKey,
    pub kind: NodeKind,
    pub rank: usize,
    pub order: usize,
    pub size: Size,
    pub has_exec_pins: bool,
    pub is_variable_get: bool,
    pub input_pins: usize,
    pub output_pins: usize,
    pub exec_input_pins: usize,
    pub exec_output_pins: usize,
}

impl SugiyamaNode {
    pub fn is_dummy(&self) -> bool {
        matches!(self.kind, NodeKind::Dummy(_))
    }

    pub fn work_index(&self) -> Option<usize> {
        match self.kind {
            NodeKind::Real { work } => Some(work),
            NodeKind::Dummy(_) => None,
        }
    }

    pub(crate) fn dummy(key: NodeKey, kind: DummyKind, edge_kind: EdgeKind, rank: usize) -> Self {
        let exec = usize::from(edge_kind == EdgeKind::Exec);
        Self {
            key,
            kind: NodeKind::Dummy(kind),
            rank,
            order: 0,
            size: Size::default(),
            has_exec_pins: exec > 0,
            is_variable_get: false,
            input_pins: 1,
            output_pins: usize::from(kind == DummyKind::EdgeSegment),
            exec_input_pins: exec,
            exec_output_pins: if kind == DummyKind::EdgeSegment { exec } else { 0 },
        }
    }
}

#[derive(Debug, Clone)]
pub struct SugiyamaEdge {
    pub src: usize,
    pub dst: usize,
    pub src_pin: PinKey,
    pub dst_pin: PinKey,
    pub kind: EdgeKind,
    pub stable_key: String,
    pub min_len: usize,
    /// Temporary flip used while breaking cycles.
    pub reversed: bool,
    /// Set once a reversal has been applied to `src`/`dst`.
    pub flipped: bool,
}

impl SugiyamaEdge {
    pub fn effective_src(&self) -> usize {
        if self.reversed { self.dst } else { self.src }
    }

    pub fn effective_dst(&self) -> usize {
        if self.reversed { self.src } else { self.dst }
    }

    pub fn effective_src_pin(&self) -> &PinKey {
        if self.reversed { &self.dst_pin } else { &self.src_pin }
    }

    pub fn effective_dst_pin(&self) -> &PinKey {
        if self.reversed { &self.src_pin } else { &self.dst_pin }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SugiyamaGraph {
    pub nodes: Vec<SugiyamaNode>,
    pub edges: Vec<SugiyamaEdge>,
}

impl SugiyamaGraph {
    pub fn from_work(work: &WorkGraph) -> Self {
        let nodes = work
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| SugiyamaNode {
                key: n.key,
                kind: NodeKind::Real { work: i },
                rank: 0,
                order: 0,
                size: n.size,
                has_exec_pins: n.has_exec_pins,
                is_variable_get: n.is_variable_get,
                input_pins: n.input_pins,
                output_pins: n.output_pins,
                exec_input_pins: n.exec_input_pins,
                exec_output_pins: n.exec_output_pins,
            })
            .collect();
        let edges = work
            .edges
            .iter()
            .map(|e| SugiyamaEdge {
                src: e.src,
                dst: e.dst,
                src_pin: e.src_pin.clone(),
                dst_pin: e.dst_pin.clone(),
                kind: e.kind,
                stable_key: e.stable_key.clone(),
                min_len: 1,
                reversed: false,
                flipped: false,
            })
            .collect();
        Self { nodes, edges }
    }

    pub fn max_rank(&self) -> usize {
        self.nodes.iter().map(|n| n.rank).max().unwrap_or(0)
    }

    /// Node indices sorted by key (index breaks ties between equal keys).
    pub fn nodes_by_key(&self) -> Vec<usize> {
        let mut out: Vec<usize> = (0..self.nodes.len()).collect();
        out.sort_by(|&a, &b| self.nodes[a].key.cmp(&self.nodes[b].key).then(a.cmp(&b)));
        out
    }

    /// Effective out-edges per node, ordered by source pin, destination key, stable key, index.
    pub fn effective_out_edges(&self) -> Vec<Vec<usize>> {
        let mut out: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for (i, e) in self.edges.iter().enumerate() {
            out[e.effective_src()].push(i);
        }
        for list in &mut out {
            list.sort_by(|&a, &b| {
                let ea = &self.edges[a];
                let eb = &self.edges[b];
                ea.effective_src_pin()
                    .cmp(eb.effective_src_pin())
                    .then_with(|| {
                        self.nodes[ea.effective_dst()]
                            .key
                            .cmp(&self.nodes[eb.effective_dst()].key)
                    })
                    .then_with(|| ea.stable_key.cmp(&eb.stable_key))
                    .then(a.cmp(&b))
            });
        }
        out
    }

    /// Node indices per rank, each sorted by (order, key).
    pub fn rank_layers(&self) -> Vec<Vec<usize>> {
        let mut layers: Vec<Vec<usize>> = vec![Vec::new(); self.max_rank() + 1];
        for (i, n) in self.nodes.iter().enumerate() {
            layers[n.rank].push(i);
        }
        for layer in &mut layers {
            layer.sort_by(|&a, &b| {
                let na = &self.nodes[a];
                let nb = &self.nodes[b];
                na.order.cmp(&nb.order).then(na.key.cmp(&nb.key))
            });
        }
        layers
    }

    pub(crate) fn wants_detail(&self) -> bool {
        self.nodes.len() <= VERBOSE_NODE_LIMIT && self.edges.len() <= VERBOSE_EDGE_LIMIT
    }

    pub(crate) fn wants_crossing_detail(&self) -> bool {
        self.nodes.len() <= VERBOSE_CROSSING_DETAIL_LIMIT && self.edges.len() <= VERBOSE_EDGE_LIMIT
    }

    pub(crate) fn log_layers(&self, stage: &str) {
        if !self.wants_detail() || !tracing::enabled!(tracing::Level::TRACE) {
            return;
        }
        for (rank, layer) in self.rank_layers().iter().enumerate() {
            for &v in layer {
                let n = &self.nodes[v];
                tracing::trace!(
                    stage,
                    rank,
                    order = n.order,
                    node = %n.key,
                    dummy = n.is_dummy(),
                    "layer entry"
                );
            }
        }
    }
}

/// Runs every layering stage and returns the ranked, ordered graph (dummies included).
pub fn run(work: &WorkGraph, settings: &LayoutSettings) -> SugiyamaGraph {
    run_with_sweeps(work, settings, DEFAULT_SWEEPS)
}

pub fn run_with_sweeps(work: &WorkGraph, settings: &LayoutSettings, sweeps: usize) -> SugiyamaGraph {
    let mut g = SugiyamaGraph::from_work(work);

    let flipped = acyclic::remove_cycles(&mut g);
    acyclic::apply_edge_directions(&mut g);
    rank::assign_min_lens(&mut g, settings.variable_get_min_length);
    rank::assign_ranks(&mut g);
    let tails = rank::pad_exec_tails(&mut g);
    let dummies = normalize::split_long_edges(&mut g);
    order::init_order(&mut g);
    g.log_layers("initial-order");
    order::reduce_crossings(&mut g, sweeps);
    order::apply_min_len_zero_ordering(&mut g);
    g.log_layers("final-order");

    tracing::debug!(
        nodes = work.nodes.len(),
        edges = work.edges.len(),
        flipped,
        tails,
        dummies,
        max_rank = g.max_rank(),
        "layering finished"
    );
    g
}
