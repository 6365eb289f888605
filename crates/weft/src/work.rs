//! Component-local working graph with zero-based indices.

use crate::error::{Error, Result};
use crate::key::{NodeKey, PinKey};
use crate::model::{EdgeKind, LayoutGraph, LayoutNode, NodeId, Point, Size};
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone)]
pub struct WorkNode {
    pub graph_id: NodeId,
    pub key: NodeKey,
    pub name: String,
    pub size: Size,
    pub original_position: Point,
    pub has_exec_pins: bool,
    pub is_variable_get: bool,
    pub input_pins: usize,
    pub output_pins: usize,
    pub exec_input_pins: usize,
    pub exec_output_pins: usize,
}

impl WorkNode {
    fn from_layout(node: &LayoutNode) -> Self {
        Self {
            graph_id: node.id,
            key: node.key,
            name: node.name.clone(),
            size: node.size.clamped(),
            original_position: node.position,
            has_exec_pins: node.has_exec_pins,
            is_variable_get: node.is_variable_get,
            input_pins: node.input_pins,
            output_pins: node.output_pins,
            exec_input_pins: node.exec_input_pins,
            exec_output_pins: node.exec_output_pins,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkEdge {
    pub src: usize,
    pub dst: usize,
    pub kind: EdgeKind,
    pub src_pin: PinKey,
    pub dst_pin: PinKey,
    pub stable_key: String,
}

#[derive(Debug, Clone, Default)]
pub struct WorkGraph {
    pub nodes: Vec<WorkNode>,
    pub edges: Vec<WorkEdge>,
}

impl WorkGraph {
    /// Builds the working graph for the component `ids` of `graph`.
    ///
    /// Ids are deduplicated and sorted. Edges leaving the component and self-loops are dropped.
    pub fn build(graph: &LayoutGraph, ids: &[NodeId]) -> Result<Self> {
        let mut ids: Vec<NodeId> = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Err(Error::EmptyComponent);
        }

        let mut by_id: HashMap<NodeId, &LayoutNode> = HashMap::default();
        for node in &graph.nodes {
            by_id.entry(node.id).or_insert(node);
        }

        let mut nodes: Vec<WorkNode> = Vec::with_capacity(ids.len());
        let mut local: HashMap<NodeId, usize> = HashMap::default();
        for id in ids {
            let Some(node) = by_id.get(&id) else {
                return Err(Error::MissingNode { id });
            };
            local.insert(id, nodes.len());
            nodes.push(WorkNode::from_layout(node));
        }

        let mut edges: Vec<WorkEdge> = Vec::new();
        for e in &graph.edges {
            let (Some(&src), Some(&dst)) = (local.get(&e.src), local.get(&e.dst)) else {
                continue;
            };
            if src == dst {
                continue;
            }
            let src_key = nodes[src].key;
            let dst_key = nodes[dst].key;
            edges.push(WorkEdge {
                src,
                dst,
                kind: e.kind,
                src_pin: e.src_pin_key(src_key),
                dst_pin: e.dst_pin_key(dst_key),
                stable_key: e.resolved_stable_key(src_key, dst_key),
            });
        }
        edges.sort_by(|a, b| {
            a.stable_key
                .cmp(&b.stable_key)
                .then(a.src.cmp(&b.src))
                .then(a.dst.cmp(&b.dst))
                .then(a.src_pin.index.cmp(&b.src_pin.index))
        });

        Ok(Self { nodes, edges })
    }

    pub fn is_single_node(&self) -> bool {
        self.nodes.len() == 1
    }
}
