//! Document to layout graph conversion.

use crate::document::{DocNode, GraphDocument, PinRef};
use crate::error::{HostError, Result};
use crate::size_cache::SizeCache;
use std::collections::{BTreeMap, BTreeSet};
use weft::{EdgeKind, LayoutEdge, LayoutGraph, LayoutNode, NodeId, NodeKey, PinDirection, PinKey, Size};

/// Size used when neither the document nor the cache knows a node.
pub const FALLBACK_SIZE: Size = Size::new(300.0, 100.0);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedGraph {
    pub graph: LayoutGraph,
    /// Node keys indexed by layout id.
    pub keys: Vec<NodeKey>,
    pub index: BTreeMap<NodeKey, NodeId>,
    /// Exec output pins with at least one link, per layout id.
    pub linked_exec_outputs: Vec<usize>,
}

impl ExtractedGraph {
    pub fn key(&self, id: NodeId) -> Option<NodeKey> {
        self.keys.get(id).copied()
    }

    pub fn id(&self, key: NodeKey) -> Option<NodeId> {
        self.index.get(&key).copied()
    }
}

struct ResolvedPin<'a> {
    id: NodeId,
    key: PinKey,
    name: &'a str,
    exec: bool,
}

fn resolve_size(doc: &GraphDocument, node: &DocNode, cache: &dyn SizeCache) -> Size {
    if let Some(size) = node.size {
        if size.width > 0.0 && size.height > 0.0 {
            cache.put(&doc.graph_id, node.key, size);
            return size;
        }
    }
    cache
        .get(&doc.graph_id, node.key)
        .unwrap_or(FALLBACK_SIZE)
}

fn layout_node(id: NodeId, node: &DocNode, size: Size) -> LayoutNode {
    let mut out = LayoutNode::new(id, node.key, size)
        .with_name(node.name.clone())
        .with_position(node.position);
    for pin in &node.pins {
        match (pin.direction, pin.exec) {
            (PinDirection::Input, true) => out = out.with_exec_pins(1, 0),
            (PinDirection::Output, true) => out = out.with_exec_pins(0, 1),
            (PinDirection::Input, false) => out = out.with_data_pins(1, 0),
            (PinDirection::Output, false) => out = out.with_data_pins(0, 1),
        }
    }
    if node.variable_get {
        out = out.variable_get();
    }
    out
}

fn resolve_pin<'a>(
    doc: &'a GraphDocument,
    index: &BTreeMap<NodeKey, NodeId>,
    pin: &'a PinRef,
    preferred: PinDirection,
) -> Result<ResolvedPin<'a>> {
    let unknown = || HostError::UnknownPin {
        node: pin.node,
        pin: pin.pin.clone(),
    };
    let id = *index.get(&pin.node).ok_or_else(unknown)?;
    let node = &doc.nodes[id];
    let other = match preferred {
        PinDirection::Input => PinDirection::Output,
        PinDirection::Output => PinDirection::Input,
    };
    let (direction, (slot, found)) = node
        .pin_index(&pin.pin, preferred)
        .map(|hit| (preferred, hit))
        .or_else(|| node.pin_index(&pin.pin, other).map(|hit| (other, hit)))
        .ok_or_else(unknown)?;
    Ok(ResolvedPin {
        id,
        key: PinKey::new(node.key, direction, found.name.clone(), slot),
        name: &found.name,
        exec: found.exec,
    })
}

/// Validates `doc` and converts it into a layout graph with dense ids in document order.
pub fn extract(doc: &GraphDocument, cache: &dyn SizeCache) -> Result<ExtractedGraph> {
    doc.validate()?;

    let mut graph = LayoutGraph::new();
    let mut keys = Vec::with_capacity(doc.nodes.len());
    let mut index = BTreeMap::new();
    for (id, node) in doc.nodes.iter().enumerate() {
        let size = resolve_size(doc, node, cache);
        graph.add_node(layout_node(id, node, size));
        keys.push(node.key);
        index.insert(node.key, id);
    }

    let mut linked_exec: BTreeSet<PinKey> = BTreeSet::new();
    let mut edges: BTreeMap<(PinKey, PinKey), LayoutEdge> = BTreeMap::new();
    for link in &doc.links {
        let from = resolve_pin(doc, &index, &link.from, PinDirection::Output)?;
        let to = resolve_pin(doc, &index, &link.to, PinDirection::Input)?;
        let (src, dst) = match (from.key.direction, to.key.direction) {
            (PinDirection::Output, PinDirection::Input) => (from, to),
            (PinDirection::Input, PinDirection::Output) => (to, from),
            _ => {
                tracing::debug!(
                    from = %from.key,
                    to = %to.key,
                    "ignoring link between pins of the same direction"
                );
                continue;
            }
        };
        if src.exec {
            linked_exec.insert(src.key.clone());
        }
        if src.id == dst.id {
            continue;
        }
        let kind = if src.exec && dst.exec {
            EdgeKind::Exec
        } else {
            EdgeKind::Data
        };
        let edge = LayoutEdge::new(
            src.id,
            src.name,
            src.key.index,
            dst.id,
            dst.name,
            dst.key.index,
            kind,
        );
        edges.entry((src.key, dst.key)).or_insert(edge);
    }
    for edge in edges.into_values() {
        graph.add_edge(edge);
    }

    let mut linked_exec_outputs = vec![0usize; keys.len()];
    for pin in &linked_exec {
        if let Some(&id) = index.get(&pin.node) {
            linked_exec_outputs[id] += 1;
        }
    }

    tracing::debug!(
        graph_id = %doc.graph_id,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "extracted layout graph"
    );

    Ok(ExtractedGraph {
        graph,
        keys,
        index,
        linked_exec_outputs,
    })
}
