//! Caller-facing graph description and layout result.

use crate::key::{NodeKey, PinKey, edge_stable_key};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dense, caller-assigned node id.
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Exec,
    Data,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Negative and non-finite extents become 0.
    pub fn clamped(self) -> Self {
        fn clamp(v: f64) -> f64 {
            if v.is_finite() && v > 0.0 { v } else { 0.0 }
        }
        Self {
            width: clamp(self.width),
            height: clamp(self.height),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            min: origin,
            max: Point::new(origin.x + size.width, origin.y + size.height),
        }
    }

    pub fn union(self, other: Rect) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: NodeId,
    pub key: NodeKey,
    #[serde(default)]
    pub name: String,
    pub size: Size,
    /// Top-left position before layout.
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub has_exec_pins: bool,
    /// Single-value producer (variable read) that may be pulled next to its consumer.
    #[serde(default)]
    pub is_variable_get: bool,
    /// Total input pins, exec pins included.
    #[serde(default)]
    pub input_pins: usize,
    /// Total output pins, exec pins included.
    #[serde(default)]
    pub output_pins: usize,
    #[serde(default)]
    pub exec_input_pins: usize,
    #[serde(default)]
    pub exec_output_pins: usize,
}

impl LayoutNode {
    pub fn new(id: NodeId, key: NodeKey, size: Size) -> Self {
        Self {
            id,
            key,
            name: String::new(),
            size,
            position: Point::default(),
            has_exec_pins: false,
            is_variable_get: false,
            input_pins: 0,
            output_pins: 0,
            exec_input_pins: 0,
            exec_output_pins: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Adds exec pins on both sides; they also count towards the per-direction totals.
    pub fn with_exec_pins(mut self, inputs: usize, outputs: usize) -> Self {
        self.has_exec_pins = self.has_exec_pins || inputs + outputs > 0;
        self.exec_input_pins += inputs;
        self.exec_output_pins += outputs;
        self.input_pins += inputs;
        self.output_pins += outputs;
        self
    }

    pub fn with_data_pins(mut self, inputs: usize, outputs: usize) -> Self {
        self.input_pins += inputs;
        self.output_pins += outputs;
        self
    }

    pub fn variable_get(mut self) -> Self {
        self.is_variable_get = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub src: NodeId,
    pub dst: NodeId,
    pub src_pin: String,
    #[serde(default)]
    pub src_pin_index: usize,
    pub dst_pin: String,
    #[serde(default)]
    pub dst_pin_index: usize,
    pub kind: EdgeKind,
    /// Derived from both pin keys when left empty.
    #[serde(default)]
    pub stable_key: String,
}

impl LayoutEdge {
    pub fn new(
        src: NodeId,
        src_pin: impl Into<String>,
        src_pin_index: usize,
        dst: NodeId,
        dst_pin: impl Into<String>,
        dst_pin_index: usize,
        kind: EdgeKind,
    ) -> Self {
        Self {
            src,
            dst,
            src_pin: src_pin.into(),
            src_pin_index,
            dst_pin: dst_pin.into(),
            dst_pin_index,
            kind,
            stable_key: String::new(),
        }
    }

    pub fn exec(src: NodeId, dst: NodeId) -> Self {
        Self::new(src, "then", 0, dst, "exec", 0, EdgeKind::Exec)
    }

    pub fn data(src: NodeId, src_pin_index: usize, dst: NodeId, dst_pin_index: usize) -> Self {
        Self::new(
            src,
            "value",
            src_pin_index,
            dst,
            "value",
            dst_pin_index,
            EdgeKind::Data,
        )
    }

    pub fn src_pin_key(&self, src: NodeKey) -> PinKey {
        PinKey::output(src, self.src_pin.clone(), self.src_pin_index)
    }

    pub fn dst_pin_key(&self, dst: NodeKey) -> PinKey {
        PinKey::input(dst, self.dst_pin.clone(), self.dst_pin_index)
    }

    /// The caller-supplied key, or one built from the endpoint pin keys.
    pub fn resolved_stable_key(&self, src: NodeKey, dst: NodeKey) -> String {
        if self.stable_key.is_empty() {
            edge_stable_key(&self.src_pin_key(src), &self.dst_pin_key(dst))
        } else {
            self.stable_key.clone()
        }
    }
}

/// One logical graph; may hold several disjoint components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutGraph {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

impl LayoutGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: LayoutNode) -> NodeId {
        let id = node.id;
        self.nodes.push(node);
        id
    }

    pub fn add_edge(&mut self, edge: LayoutEdge) {
        self.edges.push(edge);
    }

    pub fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }
}

/// Final rank and order of a laid-out node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLayer {
    pub rank: usize,
    pub order: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutComponentResult {
    /// Top-left positions keyed by caller node id.
    pub positions: BTreeMap<NodeId, Point>,
    pub bounds: Rect,
    pub layers: BTreeMap<NodeId, NodeLayer>,
}
