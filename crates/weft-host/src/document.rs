//! Serializable graph document exchanged with hosts.

use crate::error::{HostError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use weft::{NodeKey, PinDirection, Point, Size};

/// Schema identifier accepted by [`GraphDocument::validate`].
pub const SCHEMA: &str = "weft/exec-data@1";

fn default_schema() -> String {
    SCHEMA.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Identifies the graph for the size cache.
    #[serde(default)]
    pub graph_id: String,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub nodes: Vec<DocNode>,
    #[serde(default)]
    pub links: Vec<DocLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocNode {
    pub key: NodeKey,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: Point,
    /// Measured size; missing or empty sizes fall back to the cache.
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub variable_get: bool,
    #[serde(default)]
    pub pins: Vec<DocPin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocPin {
    pub name: String,
    pub direction: PinDirection,
    #[serde(default)]
    pub exec: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRef {
    pub node: NodeKey,
    pub pin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocLink {
    pub from: PinRef,
    pub to: PinRef,
}

impl GraphDocument {
    pub fn new(graph_id: impl Into<String>) -> Self {
        Self {
            schema: default_schema(),
            graph_id: graph_id.into(),
            read_only: false,
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Checks schema, writability, non-emptiness and key uniqueness, in that order.
    pub fn validate(&self) -> Result<()> {
        if self.schema != SCHEMA {
            return Err(HostError::SchemaMismatch {
                expected: SCHEMA.to_string(),
                found: self.schema.clone(),
            });
        }
        if self.read_only {
            return Err(HostError::ReadOnly);
        }
        if self.nodes.is_empty() {
            return Err(HostError::NoNodes);
        }
        let mut seen: BTreeSet<NodeKey> = BTreeSet::new();
        for n in &self.nodes {
            if !seen.insert(n.key) {
                return Err(HostError::DuplicateNodeKey { key: n.key });
            }
        }
        Ok(())
    }

    pub fn node(&self, key: NodeKey) -> Option<&DocNode> {
        self.nodes.iter().find(|n| n.key == key)
    }
}

impl DocNode {
    pub fn new(key: NodeKey, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
            position: Point::default(),
            size: None,
            variable_get: false,
            pins: Vec::new(),
        }
    }

    pub fn with_pin(mut self, name: impl Into<String>, direction: PinDirection, exec: bool) -> Self {
        self.pins.push(DocPin {
            name: name.into(),
            direction,
            exec,
        });
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn variable_get(mut self) -> Self {
        self.variable_get = true;
        self
    }

    /// Index of the named pin among the pins of the same direction.
    pub fn pin_index(&self, name: &str, direction: PinDirection) -> Option<(usize, &DocPin)> {
        self.pins
            .iter()
            .filter(|p| p.direction == direction)
            .enumerate()
            .find(|(_, p)| p.name == name)
    }
}

impl DocLink {
    pub fn new(from: NodeKey, from_pin: impl Into<String>, to: NodeKey, to_pin: impl Into<String>) -> Self {
        Self {
            from: PinRef {
                node: from,
                pin: from_pin.into(),
            },
            to: PinRef {
                node: to,
                pin: to_pin.into(),
            },
        }
    }
}
