//! Stable identities for nodes and pins.
//!
//! All enumeration and tie-breaking in the engine goes through these orders.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Namespace for name-based synthetic keys (dummy and exec-tail nodes).
const SYNTHETIC_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a9e_53d4_4b7a_9c0e_31f8_a5d2_7e44);

/// Opaque 128-bit node identity, ordered lexicographically over its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(pub Uuid);

impl NodeKey {
    pub const fn from_u128(v: u128) -> Self {
        Self(Uuid::from_u128(v))
    }

    /// Name-based key, identical for identical seeds on every platform.
    pub fn synthetic(seed: &str) -> Self {
        Self(Uuid::new_v5(&SYNTHETIC_NAMESPACE, seed.as_bytes()))
    }

    pub fn as_u128(&self) -> u128 {
        self.0.as_u128()
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for NodeKey {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Pin direction; `Input` sorts before `Output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinDirection {
    Input,
    Output,
}

impl PinDirection {
    fn tag(self) -> &'static str {
        match self {
            PinDirection::Input => "I",
            PinDirection::Output => "O",
        }
    }
}

/// Pin identity: owner, direction, name (byte-wise), then index within the owner.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PinKey {
    pub node: NodeKey,
    pub direction: PinDirection,
    pub name: String,
    pub index: usize,
}

impl PinKey {
    pub fn new(node: NodeKey, direction: PinDirection, name: impl Into<String>, index: usize) -> Self {
        Self {
            node,
            direction,
            name: name.into(),
            index,
        }
    }

    pub fn input(node: NodeKey, name: impl Into<String>, index: usize) -> Self {
        Self::new(node, PinDirection::Input, name, index)
    }

    pub fn output(node: NodeKey, name: impl Into<String>, index: usize) -> Self {
        Self::new(node, PinDirection::Output, name, index)
    }
}

impl fmt::Display for PinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.node,
            self.direction.tag(),
            self.name,
            self.index
        )
    }
}

/// Human-legible edge key built from both endpoints; only used for ordering and logs.
pub fn edge_stable_key(src: &PinKey, dst: &PinKey) -> String {
    format!("{src}->{dst}")
}
