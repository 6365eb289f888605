#![forbid(unsafe_code)]

//! Deterministic layered layout for graphs with control-flow ("exec") and data edges.
//!
//! `weft` is a Sugiyama-style engine: cycles are broken, nodes are assigned ranks (columns),
//! long edges are split with dummy nodes, ranks are reordered with barycenter sweeps, and the
//! resulting rank/order grid is converted into pixel coordinates. The output is translated so that
//! one anchor node keeps its previous position.
//!
//! The engine is pure: it never mutates its input and keeps no state between calls. Every ordering
//! decision is keyed on [`NodeKey`] / [`PinKey`], never on container or memory order.

pub mod error;
pub mod key;
pub mod model;
pub mod pipeline;
pub mod position;
pub mod settings;
pub mod sugiyama;
pub mod work;

pub use error::{Error, Result};
pub use key::{NodeKey, PinDirection, PinKey};
pub use model::{
    EdgeKind, LayoutComponentResult, LayoutEdge, LayoutGraph, LayoutNode, NodeId, NodeLayer, Point,
    Rect, Size,
};
pub use settings::{LayoutSettings, PlacementStrategy, RankAlignment};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lays out one connected component of `graph`.
///
/// `ids` names the component's nodes; duplicates are ignored and order does not matter.
pub fn layout_component(
    graph: &LayoutGraph,
    ids: &[NodeId],
    settings: &LayoutSettings,
) -> Result<LayoutComponentResult> {
    pipeline::layout_component(graph, ids, settings)
}
