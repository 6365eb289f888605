//! Selection-driven auto layout over a whole document.

use crate::complexity::selection_complexity;
use crate::components::{connected_components, select_components};
use crate::document::GraphDocument;
use crate::error::{HostError, Result};
use crate::extract::extract;
use crate::size_cache::SizeCache;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use weft::{LayoutSettings, NodeId, NodeKey, Point};

/// Integer pixel position, rounded half up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelPosition {
    pub x: i64,
    pub y: i64,
}

impl PixelPosition {
    pub fn from_point(p: Point) -> Self {
        Self {
            x: round_half_up(p.x),
            y: round_half_up(p.y),
        }
    }
}

fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoLayoutReport {
    pub positions: BTreeMap<NodeKey, PixelPosition>,
    pub nodes_laid_out: usize,
    pub components_laid_out: usize,
    /// Cyclomatic complexity of the components touched by the selection.
    pub complexity: usize,
}

/// Lays out every component of `doc` that contains a selected node.
///
/// Nothing is reported unless every component succeeds. Unselected components keep their
/// positions and do not appear in the report.
pub fn auto_layout(
    doc: &GraphDocument,
    selection: &[NodeKey],
    settings: &LayoutSettings,
    cache: &dyn SizeCache,
) -> Result<AutoLayoutReport> {
    let extracted = extract(doc, cache)?;
    if selection.is_empty() {
        return Err(HostError::NoSelection);
    }
    let mut selected: BTreeSet<NodeId> = BTreeSet::new();
    for &key in selection {
        let id = extracted
            .id(key)
            .ok_or(HostError::SelectionOutsideGraph { key })?;
        selected.insert(id);
    }

    let components = connected_components(&extracted);
    let chosen = select_components(&components, &selected);
    if chosen.is_empty() {
        return Err(HostError::NoComponents);
    }

    let mut report = AutoLayoutReport::default();
    for component in &chosen {
        let result = weft::layout_component(&extracted.graph, component, settings).map_err(|err| {
            tracing::warn!(
                graph_id = %doc.graph_id,
                nodes = component.len(),
                error = %err,
                "component layout failed"
            );
            HostError::from(err)
        })?;
        for (id, point) in result.positions {
            let Some(key) = extracted.key(id) else {
                continue;
            };
            report.positions.insert(key, PixelPosition::from_point(point));
        }
        report.nodes_laid_out += component.len();
        report.components_laid_out += 1;
    }
    report.complexity = selection_complexity(&extracted, &selected);

    tracing::debug!(
        graph_id = %doc.graph_id,
        nodes = report.nodes_laid_out,
        components = report.components_laid_out,
        complexity = report.complexity,
        "auto layout finished"
    );
    Ok(report)
}
