//! Drives the layering and placement stages for one connected component.

use crate::error::Result;
use crate::model::{LayoutComponentResult, LayoutGraph, NodeId, NodeLayer, Rect};
use crate::position::{self, Grid};
use crate::settings::LayoutSettings;
use crate::sugiyama;
use crate::work::WorkGraph;

pub fn layout_component(
    graph: &LayoutGraph,
    ids: &[NodeId],
    settings: &LayoutSettings,
) -> Result<LayoutComponentResult> {
    let settings = settings.sanitized();
    let work = WorkGraph::build(graph, ids)?;

    if work.is_single_node() {
        return Ok(single_node_result(&work));
    }

    let layered = sugiyama::run(&work, &settings);
    let grid = Grid::build(&work, &layered);
    let placement = position::place(&grid, &settings);
    let positions = placement.anchored_positions(&grid);

    let mut result = LayoutComponentResult::default();
    let mut bounds: Option<Rect> = None;
    for ((w, node), p) in work.nodes.iter().enumerate().zip(positions) {
        let rect = Rect::from_origin_size(p, node.size);
        bounds = Some(bounds.map_or(rect, |b| b.union(rect)));
        result.positions.insert(node.graph_id, p);
        result.layers.insert(
            node.graph_id,
            NodeLayer {
                rank: grid.nodes[w].rank,
                order: grid.nodes[w].order,
            },
        );
    }
    result.bounds = bounds.unwrap_or_default();

    tracing::debug!(
        nodes = work.nodes.len(),
        edges = work.edges.len(),
        anchor = ?placement.anchor.map(|a| work.nodes[a].graph_id),
        width = result.bounds.width(),
        height = result.bounds.height(),
        "component laid out"
    );
    Ok(result)
}

fn single_node_result(work: &WorkGraph) -> LayoutComponentResult {
    let mut result = LayoutComponentResult::default();
    if let Some(node) = work.nodes.first() {
        result.positions.insert(node.graph_id, node.original_position);
        result
            .layers
            .insert(node.graph_id, NodeLayer { rank: 0, order: 0 });
        result.bounds = Rect::from_origin_size(node.original_position, node.size);
    }
    result
}
