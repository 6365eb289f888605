//! Coordinate assignment.
//!
//! Only real nodes are placed. Ranks become columns laid out left to right; `order` becomes the
//! vertical stacking inside a column. The resulting layout is translated so the anchor node keeps
//! its original position.

pub mod compact;
pub mod simple;

use crate::key::NodeKey;
use crate::model::{EdgeKind, Point, Size};
use crate::settings::{LayoutSettings, PlacementStrategy};
use crate::sugiyama::SugiyamaGraph;
use crate::work::WorkGraph;

#[derive(Debug, Clone)]
pub struct GridNode {
    pub key: NodeKey,
    pub rank: usize,
    /// Dense order among the real nodes of the rank.
    pub order: usize,
    pub size: Size,
    pub has_exec_pins: bool,
    pub is_variable_get: bool,
    pub original_position: Point,
}

#[derive(Debug, Clone)]
pub struct GridEdge {
    pub src: usize,
    pub dst: usize,
    pub kind: EdgeKind,
    pub stable_key: String,
}

/// Real nodes with their final rank and dense order, indexed like the working graph.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    pub nodes: Vec<GridNode>,
    /// Node indices per rank, sorted by order.
    pub layers: Vec<Vec<usize>>,
    /// Working-graph edges in their caller-facing direction.
    pub edges: Vec<GridEdge>,
}

impl Grid {
    pub fn build(work: &WorkGraph, layered: &SugiyamaGraph) -> Self {
        let mut nodes: Vec<GridNode> = work
            .nodes
            .iter()
            .map(|n| GridNode {
                key: n.key,
                rank: 0,
                order: 0,
                size: n.size,
                has_exec_pins: n.has_exec_pins,
                is_variable_get: n.is_variable_get,
                original_position: n.original_position,
            })
            .collect();

        let mut layers: Vec<Vec<usize>> = vec![Vec::new(); layered.max_rank() + 1];
        for layer in layered.rank_layers() {
            for v in layer {
                let node = &layered.nodes[v];
                let Some(w) = node.work_index() else {
                    continue;
                };
                nodes[w].rank = node.rank;
                nodes[w].order = layers[node.rank].len();
                layers[node.rank].push(w);
            }
        }

        let edges = work
            .edges
            .iter()
            .map(|e| GridEdge {
                src: e.src,
                dst: e.dst,
                kind: e.kind,
                stable_key: e.stable_key.clone(),
            })
            .collect();

        Self {
            nodes,
            layers,
            edges,
        }
    }

    pub fn max_rank(&self) -> usize {
        self.layers.len().saturating_sub(1)
    }
}

/// Column geometry per rank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankColumns {
    pub left: Vec<f64>,
    pub width: Vec<f64>,
    pub spacing: Vec<f64>,
}

impl RankColumns {
    pub fn build(grid: &Grid, settings: &LayoutSettings) -> Self {
        let ranks = grid.layers.len();
        let mut width = vec![0.0f64; ranks];
        let mut spacing = vec![0.0f64; ranks];
        for (rank, layer) in grid.layers.iter().enumerate() {
            if layer.is_empty() {
                spacing[rank] = settings.exec_spacing_x.max(settings.data_spacing_x);
                continue;
            }
            for &v in layer {
                let n = &grid.nodes[v];
                width[rank] = width[rank].max(n.size.width);
                spacing[rank] = spacing[rank].max(settings.spacing_x(n.has_exec_pins));
            }
        }

        let mut left = Vec::with_capacity(ranks);
        let mut x = 0.0;
        for rank in 0..ranks {
            left.push(x);
            x += width[rank] + spacing[rank];
        }
        Self {
            left,
            width,
            spacing,
        }
    }

    pub fn x(&self, node: &GridNode, settings: &LayoutSettings) -> f64 {
        let free = self.width[node.rank] - node.size.width;
        self.left[node.rank] + free * settings.rank_alignment.factor()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Placement {
    /// Computed top-left positions before anchoring, indexed like the grid.
    pub positions: Vec<Point>,
    pub anchor: Option<usize>,
}

impl Placement {
    /// Translation that brings the anchor back to its original position.
    pub fn anchor_offset(&self, grid: &Grid) -> Point {
        let Some(a) = self.anchor else {
            return Point::default();
        };
        let original = grid.nodes[a].original_position;
        let computed = self.positions[a];
        Point::new(original.x - computed.x, original.y - computed.y)
    }

    pub fn anchored_positions(&self, grid: &Grid) -> Vec<Point> {
        let offset = self.anchor_offset(grid);
        self.positions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                if Some(i) == self.anchor {
                    grid.nodes[i].original_position
                } else {
                    Point::new(p.x + offset.x, p.y + offset.y)
                }
            })
            .collect()
    }
}

/// Anchor: the exec node at rank 0 / order 0 if there is one, otherwise the best node by
/// (has exec pins, key).
pub fn select_anchor(grid: &Grid) -> Option<usize> {
    if let Some(&first) = grid.layers.first().and_then(|l| l.first()) {
        if grid.nodes[first].has_exec_pins {
            return Some(first);
        }
    }
    (0..grid.nodes.len()).min_by(|&a, &b| {
        let na = &grid.nodes[a];
        let nb = &grid.nodes[b];
        nb.has_exec_pins
            .cmp(&na.has_exec_pins)
            .then(na.key.cmp(&nb.key))
            .then(a.cmp(&b))
    })
}

pub fn place(grid: &Grid, settings: &LayoutSettings) -> Placement {
    let columns = RankColumns::build(grid, settings);
    let ys = match settings.placement {
        PlacementStrategy::Simple => simple::stack(grid, settings),
        PlacementStrategy::Compact => compact::relax(grid, settings),
    };
    let positions = grid
        .nodes
        .iter()
        .zip(ys)
        .map(|(n, y)| Point::new(columns.x(n, settings), y))
        .collect();
    Placement {
        positions,
        anchor: select_anchor(grid),
    }
}
