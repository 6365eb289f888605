//! Compact placement by difference-constraint relaxation.
//!
//! Every constraint reads `y[target] >= y[source] + delta`. Three families are generated:
//! stacking inside a rank, single-consumer variable-get producers snapping to that consumer, and
//! nodes with exactly one incoming exec edge lining up with its source. Relaxation starts from
//! all zeros and is capped at `max(3, n)` rounds; hitting the cap is logged, never an error.

use super::Grid;
use crate::model::EdgeKind;
use crate::settings::LayoutSettings;
use std::collections::BTreeSet;

const EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub source: usize,
    pub target: usize,
    pub delta: f64,
}

pub fn constraints(grid: &Grid, settings: &LayoutSettings) -> Vec<Constraint> {
    let mut out: Vec<Constraint> = Vec::new();

    for layer in &grid.layers {
        for pair in layer.windows(2) {
            let (above, below) = (pair[0], pair[1]);
            out.push(Constraint {
                source: above,
                target: below,
                delta: grid.nodes[above].size.height
                    + settings.spacing_y(grid.nodes[below].has_exec_pins),
            });
        }
    }

    for (p, node) in grid.nodes.iter().enumerate() {
        if !node.is_variable_get {
            continue;
        }
        let consumers: BTreeSet<usize> = grid
            .edges
            .iter()
            .filter(|e| e.src == p && e.dst != p)
            .map(|e| e.dst)
            .collect();
        if consumers.len() != 1 {
            continue;
        }
        if let Some(&consumer) = consumers.first() {
            out.push(Constraint {
                source: consumer,
                target: p,
                delta: 0.0,
            });
        }
    }

    if settings.prefer_horizontal_exec {
        let mut exec_incoming = vec![0usize; grid.nodes.len()];
        for e in &grid.edges {
            if e.kind == EdgeKind::Exec && e.src != e.dst {
                exec_incoming[e.dst] += 1;
            }
        }
        for (v, node) in grid.nodes.iter().enumerate() {
            // Merge points are left to the rank stacking.
            if exec_incoming[v] != 1 {
                continue;
            }
            let chosen = grid
                .edges
                .iter()
                .filter(|e| {
                    e.kind == EdgeKind::Exec && e.dst == v && grid.nodes[e.src].rank < node.rank
                })
                .min_by(|a, b| {
                    let na = &grid.nodes[a.src];
                    let nb = &grid.nodes[b.src];
                    nb.rank
                        .cmp(&na.rank)
                        .then(na.order.cmp(&nb.order))
                        .then_with(|| a.stable_key.cmp(&b.stable_key))
                });
            if let Some(e) = chosen {
                out.push(Constraint {
                    source: e.src,
                    target: v,
                    delta: 0.0,
                });
            }
        }
    }

    out
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relaxation {
    pub ys: Vec<f64>,
    pub rounds: usize,
    pub converged: bool,
}

/// Relaxes all constraints from zero. A run that hits the cap gets one stacking pass per rank so
/// that no column is left with overlapping nodes.
pub fn solve(grid: &Grid, settings: &LayoutSettings) -> Relaxation {
    let n = grid.nodes.len();
    let mut ys = vec![0.0f64; n];
    let constraints = constraints(grid, settings);
    let cap = n.max(3);

    let mut converged = false;
    let mut rounds = 0usize;
    while rounds < cap {
        rounds += 1;
        let mut changed = false;
        for c in &constraints {
            let wanted = ys[c.source] + c.delta;
            if ys[c.target] + EPSILON < wanted {
                ys[c.target] = wanted;
                changed = true;
            }
        }
        if !changed {
            converged = true;
            break;
        }
    }

    if converged {
        tracing::debug!(nodes = n, constraints = constraints.len(), rounds, "compact placement converged");
    } else {
        tracing::warn!(
            nodes = n,
            constraints = constraints.len(),
            rounds,
            "compact placement hit its iteration cap; using best-effort positions"
        );
        restack(grid, settings, &mut ys);
    }
    Relaxation {
        ys,
        rounds,
        converged,
    }
}

/// Pushes every node down to clear the node above it in its rank.
fn restack(grid: &Grid, settings: &LayoutSettings, ys: &mut [f64]) {
    for layer in &grid.layers {
        for pair in layer.windows(2) {
            let (above, below) = (pair[0], pair[1]);
            let floor = ys[above]
                + grid.nodes[above].size.height
                + settings.spacing_y(grid.nodes[below].has_exec_pins);
            if ys[below] < floor {
                ys[below] = floor;
            }
        }
    }
}

/// Y per node after relaxing all constraints from zero.
pub fn relax(grid: &Grid, settings: &LayoutSettings) -> Vec<f64> {
    solve(grid, settings).ys
}
