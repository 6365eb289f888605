//! Plain top-to-bottom stacking per rank.

use super::Grid;
use crate::settings::LayoutSettings;

/// Y per node: each node sits below the previous one in its rank, separated by the spacing of
/// its own kind.
pub fn stack(grid: &Grid, settings: &LayoutSettings) -> Vec<f64> {
    let mut ys = vec![0.0f64; grid.nodes.len()];
    for layer in &grid.layers {
        let mut bottom: Option<f64> = None;
        for &v in layer {
            let n = &grid.nodes[v];
            let y = match bottom {
                None => 0.0,
                Some(b) => b + settings.spacing_y(n.has_exec_pins),
            };
            ys[v] = y;
            bottom = Some(y + n.size.height);
        }
    }
    ys
}
