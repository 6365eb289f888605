//! Layout configuration.

use serde::{Deserialize, Serialize};

pub mod defaults {
    pub const EXEC_SPACING_X: f64 = 300.0;
    pub const DATA_SPACING_X: f64 = 300.0;
    pub const EXEC_SPACING_Y: f64 = 60.0;
    pub const DATA_SPACING_Y: f64 = 60.0;
    pub const VARIABLE_GET_MIN_LENGTH: usize = 1;
    pub const PREFER_HORIZONTAL_EXEC: bool = true;
}

/// Horizontal placement of a node inside its rank column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankAlignment {
    Left,
    #[default]
    Center,
    Right,
}

impl RankAlignment {
    pub(crate) fn factor(self) -> f64 {
        match self {
            RankAlignment::Left => 0.0,
            RankAlignment::Center => 0.5,
            RankAlignment::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementStrategy {
    /// Stack each rank top to bottom in order.
    Simple,
    /// Difference-constraint relaxation aligning exec chains and data producers.
    #[default]
    Compact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub exec_spacing_x: f64,
    pub data_spacing_x: f64,
    pub exec_spacing_y: f64,
    pub data_spacing_y: f64,
    /// Rank gap between a variable-get producer and its single consumer (0 keeps them in one rank).
    pub variable_get_min_length: usize,
    pub rank_alignment: RankAlignment,
    pub prefer_horizontal_exec: bool,
    pub placement: PlacementStrategy,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            exec_spacing_x: defaults::EXEC_SPACING_X,
            data_spacing_x: defaults::DATA_SPACING_X,
            exec_spacing_y: defaults::EXEC_SPACING_Y,
            data_spacing_y: defaults::DATA_SPACING_Y,
            variable_get_min_length: defaults::VARIABLE_GET_MIN_LENGTH,
            rank_alignment: RankAlignment::default(),
            prefer_horizontal_exec: defaults::PREFER_HORIZONTAL_EXEC,
            placement: PlacementStrategy::default(),
        }
    }
}

impl LayoutSettings {
    /// Copy with negative or non-finite spacing replaced by 0.
    pub fn sanitized(&self) -> Self {
        fn non_negative(v: f64) -> f64 {
            if v.is_finite() && v > 0.0 { v } else { 0.0 }
        }
        Self {
            exec_spacing_x: non_negative(self.exec_spacing_x),
            data_spacing_x: non_negative(self.data_spacing_x),
            exec_spacing_y: non_negative(self.exec_spacing_y),
            data_spacing_y: non_negative(self.data_spacing_y),
            ..self.clone()
        }
    }

    pub fn spacing_x(&self, exec: bool) -> f64 {
        if exec { self.exec_spacing_x } else { self.data_spacing_x }
    }

    pub fn spacing_y(&self, exec: bool) -> f64 {
        if exec { self.exec_spacing_y } else { self.data_spacing_y }
    }
}
