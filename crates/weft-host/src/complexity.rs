//! Cyclomatic complexity of exec flow.
//!
//! Every exec output pin beyond the first that actually leads somewhere adds a branch.

use crate::components::{connected_components, select_components};
use crate::extract::ExtractedGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use weft::NodeId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityReport {
    /// Whole graph.
    pub graph: usize,
    /// Sum over the components touched by the selection.
    pub selection: usize,
}

/// `1 + Σ max(0, linked exec outputs − 1)` over `ids`; 0 for an empty set.
pub fn cyclomatic_complexity(extracted: &ExtractedGraph, ids: &[NodeId]) -> usize {
    if ids.is_empty() {
        return 0;
    }
    1 + ids
        .iter()
        .filter_map(|&id| extracted.linked_exec_outputs.get(id))
        .map(|&linked| linked.saturating_sub(1))
        .sum::<usize>()
}

pub fn selection_complexity(extracted: &ExtractedGraph, selected: &BTreeSet<NodeId>) -> usize {
    let components = connected_components(extracted);
    select_components(&components, selected)
        .iter()
        .map(|c| cyclomatic_complexity(extracted, c))
        .sum()
}

impl ComplexityReport {
    pub fn compute(extracted: &ExtractedGraph, selected: &BTreeSet<NodeId>) -> Self {
        let all: Vec<NodeId> = (0..extracted.keys.len()).collect();
        Self {
            graph: cyclomatic_complexity(extracted, &all),
            selection: selection_complexity(extracted, selected),
        }
    }
}
