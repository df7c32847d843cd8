use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// counts collected while building a [`super::WalkGraph`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkGraphSummary {
    pub features_read: usize,
    pub features_accepted: usize,
    pub zero_length_segments: usize,
    /// segments with a NaN or infinite endpoint
    pub non_finite_segments: usize,
    pub empty_features: usize,
    pub components_found: usize,
    pub components_kept: usize,
    pub n_nodes: usize,
    pub n_edges: usize,
}

impl Display for WalkGraphSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "walk graph with {} nodes and {} edges from {}/{} passable features ({} zero-length and {} non-finite segments dropped, {}/{} components kept)",
            self.n_nodes,
            self.n_edges,
            self.features_accepted,
            self.features_read,
            self.zero_length_segments,
            self.non_finite_segments,
            self.components_kept,
            self.components_found
        )
    }
}
