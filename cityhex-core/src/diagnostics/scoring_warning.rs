use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// kinds of degenerate input geometry dropped during processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateKind {
    ZeroLengthEdge,
    ZeroAreaPolygon,
    EmptyFeature,
    NonFiniteCoordinate,
}

impl Display for DegenerateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DegenerateKind::ZeroLengthEdge => "zero-length edge",
            DegenerateKind::ZeroAreaPolygon => "zero-area polygon",
            DegenerateKind::EmptyFeature => "empty feature",
            DegenerateKind::NonFiniteCoordinate => "non-finite coordinate",
        };
        write!(f, "{s}")
    }
}

/// non-fatal conditions observed while scoring. a run that produces warnings
/// still yields one row per grid cell.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringWarning {
    #[error("input layer '{layer}' is empty, metric '{metric}' carries no signal")]
    EmptyLayer { layer: String, metric: String },
    #[error("no reachable target for metric '{metric}' from cell {cell}")]
    UnreachableTarget { metric: String, cell: String },
    #[error("dropped {kind}: {detail}")]
    DegenerateGeometry { kind: DegenerateKind, detail: String },
}
