use h3o::geom::ContainmentMode;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// rule deciding which hexagons cover the city boundary.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Containment {
    /// every cell touching the boundary, guaranteeing full coverage
    #[default]
    IntersectsBoundary,
    /// cells whose center lies inside the boundary
    ContainsCentroid,
    /// cells entirely inside the boundary
    ContainsBoundary,
    /// like intersects_boundary, also covering boundaries smaller than one cell
    Covers,
}

impl Display for Containment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Containment::IntersectsBoundary => write!(f, "intersects_boundary"),
            Containment::ContainsCentroid => write!(f, "contains_centroid"),
            Containment::ContainsBoundary => write!(f, "contains_boundary"),
            Containment::Covers => write!(f, "covers"),
        }
    }
}

impl From<Containment> for ContainmentMode {
    fn from(value: Containment) -> Self {
        match value {
            Containment::IntersectsBoundary => ContainmentMode::IntersectsBoundary,
            Containment::ContainsCentroid => ContainmentMode::ContainsCentroid,
            Containment::ContainsBoundary => ContainmentMode::ContainsBoundary,
            Containment::Covers => ContainmentMode::Covers,
        }
    }
}
