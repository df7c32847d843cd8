mod cell_scorer;
mod coverage;
mod diversity;
mod gravity;
mod network_access;
mod point_index;
mod straight_line_access;

pub use cell_scorer::{map_grid, score_grid, CellScorer};
pub use coverage::CoverageScorer;
pub use diversity::{shannon_entropy, DiversityScorer};
pub use gravity::GravityScorer;
pub use network_access::{AccessRoute, NetworkAccessParams, NetworkAccessScorer};
pub use point_index::PointIndex;
pub use straight_line_access::StraightLineAccessScorer;
