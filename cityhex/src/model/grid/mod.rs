mod containment;
mod grid_config;
mod hex_grid;
mod metric_projection;

pub use containment::Containment;
pub use grid_config::GridConfig;
pub use hex_grid::HexGrid;
pub use metric_projection::{Hemisphere, MetricProjection};
