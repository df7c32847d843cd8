mod hex_cell;
mod line_feature;
mod point_feature;
mod polygon_feature;
mod target_point;

pub use hex_cell::HexCell;
pub use line_feature::LineFeature;
pub use point_feature::PointFeature;
pub use polygon_feature::PolygonFeature;
pub use target_point::TargetPoint;
