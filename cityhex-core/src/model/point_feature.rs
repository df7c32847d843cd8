use geo::Point;
use serde::{Deserialize, Serialize};

/// a categorized point in the metric CRS, such as a transit stop or an amenity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointFeature {
    pub category: String,
    pub point: Point<f64>,
}

impl PointFeature {
    pub fn new(category: &str, x: f64, y: f64) -> PointFeature {
        PointFeature {
            category: category.to_string(),
            point: Point::new(x, y),
        }
    }

    pub fn xy(&self) -> [f64; 2] {
        [self.point.x(), self.point.y()]
    }
}
