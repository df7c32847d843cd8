use super::PointFeature;
use geo::Point;
use serde::{Deserialize, Serialize};

/// a plausible entrance or access point for a destination, used as a
/// routing endpoint by the network access scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetPoint {
    pub category: String,
    pub point: Point<f64>,
}

impl TargetPoint {
    pub fn new(category: &str, point: Point<f64>) -> TargetPoint {
        TargetPoint {
            category: category.to_string(),
            point,
        }
    }
}

impl From<&PointFeature> for TargetPoint {
    fn from(value: &PointFeature) -> Self {
        TargetPoint {
            category: value.category.clone(),
            point: value.point,
        }
    }
}
