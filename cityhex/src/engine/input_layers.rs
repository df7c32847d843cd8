use cityhex_core::model::{LineFeature, PointFeature, PolygonFeature};
use std::collections::BTreeMap;

/// named input layers in the metric CRS. a layer that is not provided is
/// scored the same as an empty layer.
#[derive(Debug, Clone, Default)]
pub struct InputLayers {
    pub lines: BTreeMap<String, Vec<LineFeature>>,
    pub points: BTreeMap<String, Vec<PointFeature>>,
    pub polygons: BTreeMap<String, Vec<PolygonFeature>>,
}

impl InputLayers {
    pub fn with_lines(mut self, name: &str, features: Vec<LineFeature>) -> InputLayers {
        self.lines.insert(name.to_string(), features);
        self
    }

    pub fn with_points(mut self, name: &str, features: Vec<PointFeature>) -> InputLayers {
        self.points.insert(name.to_string(), features);
        self
    }

    pub fn with_polygons(mut self, name: &str, features: Vec<PolygonFeature>) -> InputLayers {
        self.polygons.insert(name.to_string(), features);
        self
    }

    pub fn lines(&self, name: &str) -> &[LineFeature] {
        self.lines.get(name).map(|v| v.as_slice()).unwrap_or_default()
    }

    pub fn points(&self, name: &str) -> &[PointFeature] {
        self.points.get(name).map(|v| v.as_slice()).unwrap_or_default()
    }

    pub fn polygons(&self, name: &str) -> &[PolygonFeature] {
        self.polygons.get(name).map(|v| v.as_slice()).unwrap_or_default()
    }
}
