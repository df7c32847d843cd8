use crate::CoreError;
use geo::{Area, Geometry, MultiPolygon};
use serde::{Deserialize, Serialize};

/// a categorized area in the metric CRS (a park, a forest, a district). the
/// optional value carries a quantity to apportion, such as population.
///
/// the geometry is fixed at construction so that its area is computed once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonFeature {
    pub category: String,
    pub value: Option<f64>,
    geometry: MultiPolygon<f64>,
    area_m2: f64,
}

impl PolygonFeature {
    pub fn new(category: &str, geometry: MultiPolygon<f64>, value: Option<f64>) -> PolygonFeature {
        let area_m2 = geometry.unsigned_area();
        PolygonFeature {
            category: category.to_string(),
            value,
            geometry,
            area_m2,
        }
    }

    /// builds a polygon feature from a Polygon or MultiPolygon geometry.
    /// GeometryCollections contribute their polygonal members.
    pub fn from_geometry(
        category: &str,
        geometry: Geometry<f64>,
        value: Option<f64>,
    ) -> Result<PolygonFeature, CoreError> {
        let polygons = crate::util::geo_utils::collect_polygons(&geometry)?;
        if polygons.0.is_empty() {
            return Err(CoreError::EmptyGeometry(format!(
                "polygon feature with category '{category}'"
            )));
        }
        Ok(PolygonFeature::new(category, polygons, value))
    }

    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    pub fn area_m2(&self) -> f64 {
        self.area_m2
    }
}

#[cfg(test)]
mod tests {
    use super::PolygonFeature;
    use geo::{polygon, MultiPolygon};

    #[test]
    fn test_area_computed_at_construction() {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 20.0, y: 0.0),
            (x: 20.0, y: 20.0),
            (x: 0.0, y: 20.0),
        ];
        let feature = PolygonFeature::new("park", MultiPolygon::new(vec![square]), None);
        assert!((feature.area_m2() - 400.0).abs() < 1e-9);
        assert_eq!(feature.geometry().0.len(), 1);
    }
}
