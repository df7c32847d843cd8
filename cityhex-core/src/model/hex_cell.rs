use crate::CoreError;
use geo::{Area, Centroid, Distance, Euclidean, Point, Polygon};
use serde::{Deserialize, Serialize};
use wkt::ToWkt;

/// one cell of the hexagonal discretization of a city. the polygon, centroid
/// and area are expressed in the metric CRS used for all distance math.
///
/// cells are immutable once generated. when the resolution or boundary of a
/// study area changes, the grid is rebuilt from scratch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HexCell {
    id: String,
    polygon: Polygon<f64>,
    centroid: Point<f64>,
    area_m2: f64,
}

impl HexCell {
    /// builds a cell from its identifier and metric polygon, deriving the
    /// centroid and area.
    ///
    /// # Arguments
    ///
    /// * `id`      - hex grid identifier for this cell
    /// * `polygon` - cell geometry in a metric (projected) CRS
    ///
    /// # Returns
    ///
    /// the cell, or an error if the polygon has no area or no centroid
    pub fn from_polygon(id: String, polygon: Polygon<f64>) -> Result<HexCell, CoreError> {
        let area_m2 = polygon.unsigned_area();
        if !area_m2.is_finite() {
            return Err(CoreError::NonFiniteCoordinate(polygon.to_wkt().to_string()));
        }
        if area_m2 <= 0.0 {
            return Err(CoreError::ZeroArea(format!(
                "cell {id}: {}",
                polygon.to_wkt()
            )));
        }
        let centroid = polygon
            .centroid()
            .ok_or_else(|| CoreError::MissingCentroid(format!("cell {id}")))?;
        Ok(HexCell {
            id,
            polygon,
            centroid,
            area_m2,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    pub fn centroid(&self) -> Point<f64> {
        self.centroid
    }

    pub fn area_m2(&self) -> f64 {
        self.area_m2
    }

    /// distance from the centroid to the farthest polygon vertex. any geometry
    /// further than this from the centroid cannot touch the cell.
    pub fn circumradius(&self) -> f64 {
        self.polygon
            .exterior()
            .coords()
            .map(|v| Euclidean.distance(self.centroid.0, *v))
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::HexCell;
    use geo::polygon;

    #[test]
    fn test_square_cell() {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
        ];
        let cell = HexCell::from_polygon(String::from("a"), square).expect("valid polygon");
        assert_eq!(cell.area_m2(), 100.0);
        assert_eq!(cell.centroid().x(), 5.0);
        assert_eq!(cell.centroid().y(), 5.0);
        let expected_radius = 50.0_f64.sqrt();
        assert!((cell.circumradius() - expected_radius).abs() < 1e-9);
    }

    #[test]
    fn test_zero_area_rejected() {
        let sliver = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 20.0, y: 0.0),
        ];
        let result = HexCell::from_polygon(String::from("b"), sliver);
        assert!(result.is_err(), "zero-area cell should be rejected");
    }
}
