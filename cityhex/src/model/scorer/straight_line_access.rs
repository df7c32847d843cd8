use super::CellScorer;
use cityhex_core::{
    model::{HexCell, PolygonFeature},
    util::geo_utils,
};
use geo::{Distance, Euclidean};
use rstar::{
    primitives::{GeomWithData, Rectangle},
    RTree, AABB,
};

pub type IndexedPolygon = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// walking time over the straight-line distance from each centroid to the
/// nearest destination polygon (0 inside it), limited to a search radius.
pub struct StraightLineAccessScorer<'a> {
    name: &'a str,
    polygons: Vec<&'a PolygonFeature>,
    rtree: RTree<IndexedPolygon>,
    max_radius_m: f64,
    walking_speed_m_per_min: f64,
}

impl<'a> StraightLineAccessScorer<'a> {
    /// indexes the envelope of every destination polygon.
    ///
    /// # Arguments
    ///
    /// * `name`      - output column
    /// * `polygons`  - destinations, already filtered by category and area
    /// * `max_radius_m` - destinations further than this are ignored
    /// * `walking_speed_m_per_min` - converts distance to minutes
    pub fn new(
        name: &'a str,
        polygons: Vec<&'a PolygonFeature>,
        max_radius_m: f64,
        walking_speed_m_per_min: f64,
    ) -> StraightLineAccessScorer<'a> {
        let entries = polygons
            .iter()
            .enumerate()
            .filter_map(|(idx, p)| {
                let envelope = geo_utils::get_multipolygon_envelope(p.geometry())?;
                let rect = Rectangle::from_corners(envelope.lower(), envelope.upper());
                Some(GeomWithData::new(rect, idx))
            })
            .collect();
        StraightLineAccessScorer {
            name,
            polygons,
            rtree: RTree::bulk_load(entries),
            max_radius_m,
            walking_speed_m_per_min,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    /// distance to the nearest destination within the search radius.
    pub fn nearest_distance(&self, cell: &HexCell) -> Option<f64> {
        let c = cell.centroid();
        let r = self.max_radius_m;
        let query = AABB::from_corners([c.x() - r, c.y() - r], [c.x() + r, c.y() + r]);
        self.rtree
            .locate_in_envelope_intersecting(&query)
            .map(|obj| Euclidean.distance(&c, self.polygons[obj.data].geometry()))
            .filter(|d| *d <= r)
            .min_by(|a, b| a.total_cmp(b))
    }
}

impl CellScorer for StraightLineAccessScorer<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn score_cell(&self, cell: &HexCell) -> f64 {
        match self.nearest_distance(cell) {
            Some(d) => d / self.walking_speed_m_per_min,
            None => f64::NAN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, LineString, MultiPolygon};

    fn cell_at_origin() -> HexCell {
        let polygon = geo::Polygon::new(
            LineString::from(vec![(-5.0, -5.0), (5.0, -5.0), (5.0, 5.0), (-5.0, 5.0)]),
            vec![],
        );
        HexCell::from_polygon(String::from("cell"), polygon).expect("valid cell")
    }

    fn square(x0: f64, y0: f64, size: f64) -> PolygonFeature {
        let p = polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
        ];
        PolygonFeature::new("park", MultiPolygon::new(vec![p]), None)
    }

    #[test]
    fn test_nearest_polygon_minutes() {
        let near = square(160.0, -50.0, 100.0);
        let far = square(400.0, -50.0, 100.0);
        let scorer = StraightLineAccessScorer::new("park_walk_min", vec![&far, &near], 2000.0, 80.0);
        let minutes = scorer.score_cell(&cell_at_origin());
        assert!((minutes - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_inside_and_out_of_radius() {
        let around = square(-50.0, -50.0, 100.0);
        let scorer = StraightLineAccessScorer::new("a", vec![&around], 2000.0, 80.0);
        assert_eq!(scorer.score_cell(&cell_at_origin()), 0.0);

        let distant = square(3000.0, 0.0, 100.0);
        let scorer = StraightLineAccessScorer::new("a", vec![&distant], 2000.0, 80.0);
        assert!(scorer.score_cell(&cell_at_origin()).is_nan());

        let scorer = StraightLineAccessScorer::new("a", vec![], 2000.0, 80.0);
        assert!(scorer.is_empty());
        assert!(scorer.score_cell(&cell_at_origin()).is_nan());
    }
}
