use cityhex_core::model::PointFeature;
use geo::{Distance, Euclidean, Point};
use rstar::{primitives::GeomWithData, RTree};

/// squared query radii are inflated by this factor before the exact
/// distance filter is applied so that features at exactly the radius are kept.
const RADIUS_TOLERANCE: f64 = 1.0 + 1e-9;

pub type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// R-tree over a point layer storing each feature's position in the layer.
pub struct PointIndex {
    rtree: RTree<IndexedPoint>,
}

impl PointIndex {
    pub fn new(points: &[PointFeature]) -> PointIndex {
        let entries = points
            .iter()
            .enumerate()
            .map(|(idx, p)| GeomWithData::new(p.xy(), idx))
            .collect();
        PointIndex {
            rtree: RTree::bulk_load(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    /// features within `radius` of `center`, inclusive.
    ///
    /// # Returns
    ///
    /// pairs of (layer index, distance) sorted by layer index
    pub fn within(&self, center: Point<f64>, radius: f64) -> Vec<(usize, f64)> {
        let query = [center.x(), center.y()];
        let r2 = radius * radius * RADIUS_TOLERANCE;
        let mut found = self
            .rtree
            .locate_within_distance(query, r2)
            .filter_map(|obj| {
                let [x, y] = *obj.geom();
                let d = Euclidean.distance(center, Point::new(x, y));
                if d <= radius {
                    Some((obj.data, d))
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();
        found.sort_by_key(|(idx, _)| *idx);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_is_inclusive() {
        let points = vec![
            PointFeature::new("a", 100.0, 0.0),
            PointFeature::new("b", 0.0, 100.0000001),
            PointFeature::new("c", 30.0, 40.0),
        ];
        let index = PointIndex::new(&points);
        let found = index.within(Point::new(0.0, 0.0), 100.0);
        let ids = found.iter().map(|(i, _)| *i).collect::<Vec<_>>();
        assert_eq!(ids, vec![0, 2]);
        assert!((found[1].1 - 50.0).abs() < 1e-9);
    }
}
