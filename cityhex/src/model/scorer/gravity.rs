use super::{CellScorer, PointIndex};
use crate::config::GravityConfig;
use cityhex_core::model::{HexCell, PointFeature};

/// distance-decay supply score. each feature within the search radius of the
/// cell centroid contributes `weight(category) / max(d, floor)²`.
pub struct GravityScorer<'a> {
    config: &'a GravityConfig,
    points: &'a [PointFeature],
    index: PointIndex,
}

impl<'a> GravityScorer<'a> {
    pub fn new(config: &'a GravityConfig, points: &'a [PointFeature]) -> GravityScorer<'a> {
        GravityScorer {
            config,
            points,
            index: PointIndex::new(points),
        }
    }
}

impl CellScorer for GravityScorer<'_> {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn score_cell(&self, cell: &HexCell) -> f64 {
        let floor = self.config.distance_floor_m;
        self.index
            .within(cell.centroid(), self.config.max_radius_m)
            .into_iter()
            .map(|(idx, d)| {
                let w = self.config.weight(&self.points[idx].category);
                let d = d.max(floor);
                w / (d * d)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> GravityConfig {
        GravityConfig {
            name: String::from("pt_gravity"),
            layer: String::from("transit"),
            weights: HashMap::from([
                (String::from("S-Bahn"), 3.0),
                (String::from("Bus"), 1.0),
            ]),
            default_weight: 0.5,
            distance_floor_m: 50.0,
            max_radius_m: 1500.0,
            normalization: None,
        }
    }

    fn cell_at_origin() -> HexCell {
        let polygon = geo::Polygon::new(
            geo::LineString::from(vec![(-10.0, -10.0), (10.0, -10.0), (10.0, 10.0), (-10.0, 10.0)]),
            vec![],
        );
        HexCell::from_polygon(String::from("cell"), polygon).expect("valid cell")
    }

    #[test]
    fn test_weights_and_floor() {
        let config = config();
        let points = vec![
            // inside the floor, counts as 50m
            PointFeature::new("S-Bahn", 10.0, 0.0),
            PointFeature::new("Bus", 100.0, 0.0),
            PointFeature::new("Ferry", 0.0, 100.0),
            // outside the search radius
            PointFeature::new("S-Bahn", 2000.0, 0.0),
        ];
        let scorer = GravityScorer::new(&config, &points);
        let score = scorer.score_cell(&cell_at_origin());
        let expected = 3.0 / 2500.0 + 1.0 / 10000.0 + 0.5 / 10000.0;
        assert!((score - expected).abs() < 1e-12, "{score} != {expected}");
    }

    #[test]
    fn test_no_features_scores_zero() {
        let config = config();
        let scorer = GravityScorer::new(&config, &[]);
        assert_eq!(scorer.score_cell(&cell_at_origin()), 0.0);
    }

    #[test]
    fn test_non_increasing_with_distance() {
        let config = config();
        let mut previous = f64::INFINITY;
        for d in [0.0, 25.0, 50.0, 100.0, 400.0, 1499.0, 1500.0, 1501.0] {
            let points = vec![PointFeature::new("Bus", d, 0.0)];
            let scorer = GravityScorer::new(&config, &points);
            let score = scorer.score_cell(&cell_at_origin());
            assert!(score >= 0.0);
            assert!(score <= previous, "score increased at distance {d}");
            previous = score;
        }
        assert_eq!(previous, 0.0);
    }
}
