use super::{CellScorer, PointIndex};
use crate::config::{CoverageConfig, CoverageMethod};
use cityhex_core::{
    model::{HexCell, PointFeature},
    util::geo_utils,
};
use geo::{Area, BooleanOps, MultiPolygon};
use std::collections::{BTreeSet, HashSet};

/// vertices of the polygon approximating each coverage circle.
const CIRCLE_VERTICES: usize = 64;

/// radius coverage of a point layer around each cell.
pub struct CoverageScorer<'a> {
    config: &'a CoverageConfig,
    points: &'a [PointFeature],
    index: PointIndex,
    tracked: HashSet<String>,
}

impl<'a> CoverageScorer<'a> {
    pub fn new(config: &'a CoverageConfig, points: &'a [PointFeature]) -> CoverageScorer<'a> {
        let tracked = match &config.method {
            CoverageMethod::CategoryCount { categories } => categories.iter().cloned().collect(),
            CoverageMethod::UnionArea => HashSet::new(),
        };
        CoverageScorer {
            config,
            points,
            index: PointIndex::new(points),
            tracked,
        }
    }

    /// number of distinct tracked categories within the radius of the centroid.
    fn category_count(&self, cell: &HexCell) -> f64 {
        let found: BTreeSet<&str> = self
            .index
            .within(cell.centroid(), self.config.radius_m)
            .into_iter()
            .map(|(idx, _)| self.points[idx].category.as_str())
            .filter(|c| self.tracked.contains(*c))
            .collect();
        found.len() as f64
    }

    /// share of the cell area within the radius of any feature, in [0, 1].
    fn union_area(&self, cell: &HexCell) -> f64 {
        let radius = self.config.radius_m;
        let circumradius = cell.circumradius();
        let nearby = self.index.within(cell.centroid(), radius + circumradius);
        if nearby.is_empty() {
            return 0.0;
        }
        // the inscribed radius of the circle polygon bounds what it fully covers
        let inscribed = radius * (std::f64::consts::PI / CIRCLE_VERTICES as f64).cos();
        if nearby.iter().any(|(_, d)| d + circumradius <= inscribed) {
            return 1.0;
        }
        let cell_area = cell.area_m2();
        if cell_area <= 0.0 {
            return f64::NAN;
        }
        let cell_polygon = MultiPolygon::new(vec![cell.polygon().clone()]);
        let union = nearby
            .iter()
            .map(|(idx, _)| {
                let circle = geo_utils::circle_polygon(self.points[*idx].point.0, radius, CIRCLE_VERTICES);
                cell_polygon.intersection(&MultiPolygon::new(vec![circle]))
            })
            .fold(MultiPolygon::new(vec![]), |acc, part| acc.union(&part));
        (union.unsigned_area() / cell_area).clamp(0.0, 1.0)
    }
}

impl CellScorer for CoverageScorer<'_> {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn score_cell(&self, cell: &HexCell) -> f64 {
        match self.config.method {
            CoverageMethod::CategoryCount { .. } => self.category_count(cell),
            CoverageMethod::UnionArea => self.union_area(cell),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_cell(size: f64) -> HexCell {
        let h = size / 2.0;
        let polygon = geo::Polygon::new(
            geo::LineString::from(vec![(-h, -h), (h, -h), (h, h), (-h, h)]),
            vec![],
        );
        HexCell::from_polygon(String::from("cell"), polygon).expect("valid cell")
    }

    fn config(radius_m: f64, method: CoverageMethod) -> CoverageConfig {
        CoverageConfig {
            name: String::from("essentials"),
            layer: String::from("services"),
            radius_m,
            method,
            normalization: None,
        }
    }

    #[test]
    fn test_category_count() {
        let method = CoverageMethod::CategoryCount {
            categories: vec![
                String::from("grocery"),
                String::from("pharmacy"),
                String::from("school"),
            ],
        };
        let config = config(800.0, method);
        let points = vec![
            PointFeature::new("grocery", 100.0, 0.0),
            PointFeature::new("grocery", 200.0, 0.0),
            PointFeature::new("pharmacy", 0.0, 800.0),
            PointFeature::new("cinema", 0.0, 10.0),
            PointFeature::new("school", 900.0, 0.0),
        ];
        let scorer = CoverageScorer::new(&config, &points);
        assert_eq!(scorer.score_cell(&square_cell(100.0)), 2.0);
    }

    #[test]
    fn test_union_area_bounds() {
        let large = config(300.0, CoverageMethod::UnionArea);
        let cell = square_cell(100.0);

        let inside = vec![PointFeature::new("x", 0.0, 0.0)];
        let scorer = CoverageScorer::new(&large, &inside);
        assert_eq!(scorer.score_cell(&cell), 1.0);

        let far = vec![PointFeature::new("x", 5000.0, 0.0)];
        let scorer = CoverageScorer::new(&large, &far);
        assert_eq!(scorer.score_cell(&cell), 0.0);

        // a circle centered on the right edge covers a half disk of the cell
        let small = config(50.0, CoverageMethod::UnionArea);
        let edge = vec![PointFeature::new("x", 50.0, 0.0)];
        let scorer = CoverageScorer::new(&small, &edge);
        let share = scorer.score_cell(&cell);
        let half_disk = std::f64::consts::PI * 2500.0 / 2.0 / 10000.0;
        assert!((share - half_disk).abs() < 0.01, "unexpected share {share}");
    }

    #[test]
    fn test_overlapping_circles_not_double_counted() {
        let overlap = config(60.0, CoverageMethod::UnionArea);
        let cell = square_cell(100.0);
        let one = vec![PointFeature::new("x", 60.0, 0.0)];
        let two = vec![
            PointFeature::new("x", 60.0, 0.0),
            PointFeature::new("y", 60.0, 0.0),
        ];
        let a = CoverageScorer::new(&overlap, &one).score_cell(&cell);
        let b = CoverageScorer::new(&overlap, &two).score_cell(&cell);
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
        assert!(b <= 1.0);
    }
}
