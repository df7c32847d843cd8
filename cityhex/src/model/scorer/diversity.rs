use super::{CellScorer, PointIndex};
use crate::config::DiversityConfig;
use cityhex_core::model::{HexCell, PointFeature};
use std::collections::{BTreeMap, HashSet};

/// Shannon entropy `-Σ p ln p` of the categories found near each centroid.
pub struct DiversityScorer<'a> {
    config: &'a DiversityConfig,
    points: &'a [PointFeature],
    index: PointIndex,
    tracked: Option<HashSet<String>>,
}

impl<'a> DiversityScorer<'a> {
    pub fn new(config: &'a DiversityConfig, points: &'a [PointFeature]) -> DiversityScorer<'a> {
        let tracked = config
            .categories
            .as_ref()
            .map(|c| c.iter().cloned().collect());
        DiversityScorer {
            config,
            points,
            index: PointIndex::new(points),
            tracked,
        }
    }
}

impl CellScorer for DiversityScorer<'_> {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn score_cell(&self, cell: &HexCell) -> f64 {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for (idx, _) in self.index.within(cell.centroid(), self.config.radius_m) {
            let category = self.points[idx].category.as_str();
            let tracked = match &self.tracked {
                Some(t) => t.contains(category),
                None => true,
            };
            if tracked {
                *counts.entry(category).or_default() += 1;
            }
        }
        shannon_entropy(counts.values().copied())
    }
}

/// entropy of a frequency distribution; 0 when fewer than two classes are present.
pub fn shannon_entropy(counts: impl Iterator<Item = usize>) -> f64 {
    let counts = counts.filter(|c| *c > 0).collect::<Vec<_>>();
    if counts.len() < 2 {
        return 0.0;
    }
    let total = counts.iter().sum::<usize>() as f64;
    counts
        .iter()
        .map(|c| {
            let p = *c as f64 / total;
            -p * p.ln()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_at_origin() -> HexCell {
        let polygon = geo::Polygon::new(
            geo::LineString::from(vec![(-10.0, -10.0), (10.0, -10.0), (10.0, 10.0), (-10.0, 10.0)]),
            vec![],
        );
        HexCell::from_polygon(String::from("cell"), polygon).expect("valid cell")
    }

    fn config(categories: Option<Vec<String>>) -> DiversityConfig {
        DiversityConfig {
            name: String::from("diversity"),
            layer: String::from("amenities"),
            radius_m: 300.0,
            categories,
        }
    }

    #[test]
    fn test_entropy_extremes() {
        assert_eq!(shannon_entropy(vec![].into_iter()), 0.0);
        assert_eq!(shannon_entropy(vec![7].into_iter()), 0.0);
        let equal = shannon_entropy(vec![2, 2, 2, 2].into_iter());
        assert!((equal - 4.0_f64.ln()).abs() < 1e-12);
        let skewed = shannon_entropy(vec![5, 1, 1, 1].into_iter());
        assert!(skewed > 0.0 && skewed < equal);
    }

    #[test]
    fn test_diversity_within_radius() {
        let points = vec![
            PointFeature::new("cafe", 10.0, 0.0),
            PointFeature::new("bakery", 0.0, 10.0),
            PointFeature::new("park", 1000.0, 0.0),
        ];
        let config = config(None);
        let scorer = DiversityScorer::new(&config, &points);
        let d = scorer.score_cell(&cell_at_origin());
        assert!((d - 2.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_untracked_categories_ignored() {
        let points = vec![
            PointFeature::new("cafe", 10.0, 0.0),
            PointFeature::new("bakery", 0.0, 10.0),
        ];
        let config = config(Some(vec![String::from("cafe")]));
        let scorer = DiversityScorer::new(&config, &points);
        assert_eq!(scorer.score_cell(&cell_at_origin()), 0.0);
    }
}
