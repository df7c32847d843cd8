use super::CellScorer;
use crate::EngineError;
use cityhex_core::model::{HexCell, TargetPoint};
use cityhex_walk::{
    algorithm,
    graph::{WalkGraph, WalkNodeId},
};
use geo::{Distance, Euclidean};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::collections::HashSet;

/// below this straight-line distance a detour ratio carries no signal.
const MIN_DETOUR_DISTANCE_M: f64 = 1.0;

/// parameters of a network access metric.
#[derive(Debug, Clone, Copy)]
pub struct NetworkAccessParams {
    pub candidates_k: usize,
    pub walking_speed_m_per_min: f64,
    pub max_network_distance_m: Option<f64>,
    pub minutes_cap: Option<f64>,
}

/// the shortest route found from a cell centroid to its target set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccessRoute {
    /// network distance between the centroid node and the reached target node
    pub network_m: f64,
    /// straight-line distance between the centroid and the reached target
    pub straight_m: f64,
}

impl AccessRoute {
    /// network distance over straight-line distance, `NaN` when the
    /// endpoints are too close for the ratio to be meaningful.
    pub fn detour_factor(&self) -> f64 {
        if self.straight_m < MIN_DETOUR_DISTANCE_M {
            f64::NAN
        } else {
            self.network_m / self.straight_m
        }
    }
}

/// walking time from each cell centroid to the nearest target by network
/// distance, searching among the `candidates_k` straight-line-nearest targets.
pub struct NetworkAccessScorer<'a> {
    name: &'a str,
    graph: &'a WalkGraph,
    targets: &'a [TargetPoint],
    /// graph node closest to each target, in target order
    target_nodes: Vec<WalkNodeId>,
    params: NetworkAccessParams,
}

impl<'a> NetworkAccessScorer<'a> {
    /// snaps every target to its nearest graph node once, up front.
    pub fn new(
        name: &'a str,
        graph: &'a WalkGraph,
        targets: &'a [TargetPoint],
        params: NetworkAccessParams,
    ) -> Result<NetworkAccessScorer<'a>, EngineError> {
        if params.candidates_k < 1 {
            return Err(EngineError::InvalidConfiguration(format!(
                "access '{name}': candidates_k must be >= 1"
            )));
        }
        let target_nodes = if graph.is_empty() {
            vec![]
        } else {
            targets
                .par_iter()
                .map(|t| {
                    graph.nearest_node(t.point).map(|(n, _)| n).ok_or_else(|| {
                        EngineError::InternalError(String::from(
                            "non-empty walk graph returned no nearest node",
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?
        };
        log::debug!(
            "access '{name}': snapped {} targets to {} distinct graph nodes",
            target_nodes.len(),
            target_nodes.iter().collect::<HashSet<_>>().len()
        );
        Ok(NetworkAccessScorer {
            name,
            graph,
            targets,
            target_nodes,
            params,
        })
    }

    /// true when no cell can reach a target: an empty graph or an empty target set.
    pub fn is_degenerate(&self) -> bool {
        self.graph.is_empty() || self.targets.is_empty()
    }

    /// indices of the `k` targets closest to a cell centroid, nearest first.
    /// ties resolve to the lower target index.
    fn candidates(&self, cell: &HexCell) -> Vec<(OrderedFloat<f64>, usize)> {
        let c = cell.centroid().0;
        let mut by_distance = self
            .targets
            .iter()
            .enumerate()
            .map(|(idx, t)| (OrderedFloat(Euclidean.distance(c, t.point.0)), idx))
            .collect::<Vec<_>>();
        let k = self.params.candidates_k.min(by_distance.len());
        if k < by_distance.len() {
            by_distance.select_nth_unstable(k - 1);
            by_distance.truncate(k);
        }
        by_distance.sort();
        by_distance
    }

    /// routes one cell to its target set.
    ///
    /// # Returns
    ///
    /// the route to the nearest reachable candidate, or None when the graph
    /// or target set is empty or no candidate is reachable
    pub fn route(&self, cell: &HexCell) -> Result<Option<AccessRoute>, EngineError> {
        if self.is_degenerate() {
            return Ok(None);
        }
        let candidates = self.candidates(cell);
        let goals: HashSet<WalkNodeId> = candidates
            .iter()
            .map(|(_, idx)| self.target_nodes[*idx])
            .collect();
        let src = match self.graph.nearest_node(cell.centroid()) {
            Some((n, _)) => n,
            None => return Ok(None),
        };
        let found = algorithm::dijkstra_to_nearest(
            src,
            self.graph,
            &goals,
            self.params.max_network_distance_m,
        )?;
        let result = match found {
            Some(r) => r,
            None => return Ok(None),
        };
        // several candidates may share a node; report the nearest of them
        let straight_m = candidates
            .iter()
            .find(|(_, idx)| self.target_nodes[*idx] == result.target)
            .map(|(d, _)| d.into_inner())
            .ok_or_else(|| {
                EngineError::InternalError(format!(
                    "access '{}': reached node {} is not a candidate",
                    self.name, result.target
                ))
            })?;
        Ok(Some(AccessRoute {
            network_m: result.distance_m,
            straight_m,
        }))
    }

    /// walking minutes for a route, truncated at the configured cap.
    pub fn minutes(&self, route: Option<&AccessRoute>) -> f64 {
        match route {
            None => f64::NAN,
            Some(r) => {
                let minutes = r.network_m / self.params.walking_speed_m_per_min;
                match self.params.minutes_cap {
                    Some(cap) => minutes.min(cap),
                    None => minutes,
                }
            }
        }
    }
}

impl CellScorer for NetworkAccessScorer<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn score_cell(&self, cell: &HexCell) -> f64 {
        match self.route(cell) {
            Ok(route) => self.minutes(route.as_ref()),
            Err(e) => {
                log::debug!("access '{}': routing cell {} failed: {e}", self.name, cell.id());
                f64::NAN
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cityhex_core::model::LineFeature;
    use cityhex_walk::config::WalkGraphConfiguration;
    use geo::{LineString, MultiLineString, Point};
    use std::collections::HashMap;

    fn params() -> NetworkAccessParams {
        NetworkAccessParams {
            candidates_k: 8,
            walking_speed_m_per_min: 80.0,
            max_network_distance_m: None,
            minutes_cap: None,
        }
    }

    fn footway(coords: &[(f64, f64)]) -> LineFeature {
        let tags = HashMap::from([(String::from("highway"), String::from("footway"))]);
        LineFeature::new(
            MultiLineString::new(vec![LineString::from(coords.to_vec())]),
            tags,
        )
    }

    fn graph(lines: &[LineFeature]) -> WalkGraph {
        let (graph, _) =
            WalkGraph::build(lines, &WalkGraphConfiguration::default()).expect("graph builds");
        graph
    }

    fn cell_at(x: f64, y: f64) -> HexCell {
        let polygon = geo::Polygon::new(
            LineString::from(vec![
                (x - 5.0, y - 5.0),
                (x + 5.0, y - 5.0),
                (x + 5.0, y + 5.0),
                (x - 5.0, y + 5.0),
            ]),
            vec![],
        );
        HexCell::from_polygon(String::from("cell"), polygon).expect("valid cell")
    }

    #[test]
    fn test_single_edge_walk_time() {
        let g = graph(&[footway(&[(0.0, 0.0), (100.0, 0.0)])]);
        let targets = vec![TargetPoint::new("park", Point::new(100.0, 0.0))];
        let scorer = NetworkAccessScorer::new("park_access_min", &g, &targets, params())
            .expect("scorer builds");
        let minutes = scorer.score_cell(&cell_at(0.0, 0.0));
        assert!((minutes - 1.25).abs() < 1e-12, "{minutes} != 1.25");
    }

    #[test]
    fn test_unreachable_and_empty_are_nan() {
        let g = graph(&[
            footway(&[(0.0, 0.0), (100.0, 0.0)]),
            footway(&[(1000.0, 0.0), (1100.0, 0.0)]),
        ]);
        let targets = vec![TargetPoint::new("park", Point::new(1100.0, 0.0))];
        let scorer =
            NetworkAccessScorer::new("a", &g, &targets, params()).expect("scorer builds");
        assert!(scorer.score_cell(&cell_at(0.0, 0.0)).is_nan());

        let no_targets = NetworkAccessScorer::new("a", &g, &[], params()).expect("scorer builds");
        assert!(no_targets.is_degenerate());
        assert!(no_targets.score_cell(&cell_at(0.0, 0.0)).is_nan());

        let empty = WalkGraph::empty();
        let no_graph =
            NetworkAccessScorer::new("a", &empty, &targets, params()).expect("scorer builds");
        assert!(no_graph.score_cell(&cell_at(0.0, 0.0)).is_nan());
    }

    #[test]
    fn test_nearest_by_network_among_candidates() {
        // the straight-line nearest target sits behind a long detour
        let g = graph(&[
            footway(&[(0.0, 0.0), (0.0, 500.0), (50.0, 500.0), (50.0, 10.0)]),
            footway(&[(0.0, 0.0), (-200.0, 0.0)]),
        ]);
        let targets = vec![
            TargetPoint::new("park", Point::new(50.0, 10.0)),
            TargetPoint::new("park", Point::new(-200.0, 0.0)),
        ];
        let scorer =
            NetworkAccessScorer::new("a", &g, &targets, params()).expect("scorer builds");
        let route = scorer
            .route(&cell_at(0.0, 0.0))
            .expect("routing succeeds")
            .expect("a target is reachable");
        assert!((route.network_m - 200.0).abs() < 1e-9);
        assert!((route.detour_factor() - 1.0).abs() < 1e-9);

        let mut only_nearest = params();
        only_nearest.candidates_k = 1;
        let scorer =
            NetworkAccessScorer::new("a", &g, &targets, only_nearest).expect("scorer builds");
        let route = scorer
            .route(&cell_at(0.0, 0.0))
            .expect("routing succeeds")
            .expect("a target is reachable");
        assert!((route.network_m - 1040.0).abs() < 1e-9);
        assert!(route.detour_factor() > 1.4);
    }

    #[test]
    fn test_cap_and_max_distance() {
        let g = graph(&[footway(&[(0.0, 0.0), (1600.0, 0.0)])]);
        let targets = vec![TargetPoint::new("park", Point::new(1600.0, 0.0))];
        let mut capped = params();
        capped.minutes_cap = Some(15.0);
        let scorer = NetworkAccessScorer::new("a", &g, &targets, capped).expect("scorer builds");
        assert_eq!(scorer.score_cell(&cell_at(0.0, 0.0)), 15.0);

        let mut limited = params();
        limited.max_network_distance_m = Some(1000.0);
        let scorer = NetworkAccessScorer::new("a", &g, &targets, limited).expect("scorer builds");
        assert!(scorer.score_cell(&cell_at(0.0, 0.0)).is_nan());
    }
}
