use super::{SnappedCoord, WalkGraphSummary, WalkNodeId};
use crate::{algorithm, config::WalkGraphConfiguration, WalkError};
use cityhex_core::model::LineFeature;
use geo::{Coord, Distance, Euclidean, Point};
use itertools::Itertools;
use kdam::tqdm;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};

/// undirected, weighted pedestrian network. node coordinates are owned by the
/// graph and immutable after construction; edge weights are euclidean lengths
/// in meters and always positive.
#[derive(Debug, Clone, Default)]
pub struct WalkGraph {
    coords: Vec<Coord<f64>>,
    /// sorted adjacency per node for deterministic expansion order
    adj: Vec<BTreeMap<WalkNodeId, f64>>,
    n_edges: usize,
}

impl WalkGraph {
    pub fn empty() -> WalkGraph {
        WalkGraph::default()
    }

    /// builds a walkability graph from a line layer.
    ///
    /// lines rejected by the configured passability filter are skipped. every
    /// remaining line is decomposed into consecutive coordinate pairs, each
    /// coordinate is snapped to the configured precision and an undirected edge
    /// is added with the euclidean length of the snapped pair. zero-length pairs
    /// are dropped and counted. parallel edges keep the minimum weight. finally,
    /// the component filter is applied.
    ///
    /// # Arguments
    ///
    /// * `features` - line layer in a metric CRS
    /// * `config`   - snapping, passability and component parameters
    ///
    /// # Returns
    ///
    /// the graph and a summary of what was read, kept and dropped
    pub fn build(
        features: &[LineFeature],
        config: &WalkGraphConfiguration,
    ) -> Result<(WalkGraph, WalkGraphSummary), WalkError> {
        config.validate()?;
        let precision = config.snap_precision_m;
        let mut summary = WalkGraphSummary {
            features_read: features.len(),
            ..Default::default()
        };
        let mut graph = WalkGraph::empty();
        let mut lookup: HashMap<SnappedCoord, WalkNodeId> = HashMap::new();

        let iter = tqdm!(
            features.iter(),
            total = features.len(),
            desc = "build walk graph"
        );
        for feature in iter {
            if !config.passability_filter.accept(feature) {
                continue;
            }
            summary.features_accepted += 1;
            let mut n_segments = 0;
            for segment in feature.segments() {
                n_segments += 1;
                let (src_key, dst_key) = match (
                    SnappedCoord::new(segment.start, precision),
                    SnappedCoord::new(segment.end, precision),
                ) {
                    (Some(src), Some(dst)) => (src, dst),
                    _ => {
                        summary.non_finite_segments += 1;
                        continue;
                    }
                };
                if src_key == dst_key {
                    summary.zero_length_segments += 1;
                    continue;
                }
                let src = graph.get_or_insert_node(&mut lookup, src_key, precision);
                let dst = graph.get_or_insert_node(&mut lookup, dst_key, precision);
                let weight = graph.distance(src, dst)?;
                graph.add_edge(src, dst, weight);
            }
            if n_segments == 0 {
                log::debug!("line feature has no segments, skipping");
                summary.empty_features += 1;
            }
        }
        eprintln!();

        let components = algorithm::connected_components(&graph)?;
        summary.components_found = components.len();
        let kept = config.component_filter.assign_components(components);
        summary.components_kept = kept.len();
        if summary.components_kept < summary.components_found {
            let keep: HashSet<WalkNodeId> = kept.into_iter().flatten().collect();
            graph = graph.retain_nodes(&keep);
        }

        summary.n_nodes = graph.n_nodes();
        summary.n_edges = graph.n_edges();
        log::info!("{summary}");
        Ok((graph, summary))
    }

    fn get_or_insert_node(
        &mut self,
        lookup: &mut HashMap<SnappedCoord, WalkNodeId>,
        key: SnappedCoord,
        precision: f64,
    ) -> WalkNodeId {
        *lookup
            .entry(key)
            .or_insert_with(|| self.insert_node(key.to_coord(precision)))
    }

    /// appends a node with the given coordinate, returning its id.
    pub fn insert_node(&mut self, coord: Coord<f64>) -> WalkNodeId {
        let id = WalkNodeId(self.coords.len());
        self.coords.push(coord);
        self.adj.push(BTreeMap::new());
        id
    }

    /// inserts an undirected edge. when the edge already exists the lower
    /// weight is kept. non-positive weights and self-loops are ignored.
    pub fn add_edge(&mut self, src: WalkNodeId, dst: WalkNodeId, weight: f64) {
        if src == dst || weight.is_nan() || weight <= 0.0 {
            return;
        }
        if src.0 >= self.adj.len() || dst.0 >= self.adj.len() {
            return;
        }
        let is_new = !self.adj[src.0].contains_key(&dst);
        for (a, b) in [(src, dst), (dst, src)] {
            self.adj[a.0]
                .entry(b)
                .and_modify(|w| *w = w.min(weight))
                .or_insert(weight);
        }
        if is_new {
            self.n_edges += 1;
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.coords.len()
    }

    pub fn n_edges(&self) -> usize {
        self.n_edges
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = WalkNodeId> {
        (0..self.coords.len()).map(WalkNodeId)
    }

    pub fn get_coord(&self, node: WalkNodeId) -> Result<Coord<f64>, WalkError> {
        self.coords
            .get(node.0)
            .copied()
            .ok_or(WalkError::GraphMissingNodeId(node))
    }

    /// neighbors of a node along with the connecting edge weight, sorted by node id.
    pub fn neighbors(
        &self,
        node: WalkNodeId,
    ) -> Result<impl Iterator<Item = (WalkNodeId, f64)> + '_, WalkError> {
        let adjacencies = self
            .adj
            .get(node.0)
            .ok_or(WalkError::GraphMissingNodeId(node))?;
        Ok(adjacencies.iter().map(|(n, w)| (*n, *w)))
    }

    fn distance(&self, a: WalkNodeId, b: WalkNodeId) -> Result<f64, WalkError> {
        let a = self.get_coord(a)?;
        let b = self.get_coord(b)?;
        Ok(Euclidean.distance(a, b))
    }

    /// finds the node closest to a point by euclidean distance using a
    /// parallel linear scan. ties resolve to the lowest node id.
    ///
    /// # Returns
    ///
    /// the nearest node and its distance, or None when the graph has no nodes
    pub fn nearest_node(&self, point: Point<f64>) -> Option<(WalkNodeId, f64)> {
        let p = point.0;
        self.coords
            .par_iter()
            .enumerate()
            .map(|(idx, c)| {
                let d = Euclidean.distance(p, *c);
                (OrderedFloat(d), idx)
            })
            .min()
            .map(|(d, idx)| (WalkNodeId(idx), d.into_inner()))
    }

    /// creates a copy of this graph restricted to the provided nodes. node ids
    /// are re-assigned preserving their relative order.
    pub fn retain_nodes(&self, keep: &HashSet<WalkNodeId>) -> WalkGraph {
        let kept_ids = self.node_ids().filter(|n| keep.contains(n)).collect_vec();
        let remap: HashMap<WalkNodeId, WalkNodeId> = kept_ids
            .iter()
            .enumerate()
            .map(|(new_idx, old)| (*old, WalkNodeId(new_idx)))
            .collect();
        let mut out = WalkGraph::empty();
        for old in kept_ids.iter() {
            out.insert_node(self.coords[old.0]);
        }
        for old_src in kept_ids.iter() {
            for (old_dst, weight) in self.adj[old_src.0].iter() {
                if old_src >= old_dst {
                    continue;
                }
                if let (Some(src), Some(dst)) = (remap.get(old_src), remap.get(old_dst)) {
                    out.add_edge(*src, *dst, *weight);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::ComponentFilter;
    use crate::model::PassabilityFilter;
    use geo::{line_string, MultiLineString};

    fn footway(coords: &[(f64, f64)]) -> LineFeature {
        let line = geo::LineString::from(coords.to_vec());
        let tags = HashMap::from([(String::from("highway"), String::from("footway"))]);
        LineFeature::new(MultiLineString::new(vec![line]), tags)
    }

    fn config(component_filter: ComponentFilter) -> WalkGraphConfiguration {
        WalkGraphConfiguration {
            snap_precision_m: 0.1,
            passability_filter: PassabilityFilter::WalkableDefault,
            component_filter,
        }
    }

    #[test]
    fn test_snapped_endpoints_share_nodes() {
        let features = vec![
            footway(&[(0.0, 0.0), (100.0, 0.0)]),
            footway(&[(100.02, 0.01), (100.0, 50.0)]),
        ];
        let (graph, summary) =
            WalkGraph::build(&features, &config(ComponentFilter::KeepAll)).expect("graph builds");
        assert_eq!(graph.n_nodes(), 3);
        assert_eq!(graph.n_edges(), 2);
        assert_eq!(summary.features_accepted, 2);
        assert_eq!(summary.components_found, 1);
    }

    #[test]
    fn test_zero_length_and_parallel_edges() {
        let features = vec![
            footway(&[(0.0, 0.0), (0.01, 0.0), (10.0, 0.0)]),
            footway(&[(0.0, 0.0), (10.0, 0.0)]),
        ];
        let (graph, summary) =
            WalkGraph::build(&features, &config(ComponentFilter::KeepAll)).expect("graph builds");
        assert_eq!(summary.zero_length_segments, 1);
        assert_eq!(graph.n_edges(), 1);
        let (_, w) = graph
            .neighbors(WalkNodeId(0))
            .expect("node 0 exists")
            .next()
            .expect("node 0 has a neighbor");
        assert!((w - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_impassable_lines_excluded() {
        let mut motorway = footway(&[(0.0, 0.0), (10.0, 0.0)]);
        motorway
            .tags
            .insert(String::from("highway"), String::from("motorway"));
        let (graph, summary) =
            WalkGraph::build(&[motorway], &config(ComponentFilter::KeepAll)).expect("graph builds");
        assert!(graph.is_empty());
        assert_eq!(summary.features_accepted, 0);
        assert!(graph.nearest_node(Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_non_finite_vertex_dropped() {
        let features = vec![footway(&[(f64::NAN, 0.0), (10.0, 0.0), (20.0, 0.0)])];
        let (graph, summary) =
            WalkGraph::build(&features, &config(ComponentFilter::KeepAll)).expect("graph builds");
        assert_eq!(summary.non_finite_segments, 1);
        assert_eq!(graph.n_nodes(), 2);
        assert_eq!(graph.n_edges(), 1);
        // no node was invented at the origin
        let (nearest, d) = graph
            .nearest_node(Point::new(0.0, 0.0))
            .expect("graph is not empty");
        assert_eq!(graph.get_coord(nearest).expect("node exists").x, 10.0);
        assert!((d - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_largest_component_retained() {
        let features = vec![
            footway(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]),
            footway(&[(500.0, 500.0), (510.0, 500.0)]),
        ];
        let (graph, summary) =
            WalkGraph::build(&features, &config(ComponentFilter::Largest)).expect("graph builds");
        assert_eq!(summary.components_found, 2);
        assert_eq!(summary.components_kept, 1);
        assert_eq!(graph.n_nodes(), 3);
        let (nearest, _) = graph
            .nearest_node(Point::new(505.0, 500.0))
            .expect("graph is not empty");
        let coord = graph.get_coord(nearest).expect("node exists");
        assert_eq!(coord.x, 20.0);
    }

    #[test]
    fn test_nearest_node_tie_breaks_to_lowest_id() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)];
        let tags = HashMap::from([(String::from("highway"), String::from("path"))]);
        let features = vec![LineFeature::new(MultiLineString::new(vec![line]), tags)];
        let (graph, _) =
            WalkGraph::build(&features, &config(ComponentFilter::KeepAll)).expect("graph builds");
        let (nearest, d) = graph
            .nearest_node(Point::new(5.0, 0.0))
            .expect("graph is not empty");
        assert_eq!(nearest, WalkNodeId(0));
        assert!((d - 5.0).abs() < 1e-9);
    }
}
