use crate::{graph::WalkGraph, graph::WalkNodeId, WalkError};
use itertools::Itertools;
use ordered_float::OrderedFloat;
use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap, HashSet, VecDeque},
};

/// the first target settled by a shortest path search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub target: WalkNodeId,
    pub distance_m: f64,
}

/// single-source Dijkstra search over the undirected walk graph that stops as
/// soon as any node of the target set is settled.
///
/// # Arguments
///
/// * `src`          - origin of the search
/// * `graph`        - graph to search
/// * `targets`      - set of acceptable destinations
/// * `max_distance` - optional network distance beyond which the search gives up
///
/// # Returns
///
/// the nearest target by network distance, or None when no target is reachable
/// (within `max_distance` when provided).
pub fn dijkstra_to_nearest(
    src: WalkNodeId,
    graph: &WalkGraph,
    targets: &HashSet<WalkNodeId>,
    max_distance: Option<f64>,
) -> Result<Option<SearchResult>, WalkError> {
    if targets.is_empty() {
        return Ok(None);
    }
    let _ = graph.get_coord(src)?;
    let mut settled: HashSet<WalkNodeId> = HashSet::new();
    let mut best: HashMap<WalkNodeId, f64> = HashMap::from([(src, 0.0)]);
    let mut frontier: BinaryHeap<Reverse<(OrderedFloat<f64>, WalkNodeId)>> = BinaryHeap::new();
    frontier.push(Reverse((OrderedFloat(0.0), src)));

    while let Some(Reverse((OrderedFloat(dist), node))) = frontier.pop() {
        if !settled.insert(node) {
            continue;
        }
        if let Some(limit) = max_distance {
            if dist > limit {
                return Ok(None);
            }
        }
        if targets.contains(&node) {
            return Ok(Some(SearchResult {
                target: node,
                distance_m: dist,
            }));
        }
        for (neighbor, weight) in graph.neighbors(node)? {
            if settled.contains(&neighbor) {
                continue;
            }
            let next = dist + weight;
            let improved = match best.get(&neighbor) {
                Some(known) => next < *known,
                None => true,
            };
            if improved {
                best.insert(neighbor, next);
                frontier.push(Reverse((OrderedFloat(next), neighbor)));
            }
        }
    }
    Ok(None)
}

/// finds the set of nodes that are part of the same connected component
/// using a breadth-first search over the undirected graph.
///
/// # Arguments
///
/// * `src` - origin of tree
/// * `graph` - graph to search
///
/// # Returns
///
/// The set of node ids connected to `src`.
pub fn bfs_undirected(src: WalkNodeId, graph: &WalkGraph) -> Result<HashSet<WalkNodeId>, WalkError> {
    // breadth-first search is modeled here with a FIFO queue.
    let mut visited: HashSet<WalkNodeId> = HashSet::from([src]);
    let mut frontier: VecDeque<WalkNodeId> = VecDeque::from([src]);

    while let Some(next_id) = frontier.pop_front() {
        // neighbors are sorted by id for algorithmic determinism (frontier insertion order).
        let neighbors = graph.neighbors(next_id)?.map(|(n, _)| n).collect_vec();
        for neighbor in neighbors {
            if visited.insert(neighbor) {
                frontier.push_back(neighbor);
            }
        }
    }

    Ok(visited)
}

/// partitions the graph nodes into connected components. each component is
/// sorted by node id and components are ordered by their smallest node id.
pub fn connected_components(graph: &WalkGraph) -> Result<Vec<Vec<WalkNodeId>>, WalkError> {
    let mut assigned: HashSet<WalkNodeId> = HashSet::new();
    let mut components: Vec<Vec<WalkNodeId>> = vec![];
    for node in graph.node_ids() {
        if assigned.contains(&node) {
            continue;
        }
        let component = bfs_undirected(node, graph)?;
        assigned.extend(component.iter().copied());
        components.push(component.into_iter().sorted().collect_vec());
    }
    Ok(components)
}
