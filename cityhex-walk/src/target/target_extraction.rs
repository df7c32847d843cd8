use super::{SegmentIndex, TargetExtractionConfig};
use crate::{graph::SnappedCoord, WalkError};
use cityhex_core::{
    model::{PointFeature, PolygonFeature, TargetPoint},
    util::geo_utils,
};
use geo::{Coord, Point};
use rayon::prelude::*;
use std::collections::HashSet;

/// precision used to collapse duplicate intersection points found on
/// adjacent boundary segments.
const DEDUP_PRECISION_M: f64 = 0.001;

/// targets derived from a destination polygon layer along with counts of how
/// they were derived.
#[derive(Debug, Clone, Default)]
pub struct TargetExtraction {
    pub targets: Vec<TargetPoint>,
    pub polygons_kept: usize,
    pub polygons_below_min_area: usize,
    pub polygons_zero_area: usize,
    /// polygons whose targets are path crossings of their boundary
    pub polygons_intersected: usize,
    /// polygons no path crosses, represented by boundary samples
    pub polygons_sampled: usize,
}

/// derives plausible entrance points for a set of destination polygons.
///
/// polygons smaller than the configured minimum area (or with no area at all)
/// are excluded. for each remaining polygon, every point where a passable
/// segment crosses or touches the polygon boundary becomes a target. when no
/// segment touches the boundary, the boundary rings are sampled every
/// `boundary_sample_step_m` meters instead.
///
/// # Arguments
///
/// * `destinations` - destination polygons in the metric CRS
/// * `index`        - spatial index of passable segments
/// * `config`       - minimum area and sampling parameters
///
/// # Returns
///
/// the targets in input order, with counts of how each polygon was handled
pub fn extract_polygon_targets(
    destinations: &[PolygonFeature],
    index: &SegmentIndex,
    config: &TargetExtractionConfig,
) -> Result<TargetExtraction, WalkError> {
    config.validate()?;
    let mut result = TargetExtraction::default();
    let mut kept: Vec<&PolygonFeature> = vec![];
    for polygon in destinations.iter() {
        let area = polygon.area_m2();
        if area.is_nan() || area <= 0.0 {
            log::debug!("destination '{}' has no area, skipping", polygon.category);
            result.polygons_zero_area += 1;
        } else if area < config.min_area_m2 {
            result.polygons_below_min_area += 1;
        } else {
            kept.push(polygon);
        }
    }
    result.polygons_kept = kept.len();

    let per_polygon: Vec<(Vec<TargetPoint>, bool)> = kept
        .par_iter()
        .map(|polygon| polygon_targets(polygon, index, config.boundary_sample_step_m))
        .collect();

    for (targets, intersected) in per_polygon.into_iter() {
        if intersected {
            result.polygons_intersected += 1;
        } else {
            result.polygons_sampled += 1;
        }
        result.targets.extend(targets);
    }
    log::info!(
        "extracted {} targets from {} destinations ({} crossed by paths, {} sampled, {} below minimum area, {} without area)",
        result.targets.len(),
        result.polygons_kept,
        result.polygons_intersected,
        result.polygons_sampled,
        result.polygons_below_min_area,
        result.polygons_zero_area
    );
    Ok(result)
}

/// targets for a single polygon, with true when they come from path crossings.
fn polygon_targets(
    polygon: &PolygonFeature,
    index: &SegmentIndex,
    step: f64,
) -> (Vec<TargetPoint>, bool) {
    let rings = polygon
        .geometry()
        .0
        .iter()
        .flat_map(geo_utils::polygon_rings)
        .collect::<Vec<_>>();

    let mut seen: HashSet<SnappedCoord> = HashSet::new();
    let mut crossings: Vec<Coord<f64>> = vec![];
    for ring in rings.iter() {
        for boundary_segment in ring.lines() {
            for path_segment in index.candidates(&boundary_segment) {
                for c in geo_utils::segment_intersections(&boundary_segment, path_segment) {
                    match SnappedCoord::new(c, DEDUP_PRECISION_M) {
                        Some(key) if seen.insert(key) => crossings.push(c),
                        _ => {}
                    }
                }
            }
        }
    }

    if !crossings.is_empty() {
        let targets = crossings
            .into_iter()
            .map(|c| TargetPoint::new(&polygon.category, Point(c)))
            .collect();
        return (targets, true);
    }

    let targets = rings
        .iter()
        .flat_map(|ring| geo_utils::sample_along(ring, step))
        .map(|c| TargetPoint::new(&polygon.category, Point(c)))
        .collect();
    (targets, false)
}

/// uses a point layer directly as a target set, optionally restricted to
/// a set of categories.
pub fn point_targets(points: &[PointFeature], categories: Option<&HashSet<String>>) -> Vec<TargetPoint> {
    points
        .iter()
        .filter(|p| match categories {
            Some(c) => c.contains(&p.category),
            None => true,
        })
        .map(TargetPoint::from)
        .collect()
}
