use crate::CoreError;
use geo::{
    line_intersection::{line_intersection, LineIntersection},
    line_measures::LengthMeasurable,
    BoundingRect, Coord, Euclidean, Geometry, InterpolatableLine, Line, LineString, MultiPolygon,
    Polygon,
};
use rstar::AABB;

pub fn geometry_type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// gathers the polygonal content of a geometry into a MultiPolygon.
///
/// Polygon and MultiPolygon are taken as-is, Rect and Triangle are converted,
/// GeometryCollection members are visited recursively and non-polygonal
/// members are ignored. any other top-level geometry type is an error.
///
/// # Arguments
///
/// * `geometry` - value to collect polygons from
///
/// # Returns
///
/// * the (possibly empty) MultiPolygon, or an error for non-polygonal input
pub fn collect_polygons(geometry: &Geometry<f64>) -> Result<MultiPolygon<f64>, CoreError> {
    match geometry {
        Geometry::Polygon(p) => Ok(MultiPolygon::new(vec![p.clone()])),
        Geometry::MultiPolygon(mp) => Ok(mp.clone()),
        Geometry::Rect(r) => Ok(MultiPolygon::new(vec![r.to_polygon()])),
        Geometry::Triangle(t) => Ok(MultiPolygon::new(vec![t.to_polygon()])),
        Geometry::GeometryCollection(gc) => {
            let mut out: Vec<Polygon<f64>> = vec![];
            for g in gc.iter() {
                if let Ok(mp) = collect_polygons(g) {
                    out.extend(mp.0);
                }
            }
            Ok(MultiPolygon::new(out))
        }
        other => Err(CoreError::UnsupportedGeometry(
            String::from("polygonal geometry"),
            geometry_type_name(other).to_string(),
        )),
    }
}

/// creates an envelope from a MultiPolygon's bounding rectangle for insertion
/// into an rstar RTree. empty geometries have no bounding rectangle, so the
/// result may be None.
pub fn get_multipolygon_envelope(geometry: &MultiPolygon<f64>) -> Option<AABB<[f64; 2]>> {
    geometry
        .bounding_rect()
        .map(|r| AABB::from_corners([r.min().x, r.min().y], [r.max().x, r.max().y]))
}

/// exterior then interior rings of a polygon.
pub fn polygon_rings(polygon: &Polygon<f64>) -> impl Iterator<Item = &LineString<f64>> {
    std::iter::once(polygon.exterior()).chain(polygon.interiors().iter())
}

/// intersection points of two segments, including touching endpoints.
///
/// proper crossings and touches produce a single point. collinear overlapping
/// segments produce the two endpoints of the overlap. disjoint or parallel
/// non-overlapping segments produce nothing.
pub fn segment_intersections(a: &Line<f64>, b: &Line<f64>) -> Vec<Coord<f64>> {
    match line_intersection(*a, *b) {
        None => vec![],
        Some(LineIntersection::SinglePoint { intersection, .. }) => vec![intersection],
        Some(LineIntersection::Collinear { intersection }) if intersection.start == intersection.end => {
            vec![intersection.start]
        }
        Some(LineIntersection::Collinear { intersection }) => {
            vec![intersection.start, intersection.end]
        }
    }
}

/// regular n-gon approximating a circle around a center point.
pub fn circle_polygon(center: Coord<f64>, radius: f64, vertices: usize) -> Polygon<f64> {
    let n = vertices.max(3);
    let ring: Vec<Coord<f64>> = (0..n)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * (i as f64) / (n as f64);
            Coord {
                x: center.x + radius * theta.cos(),
                y: center.y + radius * theta.sin(),
            }
        })
        .collect();
    Polygon::new(LineString::from(ring), vec![])
}

/// samples a ring every `step` meters: with `n = max(1, ceil(len / step))`,
/// returns the points at fractions `i / n` for `i = 0..=n`. a closed ring
/// therefore repeats its first point at the end.
pub fn sample_along(line: &LineString<f64>, step: f64) -> Vec<Coord<f64>> {
    if line.0.is_empty() {
        return vec![];
    }
    let len = line.length(&Euclidean);
    let n = if step > 0.0 {
        ((len / step).ceil() as usize).max(1)
    } else {
        1
    };
    (0..=n)
        .filter_map(|i| line.point_at_ratio_from_start(&Euclidean, i as f64 / n as f64))
        .map(|p| p.0)
        .collect()
}
