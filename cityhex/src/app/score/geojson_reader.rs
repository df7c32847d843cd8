use super::{category_rule::property_string, LayerSource};
use crate::{config::LayerKind, engine::InputLayers, EngineError};
use cityhex_core::{
    model::{LineFeature, PointFeature, PolygonFeature},
    util::geo_utils,
};
use geo::Geometry;
use geojson::GeoJson;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// a decoded GeoJSON feature.
pub struct RawFeature {
    pub geometry: Geometry<f64>,
    pub properties: Map<String, Value>,
}

/// reads every feature with a geometry from a GeoJSON file. a bare geometry
/// is read as a single feature without properties.
pub fn read_geojson(path: &str) -> Result<Vec<RawFeature>, EngineError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| EngineError::InputError(path.to_string(), e.to_string()))?;
    let geojson = contents
        .parse::<GeoJson>()
        .map_err(|e| EngineError::InputError(path.to_string(), e.to_string()))?;
    let pairs = match geojson {
        GeoJson::FeatureCollection(fc) => fc
            .features
            .into_iter()
            .map(|f| (f.geometry, f.properties))
            .collect::<Vec<_>>(),
        GeoJson::Feature(f) => vec![(f.geometry, f.properties)],
        GeoJson::Geometry(g) => vec![(Some(g), None)],
    };
    let mut out = vec![];
    let mut missing = 0;
    for (geometry, properties) in pairs.into_iter() {
        let geometry = match geometry {
            Some(g) => g,
            None => {
                missing += 1;
                continue;
            }
        };
        let geometry = Geometry::<f64>::try_from(geometry)
            .map_err(|e| EngineError::InputError(path.to_string(), e.to_string()))?;
        out.push(RawFeature {
            geometry,
            properties: properties.unwrap_or_default(),
        });
    }
    if missing > 0 {
        log::warn!("{path}: skipped {missing} features without geometry");
    }
    Ok(out)
}

/// reads a city boundary. multiple features are combined into one
/// GeometryCollection.
pub fn read_boundary(path: &str) -> Result<Geometry<f64>, EngineError> {
    let mut features = read_geojson(path)?;
    match features.len() {
        0 => Err(EngineError::InvalidBoundary(format!("{path} contains no geometry"))),
        1 => Ok(features.remove(0).geometry),
        _ => Ok(Geometry::GeometryCollection(geo::GeometryCollection::new_from(
            features.into_iter().map(|f| f.geometry).collect(),
        ))),
    }
}

/// reads every layer source into the engine's input layers.
pub fn read_layers(sources: &[LayerSource]) -> Result<InputLayers, EngineError> {
    let mut layers = InputLayers::default();
    for source in sources.iter() {
        log::info!("reading {} layer '{}' from {}", kind_name(source.kind), source.name, source.file);
        let features = read_geojson(&source.file)?;
        match source.kind {
            LayerKind::Lines => {
                let lines = read_lines(source, features);
                layers.lines.insert(source.name.clone(), lines);
            }
            LayerKind::Points => {
                let points = read_points(source, features);
                layers.points.insert(source.name.clone(), points);
            }
            LayerKind::Polygons => {
                let polygons = read_polygons(source, features);
                layers.polygons.insert(source.name.clone(), polygons);
            }
        }
    }
    Ok(layers)
}

fn kind_name(kind: LayerKind) -> &'static str {
    match kind {
        LayerKind::Lines => "line",
        LayerKind::Points => "point",
        LayerKind::Polygons => "polygon",
    }
}

fn read_lines(source: &LayerSource, features: Vec<RawFeature>) -> Vec<LineFeature> {
    let n_read = features.len();
    let lines = features
        .into_iter()
        .filter_map(|f| {
            let tags: HashMap<String, String> = f
                .properties
                .iter()
                .filter_map(|(k, v)| property_string(v).map(|s| (k.clone(), s)))
                .collect();
            match LineFeature::from_geometry(f.geometry, tags) {
                Ok(l) => Some(l),
                Err(e) => {
                    log::debug!("layer '{}': {e}", source.name);
                    None
                }
            }
        })
        .collect::<Vec<_>>();
    log_skipped(source, n_read, lines.len());
    lines
}

fn read_points(source: &LayerSource, features: Vec<RawFeature>) -> Vec<PointFeature> {
    let rule = source.category_rule();
    let n_read = features.len();
    let mut kept = 0;
    let mut points = vec![];
    for f in features.into_iter() {
        let category = match rule.read(&f.properties) {
            Some(c) => c,
            None => continue,
        };
        let before = points.len();
        match &f.geometry {
            Geometry::Point(p) => points.push(PointFeature::new(&category, p.x(), p.y())),
            Geometry::MultiPoint(mp) => {
                points.extend(mp.iter().map(|p| PointFeature::new(&category, p.x(), p.y())))
            }
            other => log::debug!(
                "layer '{}': skipping {} in point layer",
                source.name,
                geo_utils::geometry_type_name(other)
            ),
        }
        if points.len() > before {
            kept += 1;
        }
    }
    log_skipped(source, n_read, kept);
    points
}

fn read_polygons(source: &LayerSource, features: Vec<RawFeature>) -> Vec<PolygonFeature> {
    let rule = source.category_rule();
    let n_read = features.len();
    let polygons = features
        .into_iter()
        .filter_map(|f| {
            let category = rule.read(&f.properties)?;
            let value = source
                .value_property
                .as_ref()
                .and_then(|key| f.properties.get(key))
                .and_then(property_number);
            match PolygonFeature::from_geometry(&category, f.geometry, value) {
                Ok(p) => Some(p),
                Err(e) => {
                    log::debug!("layer '{}': {e}", source.name);
                    None
                }
            }
        })
        .collect::<Vec<_>>();
    log_skipped(source, n_read, polygons.len());
    polygons
}

/// numeric property value, accepting numbers encoded as strings.
fn property_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn log_skipped(source: &LayerSource, n_read: usize, n_kept: usize) {
    if n_kept < n_read {
        log::warn!(
            "layer '{}': kept {n_kept} of {n_read} features, the rest have no category or an unsupported geometry",
            source.name
        );
    } else {
        log::info!("layer '{}': read {n_kept} features", source.name);
    }
}
