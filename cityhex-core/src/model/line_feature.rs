use crate::CoreError;
use geo::{Geometry, LineString, MultiLineString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// a line geometry of the street / path network in the metric CRS along
/// with its tags (`highway`, `foot`, `access`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineFeature {
    pub geometry: MultiLineString<f64>,
    pub tags: HashMap<String, String>,
}

impl LineFeature {
    pub fn new(geometry: MultiLineString<f64>, tags: HashMap<String, String>) -> LineFeature {
        LineFeature { geometry, tags }
    }

    /// builds a line feature from a LineString or MultiLineString geometry.
    pub fn from_geometry(
        geometry: Geometry<f64>,
        tags: HashMap<String, String>,
    ) -> Result<LineFeature, CoreError> {
        let lines = match geometry {
            Geometry::LineString(l) => MultiLineString::new(vec![l]),
            Geometry::MultiLineString(mls) => mls,
            Geometry::Line(l) => MultiLineString::new(vec![LineString::from(vec![l.start, l.end])]),
            other => {
                return Err(CoreError::UnsupportedGeometry(
                    String::from("line feature"),
                    crate::util::geo_utils::geometry_type_name(&other).to_string(),
                ))
            }
        };
        Ok(LineFeature::new(lines, tags))
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(|s| s.as_str())
    }

    /// iterates over every consecutive coordinate pair of every part of this line.
    pub fn segments(&self) -> impl Iterator<Item = geo::Line<f64>> + '_ {
        self.geometry.0.iter().flat_map(|ls| ls.lines())
    }
}
