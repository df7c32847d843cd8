use geo::Polygon;
use serde::{Deserialize, Serialize};
use wkt::ToWkt;

/// encoding of the cell polygon column in the score table output.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputGeometryFormat {
    #[default]
    Wkt,
    GeoJson,
}

impl TryFrom<&str> for OutputGeometryFormat {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().trim() {
            "wkt" => Ok(Self::Wkt),
            "geojson" | "geo_json" => Ok(Self::GeoJson),
            _ => Err(format!("unknown output geometry format '{value}'")),
        }
    }
}

impl std::fmt::Display for OutputGeometryFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OutputGeometryFormat::Wkt => "wkt",
            OutputGeometryFormat::GeoJson => "geojson",
        };
        write!(f, "{s}")
    }
}

impl OutputGeometryFormat {
    pub fn serialize(&self, polygon: &Polygon<f64>) -> Result<String, String> {
        match self {
            OutputGeometryFormat::Wkt => Ok(polygon.to_wkt().to_string()),
            OutputGeometryFormat::GeoJson => {
                let geometry = geojson::Geometry::from(&geo::Geometry::Polygon(polygon.clone()));
                serde_json::to_string(&geometry).map_err(|e| e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn test_serialize() {
        let p = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)];
        let wkt = OutputGeometryFormat::Wkt.serialize(&p).expect("wkt encodes");
        assert!(wkt.starts_with("POLYGON"));
        let json = OutputGeometryFormat::GeoJson
            .serialize(&p)
            .expect("geojson encodes");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["type"], "Polygon");
        assert_eq!(OutputGeometryFormat::try_from("GeoJSON"), Ok(OutputGeometryFormat::GeoJson));
    }
}
