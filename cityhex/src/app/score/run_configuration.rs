use super::{LayerSource, OutputGeometryFormat};
use crate::{
    config::{read_config_file, EngineConfig},
    EngineError,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// everything the `score` command needs: engine parameters, the input files
/// and the output encoding.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RunConfiguration {
    pub engine: EngineConfig,
    /// WGS84 city boundary, as GeoJSON
    pub boundary_file: String,
    #[serde(default)]
    pub layers: Vec<LayerSource>,
    #[serde(default)]
    pub output_geometry: OutputGeometryFormat,
}

impl RunConfiguration {
    /// validates the engine configuration and confirms that every layer it
    /// references is provided with the expected kind.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.engine.validate()?;
        let mut names = HashSet::new();
        for source in self.layers.iter() {
            if !names.insert((source.name.as_str(), source.kind)) {
                return Err(EngineError::ConfigurationError(format!(
                    "layer '{}' is provided twice",
                    source.name
                )));
            }
            if let Some(rule) = &source.category {
                rule.validate().map_err(|e| {
                    EngineError::ConfigurationError(format!("layer '{}': {e}", source.name))
                })?;
            }
        }
        for (name, kind) in self.engine.referenced_layers() {
            if !names.contains(&(name.as_str(), kind)) {
                return Err(EngineError::MissingLayer(name));
            }
        }
        Ok(())
    }
}

impl TryFrom<&String> for RunConfiguration {
    type Error = EngineError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        let config: RunConfiguration = read_config_file(f)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUN: &str = r#"
        boundary_file = "stuttgart.geojson"
        output_geometry = "geo_json"

        [engine.grid]
        resolution = 8
        projection = { type = "utm", zone = 32, hemisphere = "north" }

        [[engine.gravity]]
        name = "pt_gravity"
        layer = "transit"

        [[layers]]
        name = "transit"
        kind = "points"
        file = "stops.geojson"
        category = { type = "property", key = "route_type" }
    "#;

    #[test]
    fn test_run_configuration() {
        let config: RunConfiguration = toml::from_str(RUN).expect("run configuration parses");
        config.validate().expect("run configuration is valid");
        assert_eq!(config.output_geometry, OutputGeometryFormat::GeoJson);
    }

    #[test]
    fn test_missing_layer() {
        let mut config: RunConfiguration = toml::from_str(RUN).expect("run configuration parses");
        config.layers.clear();
        match config.validate() {
            Err(EngineError::MissingLayer(name)) => assert_eq!(name, "transit"),
            other => panic!("expected MissingLayer, found {other:?}"),
        }
    }
}
