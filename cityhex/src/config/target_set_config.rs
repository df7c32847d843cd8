use cityhex_walk::target::TargetExtractionConfig;
use serde::{Deserialize, Serialize};

fn default_sample_step() -> f64 {
    80.0
}

/// a named set of routing targets used by network access metrics.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TargetSetConfig {
    /// entrances of destination polygons: path crossings of their boundary, or
    /// boundary samples when no path reaches them
    PolygonEntrances {
        name: String,
        layer: String,
        #[serde(default)]
        categories: Option<Vec<String>>,
        #[serde(default)]
        min_area_m2: f64,
        #[serde(default = "default_sample_step")]
        boundary_sample_step_m: f64,
    },
    /// features of a point layer used as targets directly
    PointLayer {
        name: String,
        layer: String,
        #[serde(default)]
        categories: Option<Vec<String>>,
    },
}

impl TargetSetConfig {
    pub fn name(&self) -> &str {
        match self {
            TargetSetConfig::PolygonEntrances { name, .. } => name,
            TargetSetConfig::PointLayer { name, .. } => name,
        }
    }

    pub fn layer(&self) -> &str {
        match self {
            TargetSetConfig::PolygonEntrances { layer, .. } => layer,
            TargetSetConfig::PointLayer { layer, .. } => layer,
        }
    }

    pub fn categories(&self) -> Option<&Vec<String>> {
        match self {
            TargetSetConfig::PolygonEntrances { categories, .. } => categories.as_ref(),
            TargetSetConfig::PointLayer { categories, .. } => categories.as_ref(),
        }
    }

    pub fn extraction_config(&self) -> Option<TargetExtractionConfig> {
        match self {
            TargetSetConfig::PolygonEntrances {
                min_area_m2,
                boundary_sample_step_m,
                ..
            } => Some(TargetExtractionConfig {
                min_area_m2: *min_area_m2,
                boundary_sample_step_m: *boundary_sample_step_m,
            }),
            TargetSetConfig::PointLayer { .. } => None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self.extraction_config() {
            Some(c) => c
                .validate()
                .map_err(|e| format!("target set '{}': {e}", self.name())),
            None => Ok(()),
        }
    }
}
