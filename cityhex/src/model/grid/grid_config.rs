use super::{Containment, MetricProjection};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GridConfig {
    /// H3 resolution in [0, 15]
    pub resolution: u8,
    #[serde(default)]
    pub containment: Containment,
    #[serde(default)]
    pub projection: MetricProjection,
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), String> {
        h3o::Resolution::try_from(self.resolution)
            .map_err(|e| format!("invalid h3 resolution {}: {e}", self.resolution))?;
        self.projection.validate()
    }
}
