use crate::WalkError;
use serde::{Deserialize, Serialize};

/// parameters for deriving access targets from destination polygons.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TargetExtractionConfig {
    /// polygons smaller than this are not destinations
    #[serde(default)]
    pub min_area_m2: f64,
    /// spacing of fallback boundary samples for polygons no path crosses
    #[serde(default = "default_sample_step")]
    pub boundary_sample_step_m: f64,
}

fn default_sample_step() -> f64 {
    80.0
}

impl Default for TargetExtractionConfig {
    fn default() -> Self {
        Self {
            min_area_m2: 0.0,
            boundary_sample_step_m: default_sample_step(),
        }
    }
}

impl TargetExtractionConfig {
    pub fn validate(&self) -> Result<(), WalkError> {
        if !(self.min_area_m2.is_finite() && self.min_area_m2 >= 0.0) {
            return Err(WalkError::ConfigurationError(format!(
                "min_area_m2 must be non-negative, found {}",
                self.min_area_m2
            )));
        }
        if !(self.boundary_sample_step_m.is_finite() && self.boundary_sample_step_m > 0.0) {
            return Err(WalkError::ConfigurationError(format!(
                "boundary_sample_step_m must be positive, found {}",
                self.boundary_sample_step_m
            )));
        }
        Ok(())
    }
}
