use crate::{algorithm::ComponentFilter, model::PassabilityFilter, WalkError};
use serde::{Deserialize, Serialize};

/// defines behaviors for building a walkability graph from a line layer
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct WalkGraphConfiguration {
    /// coordinates are rounded to this many meters so near-identical endpoints collapse
    #[serde(default = "default_snap_precision")]
    pub snap_precision_m: f64,
    #[serde(default)]
    pub passability_filter: PassabilityFilter,
    #[serde(default)]
    pub component_filter: ComponentFilter,
}

fn default_snap_precision() -> f64 {
    0.1
}

impl Default for WalkGraphConfiguration {
    fn default() -> Self {
        Self {
            snap_precision_m: default_snap_precision(),
            passability_filter: Default::default(),
            component_filter: Default::default(),
        }
    }
}

impl WalkGraphConfiguration {
    pub fn validate(&self) -> Result<(), WalkError> {
        if !(self.snap_precision_m.is_finite() && self.snap_precision_m > 0.0) {
            return Err(WalkError::ConfigurationError(format!(
                "snap_precision_m must be positive, found {}",
                self.snap_precision_m
            )));
        }
        self.component_filter.validate()
    }
}
