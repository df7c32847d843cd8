use crate::model::normalize::Normalization;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_weight() -> f64 {
    0.5
}

fn default_distance_floor() -> f64 {
    50.0
}

fn default_max_radius() -> f64 {
    1500.0
}

/// distance-decay supply score over a point layer, Σ w / max(d, floor)².
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GravityConfig {
    /// output metric column
    pub name: String,
    /// point layer to score
    pub layer: String,
    /// weight per feature category
    #[serde(default)]
    pub weights: HashMap<String, f64>,
    /// weight of categories missing from `weights`
    #[serde(default = "default_weight")]
    pub default_weight: f64,
    #[serde(default = "default_distance_floor")]
    pub distance_floor_m: f64,
    #[serde(default = "default_max_radius")]
    pub max_radius_m: f64,
    /// when present, also writes `<name>_norm`
    #[serde(default)]
    pub normalization: Option<Normalization>,
}

impl GravityConfig {
    pub fn validate(&self) -> Result<(), String> {
        if let Some((category, w)) = self
            .weights
            .iter()
            .find(|(_, w)| !(w.is_finite() && **w >= 0.0))
        {
            return Err(format!(
                "gravity '{}': weight for '{category}' must be non-negative, found {w}",
                self.name
            ));
        }
        if !(self.default_weight.is_finite() && self.default_weight >= 0.0) {
            return Err(format!(
                "gravity '{}': default_weight must be non-negative, found {}",
                self.name, self.default_weight
            ));
        }
        if !(self.distance_floor_m.is_finite() && self.distance_floor_m > 0.0) {
            return Err(format!(
                "gravity '{}': distance_floor_m must be positive, found {}",
                self.name, self.distance_floor_m
            ));
        }
        if !(self.max_radius_m.is_finite() && self.max_radius_m > 0.0) {
            return Err(format!(
                "gravity '{}': max_radius_m must be positive, found {}",
                self.name, self.max_radius_m
            ));
        }
        if let Some(n) = &self.normalization {
            n.validate()
                .map_err(|e| format!("gravity '{}': {e}", self.name))?;
        }
        Ok(())
    }

    pub fn weight(&self, category: &str) -> f64 {
        self.weights
            .get(category)
            .copied()
            .unwrap_or(self.default_weight)
    }

    pub fn normalized_name(&self) -> Option<String> {
        self.normalization
            .as_ref()
            .map(|_| format!("{}_norm", self.name))
    }
}
