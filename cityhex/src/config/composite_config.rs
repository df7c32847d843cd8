use crate::model::normalize::Normalization;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CompositeComponent {
    pub metric: String,
    pub weight: f64,
    /// applied to the metric column before weighting
    #[serde(default)]
    pub normalization: Option<Normalization>,
}

/// weighted mean of several metrics with an optional descending rank.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CompositeConfig {
    pub name: String,
    pub components: Vec<CompositeComponent>,
    /// when present, writes the rank of each cell (1 = best)
    #[serde(default)]
    pub rank: Option<String>,
}

impl CompositeConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.components.is_empty() {
            return Err(format!(
                "composite '{}' requires at least one component",
                self.name
            ));
        }
        for c in self.components.iter() {
            if !(c.weight.is_finite() && c.weight >= 0.0) {
                return Err(format!(
                    "composite '{}': weight of '{}' must be non-negative, found {}",
                    self.name, c.metric, c.weight
                ));
            }
            if let Some(n) = &c.normalization {
                n.validate()
                    .map_err(|e| format!("composite '{}': {e}", self.name))?;
            }
        }
        let total: f64 = self.components.iter().map(|c| c.weight).sum();
        if total <= 0.0 {
            return Err(format!(
                "composite '{}': component weights sum to zero",
                self.name
            ));
        }
        Ok(())
    }

    pub fn output_metrics(&self) -> Vec<String> {
        std::iter::once(self.name.clone())
            .chain(self.rank.iter().cloned())
            .collect()
    }
}
