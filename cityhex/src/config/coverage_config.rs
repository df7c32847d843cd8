use crate::model::normalize::Normalization;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum CoverageMethod {
    /// number of distinct tracked categories within the radius of the centroid
    CategoryCount { categories: Vec<String> },
    /// share of the cell area within the radius of any feature
    UnionArea,
}

/// radius coverage of a point layer.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CoverageConfig {
    pub name: String,
    pub layer: String,
    pub radius_m: f64,
    pub method: CoverageMethod,
    /// when present, also writes `<name>_norm`
    #[serde(default)]
    pub normalization: Option<Normalization>,
}

impl CoverageConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.radius_m.is_finite() && self.radius_m > 0.0) {
            return Err(format!(
                "coverage '{}': radius_m must be positive, found {}",
                self.name, self.radius_m
            ));
        }
        if let CoverageMethod::CategoryCount { categories } = &self.method {
            if categories.is_empty() {
                return Err(format!(
                    "coverage '{}': category_count requires at least one category",
                    self.name
                ));
            }
        }
        if let Some(n) = &self.normalization {
            n.validate()
                .map_err(|e| format!("coverage '{}': {e}", self.name))?;
        }
        Ok(())
    }

    pub fn normalized_name(&self) -> Option<String> {
        self.normalization
            .as_ref()
            .map(|_| format!("{}_norm", self.name))
    }
}
