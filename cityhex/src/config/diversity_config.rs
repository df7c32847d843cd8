use serde::{Deserialize, Serialize};

/// Shannon entropy of point categories near each cell centroid.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DiversityConfig {
    pub name: String,
    pub layer: String,
    pub radius_m: f64,
    /// when present, only these categories are counted
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

impl DiversityConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.radius_m.is_finite() && self.radius_m > 0.0) {
            return Err(format!(
                "diversity '{}': radius_m must be positive, found {}",
                self.name, self.radius_m
            ));
        }
        Ok(())
    }
}
