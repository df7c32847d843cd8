use serde::{Deserialize, Serialize};

/// distributes a value carried by demand polygons (e.g. district population)
/// onto cells by intersection area share.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DemandConfig {
    /// polygon layer carrying the values
    pub layer: String,
    /// output column with the apportioned total per cell
    pub name: String,
    /// output column with the total per km² of cell area
    #[serde(default)]
    pub density_name: Option<String>,
}

impl DemandConfig {
    pub fn output_metrics(&self) -> Vec<String> {
        std::iter::once(self.name.clone())
            .chain(self.density_name.iter().cloned())
            .collect()
    }
}
