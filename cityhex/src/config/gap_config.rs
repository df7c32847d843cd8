use crate::model::classify::GapRule;
use serde::{Deserialize, Serialize};

/// flags cells that no rule covers.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GapConfig {
    /// output flag column
    pub name: String,
    pub rules: Vec<GapRule>,
}

impl GapConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.rules.is_empty() {
            return Err(format!("gap '{}' requires at least one rule", self.name));
        }
        Ok(())
    }

    pub fn output_flags(&self) -> Vec<String> {
        std::iter::once(self.name.clone())
            .chain(self.rules.iter().filter_map(|r| r.coverage_flag.clone()))
            .collect()
    }
}
