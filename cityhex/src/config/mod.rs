mod access_config;
mod composite_config;
mod coverage_config;
mod demand_config;
mod diversity_config;
mod engine_config;
mod gap_config;
mod gravity_config;
mod mismatch_config;
mod normalization_config;
mod target_set_config;

pub use access_config::{AccessConfig, BarrierFlagConfig, DetourConfig};
pub use composite_config::{CompositeComponent, CompositeConfig};
pub use coverage_config::{CoverageConfig, CoverageMethod};
pub use demand_config::DemandConfig;
pub use diversity_config::DiversityConfig;
pub use engine_config::{EngineConfig, LayerKind};
pub use gap_config::GapConfig;
pub use gravity_config::GravityConfig;
pub use mismatch_config::{HotspotConfig, MismatchConfig};
pub use normalization_config::NormalizationConfig;
pub use target_set_config::TargetSetConfig;

use crate::EngineError;
use serde::de::DeserializeOwned;

/// reads a configuration file, choosing the decoder from the file extension.
pub fn read_config_file<T: DeserializeOwned>(f: &String) -> Result<T, EngineError> {
    if f.ends_with(".toml") {
        let s = std::fs::read_to_string(f)
            .map_err(|e| EngineError::ConfigurationError(format!("failure reading {f}: {e}")))?;
        toml::from_str(&s)
            .map_err(|e| EngineError::ConfigurationError(format!("failure decoding {f}: {e}")))
    } else if f.ends_with(".json") {
        let s = std::fs::read_to_string(f)
            .map_err(|e| EngineError::ConfigurationError(format!("failure reading {f}: {e}")))?;
        serde_json::from_str(&s)
            .map_err(|e| EngineError::ConfigurationError(format!("failure decoding {f}: {e}")))
    } else {
        Err(EngineError::ConfigurationError(format!(
            "unsupported file type: {f}"
        )))
    }
}
