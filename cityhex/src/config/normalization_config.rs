use crate::model::normalize::Normalization;
use serde::{Deserialize, Serialize};

/// writes a normalized copy of a metric column.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NormalizationConfig {
    pub name: String,
    pub metric: String,
    pub method: Normalization,
}
