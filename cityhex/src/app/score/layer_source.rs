use super::CategoryRule;
use crate::config::LayerKind;
use serde::{Deserialize, Serialize};

/// a GeoJSON file providing one named input layer.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LayerSource {
    pub name: String,
    pub kind: LayerKind,
    pub file: String,
    /// when absent, every feature takes the layer name as its category
    #[serde(default)]
    pub category: Option<CategoryRule>,
    /// numeric property carried by polygon features, such as population
    #[serde(default)]
    pub value_property: Option<String>,
}

impl LayerSource {
    pub fn category_rule(&self) -> CategoryRule {
        match &self.category {
            Some(rule) => rule.clone(),
            None => CategoryRule::Constant {
                category: self.name.clone(),
            },
        }
    }
}
