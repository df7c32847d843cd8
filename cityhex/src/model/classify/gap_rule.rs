use super::Threshold;
use serde::{Deserialize, Serialize};

/// a coverage criterion: the cell is served by this rule when `metric`
/// satisfies `threshold`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GapRule {
    pub metric: String,
    pub threshold: Threshold,
    /// when present, writes this rule's own pass/fail flag column
    #[serde(default)]
    pub coverage_flag: Option<String>,
}

impl GapRule {
    pub fn passes(&self, value: f64) -> bool {
        self.threshold.passes(value)
    }
}
