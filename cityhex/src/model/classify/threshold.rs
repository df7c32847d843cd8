use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// a bound a metric value must satisfy. `NaN` never satisfies a threshold.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    AtMost(f64),
    AtLeast(f64),
}

impl Threshold {
    pub fn passes(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        match self {
            Threshold::AtMost(t) => value <= *t,
            Threshold::AtLeast(t) => value >= *t,
        }
    }
}

impl Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Threshold::AtMost(t) => write!(f, "<= {t}"),
            Threshold::AtLeast(t) => write!(f, ">= {t}"),
        }
    }
}
