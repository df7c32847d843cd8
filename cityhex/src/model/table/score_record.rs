use cityhex_core::model::HexCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// one row of a [`super::ScoreTable`]. metric values of `NaN` carry no signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub cell: HexCell,
    pub metrics: BTreeMap<String, f64>,
    pub flags: BTreeMap<String, bool>,
}

impl ScoreRecord {
    pub fn new(cell: HexCell) -> ScoreRecord {
        ScoreRecord {
            cell,
            metrics: BTreeMap::new(),
            flags: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        self.cell.id()
    }

    /// the metric value, or `NaN` when this record has no such metric.
    pub fn metric(&self, name: &str) -> f64 {
        self.metrics.get(name).copied().unwrap_or(f64::NAN)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.flags.get(name).copied()
    }
}
