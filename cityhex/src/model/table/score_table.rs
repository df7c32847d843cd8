use super::ScoreRecord;
use crate::{model::grid::HexGrid, EngineError};
use std::collections::BTreeMap;

/// per-cell results keyed by cell identifier. columns are stored in the order
/// they were added; values within a column follow the sorted cell order.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    records: BTreeMap<String, ScoreRecord>,
    metric_names: Vec<String>,
    flag_names: Vec<String>,
}

impl ScoreTable {
    /// creates a table with one empty record per grid cell.
    pub fn from_grid(grid: &HexGrid) -> ScoreTable {
        let records = grid
            .cells()
            .iter()
            .map(|c| (c.id().to_string(), ScoreRecord::new(c.clone())))
            .collect();
        ScoreTable {
            records,
            metric_names: vec![],
            flag_names: vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &ScoreRecord> {
        self.records.values()
    }

    pub fn get(&self, cell_id: &str) -> Option<&ScoreRecord> {
        self.records.get(cell_id)
    }

    pub fn metric_names(&self) -> &[String] {
        &self.metric_names
    }

    pub fn flag_names(&self) -> &[String] {
        &self.flag_names
    }

    pub fn has_metric(&self, name: &str) -> bool {
        self.metric_names.iter().any(|n| n == name)
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flag_names.iter().any(|n| n == name)
    }

    /// writes a metric column. `values` must be in sorted cell order with one
    /// value per record.
    pub fn set_metric_column(&mut self, name: &str, values: Vec<f64>) -> Result<(), EngineError> {
        self.check_length(name, values.len())?;
        for (record, value) in self.records.values_mut().zip(values) {
            record.metrics.insert(name.to_string(), value);
        }
        if !self.has_metric(name) {
            self.metric_names.push(name.to_string());
        }
        Ok(())
    }

    pub fn set_flag_column(&mut self, name: &str, values: Vec<bool>) -> Result<(), EngineError> {
        self.check_length(name, values.len())?;
        for (record, value) in self.records.values_mut().zip(values) {
            record.flags.insert(name.to_string(), value);
        }
        if !self.has_flag(name) {
            self.flag_names.push(name.to_string());
        }
        Ok(())
    }

    pub fn metric_column(&self, name: &str) -> Result<Vec<f64>, EngineError> {
        if !self.has_metric(name) {
            return Err(EngineError::MissingColumn(name.to_string()));
        }
        Ok(self.records.values().map(|r| r.metric(name)).collect())
    }

    pub fn flag_column(&self, name: &str) -> Result<Vec<bool>, EngineError> {
        if !self.has_flag(name) {
            return Err(EngineError::MissingColumn(name.to_string()));
        }
        Ok(self
            .records
            .values()
            .map(|r| r.flag(name).unwrap_or_default())
            .collect())
    }

    fn check_length(&self, name: &str, n: usize) -> Result<(), EngineError> {
        if n != self.records.len() {
            return Err(EngineError::InternalError(format!(
                "column '{name}' has {n} values for a table of {} records",
                self.records.len()
            )));
        }
        Ok(())
    }
}
