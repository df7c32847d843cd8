use crate::{model::grid::HexGrid, EngineError};
use cityhex_core::model::HexCell;
use kdam::{Bar, BarBuilder, BarExt};
use rayon::prelude::*;
use std::sync::{Arc, Mutex};

/// a per-cell metric. implementations borrow their inputs read-only so the
/// engine can evaluate cells in parallel.
pub trait CellScorer: Sync {
    /// output column written by this scorer
    fn name(&self) -> &str;

    /// the metric value for one cell, `NaN` when there is no signal.
    fn score_cell(&self, cell: &HexCell) -> f64;
}

/// evaluates a scorer over every cell of the grid in parallel.
///
/// # Returns
///
/// one value per cell in grid order
pub fn score_grid(scorer: &dyn CellScorer, grid: &HexGrid) -> Result<Vec<f64>, EngineError> {
    map_grid(grid, scorer.name(), |cell| scorer.score_cell(cell))
}

/// maps a function over every cell of the grid in parallel, reporting
/// progress. results are collected in grid order.
pub fn map_grid<T, F>(grid: &HexGrid, desc: &str, f: F) -> Result<Vec<T>, EngineError>
where
    T: Send,
    F: Fn(&HexCell) -> T + Sync,
{
    let bar: Arc<Mutex<Bar>> = Arc::new(Mutex::new(
        BarBuilder::default()
            .desc(desc)
            .total(grid.len())
            .build()
            .map_err(EngineError::InternalError)?,
    ));
    let result = grid
        .cells()
        .par_iter()
        .map(|cell| {
            let value = f(cell);
            if let Ok(mut bar) = bar.clone().lock() {
                let _ = bar.update(1);
            }
            value
        })
        .collect::<Vec<_>>();
    eprintln!();
    Ok(result)
}
