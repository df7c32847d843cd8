use crate::model::table::ScoreTable;
use cityhex_core::diagnostics::Diagnostics;
use cityhex_walk::graph::WalkGraphSummary;

/// the outcome of a scoring run: one record per grid cell plus the
/// non-fatal conditions observed along the way.
#[derive(Debug, Clone)]
pub struct ScoreRun {
    pub table: ScoreTable,
    pub diagnostics: Diagnostics,
    /// present when a walk graph was built
    pub walk_graph: Option<WalkGraphSummary>,
}
