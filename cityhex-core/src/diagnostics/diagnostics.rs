use super::{DegenerateKind, ScoringWarning};
use itertools::Itertools;
use std::collections::BTreeMap;

/// ledger of the non-fatal conditions observed during a run. warnings are
/// aggregated into counts so that a noisy layer is reported once instead of
/// once per cell.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    empty_layers: BTreeMap<String, String>,
    unreachable: BTreeMap<String, usize>,
    degenerate: BTreeMap<DegenerateKind, usize>,
}

impl Diagnostics {
    pub fn record(&mut self, warning: ScoringWarning) {
        log::debug!("{warning}");
        match warning {
            ScoringWarning::EmptyLayer { layer, metric } => {
                self.empty_layers.insert(metric, layer);
            }
            ScoringWarning::UnreachableTarget { metric, .. } => {
                *self.unreachable.entry(metric).or_default() += 1;
            }
            ScoringWarning::DegenerateGeometry { kind, .. } => {
                *self.degenerate.entry(kind).or_default() += 1;
            }
        }
    }

    /// adds `count` unreachable cells for a metric without per-cell records.
    pub fn record_unreachable(&mut self, metric: &str, count: usize) {
        if count > 0 {
            *self.unreachable.entry(metric.to_string()).or_default() += count;
        }
    }

    pub fn record_degenerate(&mut self, kind: DegenerateKind, count: usize) {
        if count > 0 {
            *self.degenerate.entry(kind).or_default() += count;
        }
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.empty_layers.extend(other.empty_layers);
        for (k, v) in other.unreachable {
            *self.unreachable.entry(k).or_default() += v;
        }
        for (k, v) in other.degenerate {
            *self.degenerate.entry(k).or_default() += v;
        }
    }

    pub fn empty_layer_metrics(&self) -> Vec<&str> {
        self.empty_layers.keys().map(|s| s.as_str()).collect_vec()
    }

    pub fn unreachable_count(&self, metric: &str) -> usize {
        self.unreachable.get(metric).copied().unwrap_or_default()
    }

    pub fn degenerate_count(&self, kind: DegenerateKind) -> usize {
        self.degenerate.get(&kind).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.empty_layers.is_empty() && self.unreachable.is_empty() && self.degenerate.is_empty()
    }

    /// writes one warning line per aggregated condition.
    pub fn log_summary(&self) {
        for (metric, layer) in self.empty_layers.iter() {
            log::warn!("metric '{metric}' has no signal: input layer '{layer}' is empty");
        }
        for (metric, count) in self.unreachable.iter() {
            log::warn!("metric '{metric}': {count} cells have no reachable target");
        }
        for (kind, count) in self.degenerate.iter() {
            log::warn!("dropped {count} inputs as {kind}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_aggregate() {
        let mut d = Diagnostics::default();
        d.record(ScoringWarning::UnreachableTarget {
            metric: String::from("park_access_min"),
            cell: String::from("a"),
        });
        d.record_unreachable("park_access_min", 2);
        d.record_degenerate(DegenerateKind::ZeroLengthEdge, 0);
        let mut other = Diagnostics::default();
        other.record(ScoringWarning::DegenerateGeometry {
            kind: DegenerateKind::ZeroLengthEdge,
            detail: String::from("edge at (0, 0)"),
        });
        d.merge(other);
        assert_eq!(d.unreachable_count("park_access_min"), 3);
        assert_eq!(d.degenerate_count(DegenerateKind::ZeroLengthEdge), 1);
        assert_eq!(d.degenerate_count(DegenerateKind::EmptyFeature), 0);
        assert!(!d.is_empty());
    }
}
