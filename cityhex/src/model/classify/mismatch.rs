use crate::model::normalize::stats;

/// supply/demand mismatch of each row.
#[derive(Debug, Clone, PartialEq)]
pub struct MismatchClassification {
    pub demand_rank: Vec<f64>,
    pub supply_rank: Vec<f64>,
    /// rank(demand) - rank(supply), `NaN` when either input is `NaN`
    pub mismatch: Vec<f64>,
}

/// compares the percentile ranks of demand and supply. positive values mark
/// rows with more demand than their supply would suggest.
pub fn classify_mismatch(demand: &[f64], supply: &[f64]) -> MismatchClassification {
    let demand_rank = stats::percentile_rank(demand);
    let supply_rank = stats::percentile_rank(supply);
    let mismatch = demand_rank
        .iter()
        .zip(supply_rank.iter())
        .map(|(d, s)| if d.is_nan() || s.is_nan() { f64::NAN } else { d - s })
        .collect();
    MismatchClassification {
        demand_rank,
        supply_rank,
        mismatch,
    }
}

/// flags rows whose mismatch is at least the given quantile of the valid
/// mismatch values. `NaN` rows are never hotspots.
pub fn hotspots(mismatch: &[f64], quantile: f64) -> Vec<bool> {
    match stats::quantile(mismatch, quantile) {
        None => vec![false; mismatch.len()],
        Some(q) => mismatch.iter().map(|m| !m.is_nan() && *m >= q).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_antisymmetric() {
        let a = vec![1.0, 5.0, 3.0, f64::NAN, 2.0];
        let b = vec![4.0, 4.0, 1.0, 2.0, 9.0];
        let ab = classify_mismatch(&a, &b).mismatch;
        let ba = classify_mismatch(&b, &a).mismatch;
        for (x, y) in ab.iter().zip(ba.iter()) {
            if x.is_nan() {
                assert!(y.is_nan());
            } else {
                assert_eq!(*x, -*y);
            }
        }
        assert!(ab[3].is_nan());
    }

    #[test]
    fn test_hotspots() {
        let m = vec![-0.5, 0.0, 0.1, 0.4, 0.6, f64::NAN];
        let flags = hotspots(&m, 0.8);
        // quantile(0.8) of the 5 valid values is 0.44
        assert_eq!(flags, vec![false, false, false, false, true, false]);
        let all = hotspots(&m, 0.0);
        assert_eq!(all, vec![true, true, true, true, true, false]);
    }
}
