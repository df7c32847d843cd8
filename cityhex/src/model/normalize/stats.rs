//! column statistics that ignore `NaN` values.

use itertools::Itertools;

/// finite-or-infinite values of a column, `NaN` removed, sorted ascending.
fn sorted_valid(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .sorted_by(|a, b| a.total_cmp(b))
        .collect_vec()
}

pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let valid = sorted_valid(values);
    match (valid.first(), valid.last()) {
        (Some(lo), Some(hi)) => Some((*lo, *hi)),
        _ => None,
    }
}

/// mean and population standard deviation, `None` for a column with no
/// valid values.
pub fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    let valid = values.iter().copied().filter(|v| !v.is_nan()).collect_vec();
    if valid.is_empty() {
        return None;
    }
    let n = valid.len() as f64;
    let mean = valid.iter().sum::<f64>() / n;
    let var = valid.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, var.sqrt()))
}

/// quantile with linear interpolation between closest ranks, `None` for a
/// column with no valid values.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let valid = sorted_valid(values);
    quantile_sorted(&valid, q)
}

fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// percentile ranks in (0, 1] using the average rank of ties divided by the
/// count of valid values. `NaN` stays `NaN`.
pub fn percentile_rank(values: &[f64]) -> Vec<f64> {
    let order = values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .sorted_by(|(_, a), (_, b)| a.total_cmp(b))
        .collect_vec();
    let n = order.len() as f64;
    let mut out = vec![f64::NAN; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && order[end + 1].1 == order[start].1 {
            end += 1;
        }
        // ranks are 1-based, ties share the mean of their ranks
        let avg_rank = (start + end) as f64 / 2.0 + 1.0;
        for (idx, _) in order[start..=end].iter() {
            out[*idx] = avg_rank / n;
        }
        start = end + 1;
    }
    out
}

/// descending rank, 1 = highest value, ties share the lowest rank of their
/// group. `NaN` stays `NaN`.
pub fn rank_descending_min(values: &[f64]) -> Vec<f64> {
    let order = values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .sorted_by(|(_, a), (_, b)| b.total_cmp(a))
        .collect_vec();
    let mut out = vec![f64::NAN; values.len()];
    let mut group_rank = 1;
    for (pos, (idx, value)) in order.iter().enumerate() {
        if pos > 0 && order[pos - 1].1 != *value {
            group_rank = pos + 1;
        }
        out[*idx] = group_rank as f64;
    }
    out
}
