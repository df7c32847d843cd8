/// weighted mean of component columns, skipping `NaN` components per row.
/// a row with no available component is `NaN`.
///
/// # Arguments
///
/// * `components` - (weight, column) pairs, every column in the same row order
///
/// # Returns
///
/// the composite column
pub fn weighted_mean(components: &[(f64, Vec<f64>)]) -> Vec<f64> {
    let n_rows = components.first().map(|(_, c)| c.len()).unwrap_or_default();
    (0..n_rows)
        .map(|row| {
            let (sum, weight) = components
                .iter()
                .filter_map(|(w, column)| column.get(row).map(|v| (*w, *v)))
                .filter(|(w, v)| !v.is_nan() && *w > 0.0)
                .fold((0.0, 0.0), |(sum, weight), (w, v)| (sum + w * v, weight + w));
            if weight > 0.0 {
                sum / weight
            } else {
                f64::NAN
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::weighted_mean;

    #[test]
    fn test_weighted_mean_skips_nan() {
        let components = vec![
            (3.0, vec![1.0, f64::NAN, f64::NAN]),
            (1.0, vec![5.0, 4.0, f64::NAN]),
        ];
        let out = weighted_mean(&components);
        assert_eq!(out[0], 2.0);
        assert_eq!(out[1], 4.0);
        assert!(out[2].is_nan());
    }
}
