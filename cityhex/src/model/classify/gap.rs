use super::GapRule;

/// per-row outcome of a gap classification.
#[derive(Debug, Clone, PartialEq)]
pub struct GapClassification {
    /// true where every rule fails
    pub gap: Vec<bool>,
    /// pass/fail per rule, in rule order
    pub coverage: Vec<Vec<bool>>,
}

/// flags rows that no rule covers. a row is covered when at least one rule
/// passes and underserved when all rules fail; `NaN` values fail.
///
/// # Arguments
///
/// * `rules`   - coverage criteria
/// * `columns` - the metric column for each rule, in rule order
///
/// # Returns
///
/// the gap flag column and one coverage flag column per rule
pub fn classify_gap(rules: &[GapRule], columns: &[Vec<f64>]) -> GapClassification {
    let n_rows = columns.first().map(|c| c.len()).unwrap_or_default();
    let coverage = rules
        .iter()
        .zip(columns.iter())
        .map(|(rule, column)| column.iter().map(|v| rule.passes(*v)).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let gap = (0..n_rows)
        .map(|row| !coverage.iter().any(|c| c.get(row).copied().unwrap_or(false)))
        .collect();
    GapClassification { gap, coverage }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::classify::Threshold;

    fn rule(metric: &str, threshold: Threshold) -> GapRule {
        GapRule {
            metric: metric.to_string(),
            threshold,
            coverage_flag: None,
        }
    }

    #[test]
    fn test_gap_is_all_rules_failing() {
        let rules = vec![
            rule("park_min", Threshold::AtMost(10.0)),
            rule("forest_min", Threshold::AtMost(15.0)),
        ];
        let park = vec![5.0, 20.0, f64::NAN, f64::NAN];
        let forest = vec![30.0, 12.0, 40.0, f64::NAN];
        let result = classify_gap(&rules, &[park, forest]);
        assert_eq!(result.gap, vec![false, false, true, true]);
        assert_eq!(result.coverage[0], vec![true, false, false, false]);
        assert_eq!(result.coverage[1], vec![false, true, false, false]);
    }

    #[test]
    fn test_at_least() {
        let rules = vec![rule("stops", Threshold::AtLeast(2.0))];
        let result = classify_gap(&rules, &[vec![1.0, 2.0, 3.0]]);
        assert_eq!(result.gap, vec![true, false, false]);
    }
}
