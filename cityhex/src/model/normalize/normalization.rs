use super::stats;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// widening applied to a degenerate quantile range
const DEGENERATE_RANGE_EPSILON: f64 = 1e-9;

fn default_scale() -> f64 {
    1.0
}

/// rescales a metric column. `NaN` values pass through untouched and are
/// ignored when computing column statistics.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Normalization {
    /// linear map of [min, max] onto [0, scale]. a constant column maps to scale / 2.
    MinMax {
        #[serde(default = "default_scale")]
        scale: f64,
    },
    /// value / max * scale. a non-positive maximum maps every value to 0.
    MaxRatio {
        #[serde(default = "default_scale")]
        scale: f64,
    },
    /// clips to the [lower, upper] quantiles then applies min-max.
    QuantileClip {
        lower: f64,
        upper: f64,
        #[serde(default = "default_scale")]
        scale: f64,
    },
    /// (value - mean) / std with the population standard deviation. a
    /// constant column maps to 0.
    ZScore,
    /// average-rank percentile in (0, 1].
    PercentileRank,
}

impl Display for Normalization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Normalization::MinMax { scale } => write!(f, "min_max(0..{scale})"),
            Normalization::MaxRatio { scale } => write!(f, "max_ratio(0..{scale})"),
            Normalization::QuantileClip {
                lower,
                upper,
                scale,
            } => write!(f, "quantile_clip({lower}, {upper}, 0..{scale})"),
            Normalization::ZScore => write!(f, "z_score"),
            Normalization::PercentileRank => write!(f, "percentile_rank"),
        }
    }
}

impl Normalization {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Normalization::MinMax { scale } | Normalization::MaxRatio { scale } => {
                validate_scale(*scale)
            }
            Normalization::QuantileClip {
                lower,
                upper,
                scale,
            } => {
                validate_scale(*scale)?;
                let valid = (0.0..=1.0).contains(lower) && (0.0..=1.0).contains(upper);
                if !valid || lower >= upper {
                    return Err(format!(
                        "quantile_clip requires 0 <= lower < upper <= 1, found lower={lower}, upper={upper}"
                    ));
                }
                Ok(())
            }
            Normalization::ZScore | Normalization::PercentileRank => Ok(()),
        }
    }

    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        match self {
            Normalization::MinMax { scale } => match stats::min_max(values) {
                None => values.to_vec(),
                Some((lo, hi)) => values
                    .iter()
                    .map(|v| {
                        if v.is_nan() {
                            *v
                        } else if hi > lo {
                            (v - lo) / (hi - lo) * scale
                        } else {
                            scale / 2.0
                        }
                    })
                    .collect(),
            },
            Normalization::MaxRatio { scale } => match stats::min_max(values) {
                None => values.to_vec(),
                Some((_, hi)) => values
                    .iter()
                    .map(|v| {
                        if v.is_nan() {
                            *v
                        } else if hi > 0.0 {
                            v / hi * scale
                        } else {
                            0.0
                        }
                    })
                    .collect(),
            },
            Normalization::QuantileClip {
                lower,
                upper,
                scale,
            } => {
                let (lo, hi) = match (stats::quantile(values, *lower), stats::quantile(values, *upper)) {
                    (Some(lo), Some(hi)) => (lo, hi),
                    _ => return values.to_vec(),
                };
                let hi = if hi <= lo {
                    lo + DEGENERATE_RANGE_EPSILON
                } else {
                    hi
                };
                values
                    .iter()
                    .map(|v| {
                        if v.is_nan() {
                            *v
                        } else {
                            (v.clamp(lo, hi) - lo) / (hi - lo) * scale
                        }
                    })
                    .collect()
            }
            Normalization::ZScore => match stats::mean_std(values) {
                None => values.to_vec(),
                Some((mean, std)) => values
                    .iter()
                    .map(|v| {
                        if v.is_nan() {
                            *v
                        } else if std > 0.0 {
                            (v - mean) / std
                        } else {
                            0.0
                        }
                    })
                    .collect(),
            },
            Normalization::PercentileRank => stats::percentile_rank(values),
        }
    }
}

fn validate_scale(scale: f64) -> Result<(), String> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(format!("normalization scale must be positive, found {scale}"))
    }
}
