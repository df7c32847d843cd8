use serde::{Deserialize, Serialize};

fn default_candidates_k() -> usize {
    8
}

fn default_walking_speed() -> f64 {
    80.0
}

fn default_straight_line_radius() -> f64 {
    2000.0
}

fn default_barrier_threshold() -> f64 {
    1.4
}

/// ratio of network to straight-line distance for the route of a network access metric.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DetourConfig {
    pub name: String,
    /// when present, writes a flag marking cells whose detour is at least `threshold`
    #[serde(default)]
    pub barrier: Option<BarrierFlagConfig>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BarrierFlagConfig {
    pub name: String,
    #[serde(default = "default_barrier_threshold")]
    pub threshold: f64,
}

/// walking time metrics in minutes.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum AccessConfig {
    /// shortest path over the walk graph to the nearest of the `candidates_k`
    /// straight-line-nearest targets
    Network {
        name: String,
        targets: String,
        #[serde(default = "default_candidates_k")]
        candidates_k: usize,
        #[serde(default = "default_walking_speed")]
        walking_speed_m_per_min: f64,
        #[serde(default)]
        max_network_distance_m: Option<f64>,
        #[serde(default)]
        minutes_cap: Option<f64>,
        #[serde(default)]
        detour: Option<DetourConfig>,
    },
    /// straight-line distance to the nearest destination polygon
    StraightLine {
        name: String,
        layer: String,
        #[serde(default)]
        categories: Option<Vec<String>>,
        #[serde(default)]
        min_area_m2: f64,
        #[serde(default = "default_straight_line_radius")]
        max_radius_m: f64,
        #[serde(default = "default_walking_speed")]
        walking_speed_m_per_min: f64,
    },
}

impl AccessConfig {
    pub fn name(&self) -> &str {
        match self {
            AccessConfig::Network { name, .. } => name,
            AccessConfig::StraightLine { name, .. } => name,
        }
    }

    /// metric columns this access metric writes.
    pub fn output_metrics(&self) -> Vec<String> {
        match self {
            AccessConfig::Network { name, detour, .. } => {
                let mut out = vec![name.clone()];
                if let Some(d) = detour {
                    out.push(d.name.clone());
                }
                out
            }
            AccessConfig::StraightLine { name, .. } => vec![name.clone()],
        }
    }

    pub fn output_flags(&self) -> Vec<String> {
        match self {
            AccessConfig::Network {
                detour: Some(DetourConfig {
                    barrier: Some(b), ..
                }),
                ..
            } => vec![b.name.clone()],
            _ => vec![],
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            AccessConfig::Network {
                name,
                candidates_k,
                walking_speed_m_per_min,
                max_network_distance_m,
                minutes_cap,
                detour,
                ..
            } => {
                if *candidates_k < 1 {
                    return Err(format!("access '{name}': candidates_k must be >= 1"));
                }
                validate_positive(name, "walking_speed_m_per_min", *walking_speed_m_per_min)?;
                if let Some(d) = max_network_distance_m {
                    validate_positive(name, "max_network_distance_m", *d)?;
                }
                if let Some(c) = minutes_cap {
                    validate_positive(name, "minutes_cap", *c)?;
                }
                if let Some(BarrierFlagConfig { threshold, .. }) =
                    detour.as_ref().and_then(|d| d.barrier.as_ref())
                {
                    validate_positive(name, "barrier threshold", *threshold)?;
                }
                Ok(())
            }
            AccessConfig::StraightLine {
                name,
                min_area_m2,
                max_radius_m,
                walking_speed_m_per_min,
                ..
            } => {
                if !(min_area_m2.is_finite() && *min_area_m2 >= 0.0) {
                    return Err(format!(
                        "access '{name}': min_area_m2 must be non-negative, found {min_area_m2}"
                    ));
                }
                validate_positive(name, "max_radius_m", *max_radius_m)?;
                validate_positive(name, "walking_speed_m_per_min", *walking_speed_m_per_min)
            }
        }
    }
}

fn validate_positive(name: &str, field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("access '{name}': {field} must be positive, found {value}"))
    }
}
