use serde::{Deserialize, Serialize};

/// percentile-rank difference between a demand metric and a supply metric.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MismatchConfig {
    pub name: String,
    pub demand: String,
    pub supply: String,
    /// when true, also writes `<name>_demand_rank` and `<name>_supply_rank`
    #[serde(default)]
    pub write_ranks: bool,
    #[serde(default)]
    pub hotspot: Option<HotspotConfig>,
}

/// flags cells whose mismatch is at least the given quantile.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HotspotConfig {
    pub name: String,
    pub quantile: f64,
}

impl MismatchConfig {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(h) = &self.hotspot {
            if !(0.0..=1.0).contains(&h.quantile) {
                return Err(format!(
                    "mismatch '{}': hotspot quantile must be in [0, 1], found {}",
                    self.name, h.quantile
                ));
            }
        }
        Ok(())
    }

    pub fn demand_rank_name(&self) -> String {
        format!("{}_demand_rank", self.name)
    }

    pub fn supply_rank_name(&self) -> String {
        format!("{}_supply_rank", self.name)
    }

    pub fn output_metrics(&self) -> Vec<String> {
        let mut out = vec![self.name.clone()];
        if self.write_ranks {
            out.push(self.demand_rank_name());
            out.push(self.supply_rank_name());
        }
        out
    }
}
