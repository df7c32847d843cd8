use super::{
    AccessConfig, CompositeConfig, CoverageConfig, DemandConfig, DiversityConfig, GapConfig,
    GravityConfig, MismatchConfig, NormalizationConfig, TargetSetConfig,
};
use crate::{model::grid::GridConfig, EngineError};
use cityhex_walk::config::WalkGraphConfiguration;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// the kind of geometry an input layer holds.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Lines,
    Points,
    Polygons,
}

/// every parameter of a scoring run. per-city differences are expressed
/// here rather than in code.
///
/// stages run in a fixed order: scorers (gravity, coverage, diversity,
/// access), demand apportionment, normalizations, composites, mismatch, gaps.
/// a stage may only reference metrics written by an earlier stage or by an
/// earlier entry of its own list.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EngineConfig {
    pub grid: GridConfig,
    /// line layer the walk graph and polygon entrances are built from
    #[serde(default = "default_network_layer")]
    pub network_layer: String,
    #[serde(default)]
    pub walk_graph: WalkGraphConfiguration,
    #[serde(default)]
    pub gravity: Vec<GravityConfig>,
    #[serde(default)]
    pub coverage: Vec<CoverageConfig>,
    #[serde(default)]
    pub diversity: Vec<DiversityConfig>,
    #[serde(default)]
    pub target_sets: Vec<TargetSetConfig>,
    #[serde(default)]
    pub access: Vec<AccessConfig>,
    #[serde(default)]
    pub demand: Option<DemandConfig>,
    #[serde(default)]
    pub normalizations: Vec<NormalizationConfig>,
    #[serde(default)]
    pub composites: Vec<CompositeConfig>,
    #[serde(default)]
    pub mismatch: Vec<MismatchConfig>,
    #[serde(default)]
    pub gaps: Vec<GapConfig>,
}

fn default_network_layer() -> String {
    String::from("network")
}

impl EngineConfig {
    /// a configuration with only a grid, producing a table with no columns.
    pub fn new(grid: GridConfig) -> EngineConfig {
        EngineConfig {
            grid,
            network_layer: default_network_layer(),
            walk_graph: Default::default(),
            gravity: vec![],
            coverage: vec![],
            diversity: vec![],
            target_sets: vec![],
            access: vec![],
            demand: None,
            normalizations: vec![],
            composites: vec![],
            mismatch: vec![],
            gaps: vec![],
        }
    }

    /// rejects out-of-range parameters, duplicate output columns and
    /// references to metrics that are not written before they are read.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.validate_parameters()
            .and_then(|_| self.validate_columns())
            .map_err(EngineError::InvalidConfiguration)
    }

    /// true when any metric requires the walk graph.
    pub fn requires_walk_graph(&self) -> bool {
        self.access
            .iter()
            .any(|a| matches!(a, AccessConfig::Network { .. }))
    }

    /// input layers referenced by this configuration along with their kind.
    pub fn referenced_layers(&self) -> Vec<(String, LayerKind)> {
        let mut out: Vec<(String, LayerKind)> = vec![];
        if self.requires_walk_graph() {
            out.push((self.network_layer.clone(), LayerKind::Lines));
        }
        out.extend(self.gravity.iter().map(|g| (g.layer.clone(), LayerKind::Points)));
        out.extend(self.coverage.iter().map(|c| (c.layer.clone(), LayerKind::Points)));
        out.extend(self.diversity.iter().map(|d| (d.layer.clone(), LayerKind::Points)));
        for t in self.target_sets.iter() {
            let kind = match t {
                TargetSetConfig::PolygonEntrances { .. } => LayerKind::Polygons,
                TargetSetConfig::PointLayer { .. } => LayerKind::Points,
            };
            out.push((t.layer().to_string(), kind));
        }
        for a in self.access.iter() {
            if let AccessConfig::StraightLine { layer, .. } = a {
                out.push((layer.clone(), LayerKind::Polygons));
            }
        }
        if let Some(d) = &self.demand {
            out.push((d.layer.clone(), LayerKind::Polygons));
        }
        out.sort();
        out.dedup();
        out
    }

    fn validate_parameters(&self) -> Result<(), String> {
        self.grid.validate()?;
        self.walk_graph.validate().map_err(|e| e.to_string())?;
        for g in self.gravity.iter() {
            g.validate()?;
        }
        for c in self.coverage.iter() {
            c.validate()?;
        }
        for d in self.diversity.iter() {
            d.validate()?;
        }
        for t in self.target_sets.iter() {
            t.validate()?;
        }
        for a in self.access.iter() {
            a.validate()?;
        }
        for n in self.normalizations.iter() {
            n.method
                .validate()
                .map_err(|e| format!("normalization '{}': {e}", n.name))?;
        }
        for c in self.composites.iter() {
            c.validate()?;
        }
        for m in self.mismatch.iter() {
            m.validate()?;
        }
        for g in self.gaps.iter() {
            g.validate()?;
        }
        Ok(())
    }

    fn validate_columns(&self) -> Result<(), String> {
        let mut target_sets: HashSet<&str> = HashSet::new();
        for t in self.target_sets.iter() {
            if !target_sets.insert(t.name()) {
                return Err(format!("target set '{}' is defined twice", t.name()));
            }
        }
        for a in self.access.iter() {
            if let AccessConfig::Network { name, targets, .. } = a {
                if !target_sets.contains(targets.as_str()) {
                    return Err(format!(
                        "access '{name}' references unknown target set '{targets}'"
                    ));
                }
            }
        }

        let mut columns = ColumnLedger::default();
        for g in self.gravity.iter() {
            columns.write_metric(&g.name)?;
            if let Some(n) = g.normalized_name() {
                columns.write_metric(&n)?;
            }
        }
        for c in self.coverage.iter() {
            columns.write_metric(&c.name)?;
            if let Some(n) = c.normalized_name() {
                columns.write_metric(&n)?;
            }
        }
        for d in self.diversity.iter() {
            columns.write_metric(&d.name)?;
        }
        for a in self.access.iter() {
            for m in a.output_metrics() {
                columns.write_metric(&m)?;
            }
            for f in a.output_flags() {
                columns.write_flag(&f)?;
            }
        }
        if let Some(d) = &self.demand {
            for m in d.output_metrics() {
                columns.write_metric(&m)?;
            }
        }
        for n in self.normalizations.iter() {
            columns.read_metric(&n.metric, &n.name)?;
            columns.write_metric(&n.name)?;
        }
        for c in self.composites.iter() {
            for component in c.components.iter() {
                columns.read_metric(&component.metric, &c.name)?;
            }
            for m in c.output_metrics() {
                columns.write_metric(&m)?;
            }
        }
        for m in self.mismatch.iter() {
            columns.read_metric(&m.demand, &m.name)?;
            columns.read_metric(&m.supply, &m.name)?;
            for out in m.output_metrics() {
                columns.write_metric(&out)?;
            }
            if let Some(h) = &m.hotspot {
                columns.write_flag(&h.name)?;
            }
        }
        for g in self.gaps.iter() {
            for rule in g.rules.iter() {
                columns.read_metric(&rule.metric, &g.name)?;
            }
            for f in g.output_flags() {
                columns.write_flag(&f)?;
            }
        }
        Ok(())
    }
}

/// tracks which columns have been written while walking the stages in order.
#[derive(Default)]
struct ColumnLedger {
    metrics: HashSet<String>,
    flags: HashSet<String>,
}

impl ColumnLedger {
    fn write_metric(&mut self, name: &str) -> Result<(), String> {
        if self.metrics.contains(name) || self.flags.contains(name) {
            return Err(format!("output column '{name}' is written twice"));
        }
        self.metrics.insert(name.to_string());
        Ok(())
    }

    fn write_flag(&mut self, name: &str) -> Result<(), String> {
        if self.metrics.contains(name) || self.flags.contains(name) {
            return Err(format!("output column '{name}' is written twice"));
        }
        self.flags.insert(name.to_string());
        Ok(())
    }

    fn read_metric(&self, name: &str, reader: &str) -> Result<(), String> {
        if self.metrics.contains(name) {
            Ok(())
        } else {
            Err(format!(
                "'{reader}' reads metric '{name}' which is not written by an earlier stage"
            ))
        }
    }
}

impl TryFrom<&String> for EngineConfig {
    type Error = EngineError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        let config: EngineConfig = super::read_config_file(f)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
        [grid]
        resolution = 8
        containment = "intersects_boundary"
        projection = { type = "utm", zone = 32, hemisphere = "north" }

        [[gravity]]
        name = "pt_gravity"
        layer = "transit"
        weights = { "S-Bahn" = 3.0, "U-Bahn" = 2.5, "Tram" = 2.0, "Bus" = 1.0 }

        [[target_sets]]
        type = "polygon_entrances"
        name = "parks"
        layer = "green"
        categories = ["park"]
        min_area_m2 = 10000.0

        [[access]]
        type = "network"
        name = "park_access_min"
        targets = "parks"

        [[gaps]]
        name = "green_gap"
        rules = [ { metric = "park_access_min", threshold = { at_most = 10.0 }, coverage_flag = "cov_park_10" } ]
    "#;

    #[test]
    fn test_deserialize_and_validate() {
        let config: EngineConfig = toml::from_str(EXAMPLE).expect("example parses");
        config.validate().expect("example is valid");
        assert_eq!(config.gravity[0].default_weight, 0.5);
        assert_eq!(config.gravity[0].distance_floor_m, 50.0);
        match &config.access[0] {
            AccessConfig::Network {
                candidates_k,
                walking_speed_m_per_min,
                ..
            } => {
                assert_eq!(*candidates_k, 8);
                assert_eq!(*walking_speed_m_per_min, 80.0);
            }
            other => panic!("expected network access, found {other:?}"),
        }
        assert!(config.requires_walk_graph());
        let layers = config.referenced_layers();
        assert!(layers.contains(&(String::from("network"), LayerKind::Lines)));
        assert!(layers.contains(&(String::from("green"), LayerKind::Polygons)));
    }

    #[test]
    fn test_reading_unwritten_metric_rejected() {
        let mut config: EngineConfig = toml::from_str(EXAMPLE).expect("example parses");
        config.gaps[0].rules[0].metric = String::from("forest_access_min");
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut config: EngineConfig = toml::from_str(EXAMPLE).expect("example parses");
        config.gravity[0].name = String::from("park_access_min");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut config: EngineConfig = toml::from_str(EXAMPLE).expect("example parses");
        config.gravity[0].distance_floor_m = 0.0;
        assert!(config.validate().is_err());

        let mut config: EngineConfig = toml::from_str(EXAMPLE).expect("example parses");
        if let AccessConfig::Network { candidates_k, .. } = &mut config.access[0] {
            *candidates_k = 0;
        }
        assert!(config.validate().is_err());

        let mut config: EngineConfig = toml::from_str(EXAMPLE).expect("example parses");
        config.grid.resolution = 16;
        assert!(config.validate().is_err());
    }
}
