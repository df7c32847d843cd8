use super::{InputLayers, ScoreRun};
use crate::{
    config::{AccessConfig, CoverageConfig, EngineConfig, GravityConfig, TargetSetConfig},
    model::{
        classify, demand,
        grid::HexGrid,
        normalize::{composite, stats},
        scorer::{self, CellScorer, NetworkAccessParams, NetworkAccessScorer},
        table::ScoreTable,
    },
    EngineError,
};
use cityhex_core::{
    diagnostics::{DegenerateKind, Diagnostics, ScoringWarning},
    model::{PolygonFeature, TargetPoint},
};
use cityhex_walk::{
    graph::{WalkGraph, WalkGraphSummary},
    target::{self, SegmentIndex},
};
use geo::Geometry;
use std::collections::{BTreeMap, HashSet};

/// scores a city over a hexagonal grid. a single engine is parameterized by
/// its [`EngineConfig`]; per-city differences live entirely in configuration.
pub struct ScoringEngine {
    config: EngineConfig,
}

impl ScoringEngine {
    /// validates the configuration up front so a run never starts with
    /// parameters it would reject halfway through.
    pub fn new(config: EngineConfig) -> Result<ScoringEngine, EngineError> {
        config.validate()?;
        Ok(ScoringEngine { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// runs every configured stage over the grid covering `boundary`.
    ///
    /// # Arguments
    ///
    /// * `boundary` - WGS84 city boundary
    /// * `layers`   - input layers, already in the configured metric CRS
    ///
    /// # Returns
    ///
    /// a table with one record per grid cell and the diagnostics of the run
    pub fn run(&self, boundary: &Geometry<f64>, layers: &InputLayers) -> Result<ScoreRun, EngineError> {
        let grid = HexGrid::build(boundary, &self.config.grid)?;
        let mut table = ScoreTable::from_grid(&grid);
        let mut diagnostics = Diagnostics::default();

        for g in self.config.gravity.iter() {
            self.score_gravity(g, &grid, layers, &mut table, &mut diagnostics)?;
        }
        for c in self.config.coverage.iter() {
            self.score_coverage(c, &grid, layers, &mut table, &mut diagnostics)?;
        }
        for d in self.config.diversity.iter() {
            let points = layers.points(&d.layer);
            let values = if points.is_empty() {
                record_empty_layer(&mut diagnostics, &d.layer, &d.name);
                vec![f64::NAN; grid.len()]
            } else {
                let s = scorer::DiversityScorer::new(d, points);
                scorer::score_grid(&s, &grid)?
            };
            table.set_metric_column(&d.name, values)?;
        }

        let mut walk_graph: Option<WalkGraphSummary> = None;
        if !self.config.access.is_empty() {
            let graph = if self.config.requires_walk_graph() {
                let (graph, summary) = self.build_walk_graph(layers, &mut diagnostics)?;
                walk_graph = Some(summary);
                graph
            } else {
                WalkGraph::empty()
            };
            let target_sets = self.build_target_sets(layers, &mut diagnostics)?;
            for a in self.config.access.iter() {
                self.score_access(a, &grid, &graph, &target_sets, layers, &mut table, &mut diagnostics)?;
            }
        }

        if let Some(d) = &self.config.demand {
            let polygons = layers.polygons(&d.layer);
            let (totals, densities) = if polygons.is_empty() {
                record_empty_layer(&mut diagnostics, &d.layer, &d.name);
                (vec![f64::NAN; grid.len()], vec![f64::NAN; grid.len()])
            } else {
                let result = demand::apportion(&grid, polygons)?;
                diagnostics.record_degenerate(DegenerateKind::EmptyFeature, result.skipped);
                (result.totals, result.densities)
            };
            table.set_metric_column(&d.name, totals)?;
            if let Some(density_name) = &d.density_name {
                table.set_metric_column(density_name, densities)?;
            }
        }

        self.aggregate(&mut table)?;
        self.classify(&mut table)?;

        diagnostics.log_summary();
        log::info!(
            "scored {} cells with {} metric and {} flag columns",
            table.len(),
            table.metric_names().len(),
            table.flag_names().len()
        );
        Ok(ScoreRun {
            table,
            diagnostics,
            walk_graph,
        })
    }

    fn score_gravity(
        &self,
        config: &GravityConfig,
        grid: &HexGrid,
        layers: &InputLayers,
        table: &mut ScoreTable,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), EngineError> {
        let points = layers.points(&config.layer);
        let values = if points.is_empty() {
            record_empty_layer(diagnostics, &config.layer, &config.name);
            vec![f64::NAN; grid.len()]
        } else {
            let s = scorer::GravityScorer::new(config, points);
            scorer::score_grid(&s, grid)?
        };
        let normalized = config.normalization.as_ref().map(|n| n.apply(&values));
        table.set_metric_column(&config.name, values)?;
        if let (Some(values), Some(name)) = (normalized, config.normalized_name()) {
            table.set_metric_column(&name, values)?;
        }
        Ok(())
    }

    fn score_coverage(
        &self,
        config: &CoverageConfig,
        grid: &HexGrid,
        layers: &InputLayers,
        table: &mut ScoreTable,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), EngineError> {
        let points = layers.points(&config.layer);
        let values = if points.is_empty() {
            record_empty_layer(diagnostics, &config.layer, &config.name);
            vec![f64::NAN; grid.len()]
        } else {
            let s = scorer::CoverageScorer::new(config, points);
            scorer::score_grid(&s, grid)?
        };
        let normalized = config.normalization.as_ref().map(|n| n.apply(&values));
        table.set_metric_column(&config.name, values)?;
        if let (Some(values), Some(name)) = (normalized, config.normalized_name()) {
            table.set_metric_column(&name, values)?;
        }
        Ok(())
    }

    fn build_walk_graph(
        &self,
        layers: &InputLayers,
        diagnostics: &mut Diagnostics,
    ) -> Result<(WalkGraph, WalkGraphSummary), EngineError> {
        let lines = layers.lines(&self.config.network_layer);
        let (graph, summary) = WalkGraph::build(lines, &self.config.walk_graph)?;
        diagnostics.record_degenerate(DegenerateKind::ZeroLengthEdge, summary.zero_length_segments);
        diagnostics.record_degenerate(DegenerateKind::EmptyFeature, summary.empty_features);
        diagnostics.record_degenerate(
            DegenerateKind::NonFiniteCoordinate,
            summary.non_finite_segments,
        );
        if graph.is_empty() {
            log::warn!(
                "walk graph built from layer '{}' has no nodes, network access carries no signal",
                self.config.network_layer
            );
        }
        Ok((graph, summary))
    }

    /// derives every configured target set, keyed by name.
    fn build_target_sets(
        &self,
        layers: &InputLayers,
        diagnostics: &mut Diagnostics,
    ) -> Result<BTreeMap<String, Vec<TargetPoint>>, EngineError> {
        let needs_segments = self
            .config
            .target_sets
            .iter()
            .any(|t| matches!(t, TargetSetConfig::PolygonEntrances { .. }));
        let segments = if needs_segments {
            SegmentIndex::new(
                layers.lines(&self.config.network_layer),
                &self.config.walk_graph.passability_filter,
            )
        } else {
            SegmentIndex::new(&[], &self.config.walk_graph.passability_filter)
        };

        let mut out = BTreeMap::new();
        for t in self.config.target_sets.iter() {
            let categories: Option<HashSet<String>> =
                t.categories().map(|c| c.iter().cloned().collect());
            let targets = match t.extraction_config() {
                Some(extraction) => {
                    let destinations = filter_categories(layers.polygons(t.layer()), categories.as_ref())
                        .cloned()
                        .collect::<Vec<_>>();
                    let result = target::extract_polygon_targets(&destinations, &segments, &extraction)?;
                    diagnostics.record_degenerate(DegenerateKind::ZeroAreaPolygon, result.polygons_zero_area);
                    result.targets
                }
                None => target::point_targets(layers.points(t.layer()), categories.as_ref()),
            };
            log::info!("target set '{}' has {} targets", t.name(), targets.len());
            out.insert(t.name().to_string(), targets);
        }
        Ok(out)
    }

    #[allow(clippy::too_many_arguments)]
    fn score_access(
        &self,
        config: &AccessConfig,
        grid: &HexGrid,
        graph: &WalkGraph,
        target_sets: &BTreeMap<String, Vec<TargetPoint>>,
        layers: &InputLayers,
        table: &mut ScoreTable,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), EngineError> {
        match config {
            AccessConfig::Network {
                name,
                targets,
                candidates_k,
                walking_speed_m_per_min,
                max_network_distance_m,
                minutes_cap,
                detour,
            } => {
                let target_points = target_sets.get(targets).ok_or_else(|| {
                    EngineError::InvalidConfiguration(format!(
                        "access '{name}' references unknown target set '{targets}'"
                    ))
                })?;
                let params = NetworkAccessParams {
                    candidates_k: *candidates_k,
                    walking_speed_m_per_min: *walking_speed_m_per_min,
                    max_network_distance_m: *max_network_distance_m,
                    minutes_cap: *minutes_cap,
                };
                let s = NetworkAccessScorer::new(name, graph, target_points, params)?;
                if target_points.is_empty() {
                    record_empty_layer(diagnostics, targets, name);
                } else if graph.is_empty() {
                    record_empty_layer(diagnostics, &self.config.network_layer, name);
                }

                let routes = scorer::map_grid(grid, name, |cell| match s.route(cell) {
                    Ok(route) => route,
                    Err(e) => {
                        log::debug!("access '{name}': routing cell {} failed: {e}", cell.id());
                        None
                    }
                })?;
                if !s.is_degenerate() {
                    let unreachable = routes.iter().filter(|r| r.is_none()).count();
                    diagnostics.record_unreachable(name, unreachable);
                }

                let minutes = routes.iter().map(|r| s.minutes(r.as_ref())).collect();
                table.set_metric_column(name, minutes)?;
                if let Some(d) = detour {
                    let factors = routes
                        .iter()
                        .map(|r| r.map(|r| r.detour_factor()).unwrap_or(f64::NAN))
                        .collect::<Vec<_>>();
                    // NaN compares false, so unreachable cells are never barriers
                    let barriers = d
                        .barrier
                        .as_ref()
                        .map(|b| factors.iter().map(|f| *f >= b.threshold).collect::<Vec<_>>());
                    table.set_metric_column(&d.name, factors)?;
                    if let (Some(b), Some(flags)) = (&d.barrier, barriers) {
                        table.set_flag_column(&b.name, flags)?;
                    }
                }
                Ok(())
            }
            AccessConfig::StraightLine {
                name,
                layer,
                categories,
                min_area_m2,
                max_radius_m,
                walking_speed_m_per_min,
            } => {
                let categories: Option<HashSet<String>> =
                    categories.as_ref().map(|c| c.iter().cloned().collect());
                let mut zero_area = 0;
                let destinations = filter_categories(layers.polygons(layer), categories.as_ref())
                    .filter(|p| {
                        let area = p.area_m2();
                        if area.is_nan() || area <= 0.0 {
                            zero_area += 1;
                            false
                        } else {
                            area >= *min_area_m2
                        }
                    })
                    .collect::<Vec<_>>();
                diagnostics.record_degenerate(DegenerateKind::ZeroAreaPolygon, zero_area);
                let s = scorer::StraightLineAccessScorer::new(
                    name,
                    destinations,
                    *max_radius_m,
                    *walking_speed_m_per_min,
                );
                if s.is_empty() {
                    record_empty_layer(diagnostics, layer, name);
                }
                table.set_metric_column(s.name(), scorer::score_grid(&s, grid)?)
            }
        }
    }

    /// normalizations followed by composites, in configuration order.
    fn aggregate(&self, table: &mut ScoreTable) -> Result<(), EngineError> {
        for n in self.config.normalizations.iter() {
            let column = table.metric_column(&n.metric)?;
            table.set_metric_column(&n.name, n.method.apply(&column))?;
        }
        for c in self.config.composites.iter() {
            let components = c
                .components
                .iter()
                .map(|component| {
                    let column = table.metric_column(&component.metric)?;
                    let column = match &component.normalization {
                        Some(n) => n.apply(&column),
                        None => column,
                    };
                    Ok((component.weight, column))
                })
                .collect::<Result<Vec<_>, EngineError>>()?;
            let values = composite::weighted_mean(&components);
            let ranks = stats::rank_descending_min(&values);
            table.set_metric_column(&c.name, values)?;
            if let Some(rank) = &c.rank {
                table.set_metric_column(rank, ranks)?;
            }
        }
        Ok(())
    }

    /// mismatch followed by gap classification, in configuration order.
    fn classify(&self, table: &mut ScoreTable) -> Result<(), EngineError> {
        for m in self.config.mismatch.iter() {
            let demand = table.metric_column(&m.demand)?;
            let supply = table.metric_column(&m.supply)?;
            let result = classify::classify_mismatch(&demand, &supply);
            if let Some(h) = &m.hotspot {
                table.set_flag_column(&h.name, classify::hotspots(&result.mismatch, h.quantile))?;
            }
            table.set_metric_column(&m.name, result.mismatch)?;
            if m.write_ranks {
                table.set_metric_column(&m.demand_rank_name(), result.demand_rank)?;
                table.set_metric_column(&m.supply_rank_name(), result.supply_rank)?;
            }
        }
        for g in self.config.gaps.iter() {
            let columns = g
                .rules
                .iter()
                .map(|r| table.metric_column(&r.metric))
                .collect::<Result<Vec<_>, _>>()?;
            let result = classify::classify_gap(&g.rules, &columns);
            table.set_flag_column(&g.name, result.gap)?;
            for (rule, coverage) in g.rules.iter().zip(result.coverage) {
                if let Some(flag) = &rule.coverage_flag {
                    table.set_flag_column(flag, coverage)?;
                }
            }
        }
        Ok(())
    }
}

fn record_empty_layer(diagnostics: &mut Diagnostics, layer: &str, metric: &str) {
    diagnostics.record(ScoringWarning::EmptyLayer {
        layer: layer.to_string(),
        metric: metric.to_string(),
    });
}

fn filter_categories<'a>(
    polygons: &'a [PolygonFeature],
    categories: Option<&'a HashSet<String>>,
) -> impl Iterator<Item = &'a PolygonFeature> + 'a {
    polygons.iter().filter(move |p| match categories {
        Some(c) => c.contains(&p.category),
        None => true,
    })
}
