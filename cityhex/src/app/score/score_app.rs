use super::{geojson_reader, score_writer, RunConfiguration};
use crate::{engine::ScoringEngine, EngineError};

/// reads a run configuration, scores the city and writes the score table.
///
/// # Arguments
///
/// * `configuration_file` - .toml or .json [`RunConfiguration`]
/// * `output_file`        - destination CSV file
pub fn run(configuration_file: &String, output_file: &str) -> Result<(), EngineError> {
    log::info!("reading run configuration from {configuration_file}");
    let config = RunConfiguration::try_from(configuration_file)?;
    let boundary = geojson_reader::read_boundary(&config.boundary_file)?;
    let layers = geojson_reader::read_layers(&config.layers)?;
    let engine = ScoringEngine::new(config.engine.clone())?;
    let result = engine.run(&boundary, &layers)?;
    score_writer::write_csv_file(&result.table, output_file, config.output_geometry)?;
    if !result.diagnostics.is_empty() {
        log::warn!("run completed with warnings, see above");
    }
    Ok(())
}
