mod category_rule;
pub mod geojson_reader;
mod layer_source;
mod output_geometry_format;
mod run_configuration;
mod score_app;
pub mod score_writer;

pub use category_rule::{CategoryRule, MatchRule};
pub use layer_source::LayerSource;
pub use output_geometry_format::OutputGeometryFormat;
pub use run_configuration::RunConfiguration;
pub use score_app::run;
