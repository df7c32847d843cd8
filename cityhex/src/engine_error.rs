use cityhex_core::CoreError;
use cityhex_walk::WalkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid city boundary: {0}")]
    InvalidBoundary(String),
    #[error("invalid engine configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failure generating hex grid: {0}")]
    GridError(String),
    #[error("input layer '{0}' is not provided")]
    MissingLayer(String),
    #[error("score table has no column '{0}'")]
    MissingColumn(String),
    #[error("failure reading run configuration: {0}")]
    ConfigurationError(String),
    #[error("failure reading input file {0}: {1}")]
    InputError(String, String),
    #[error("failure writing output file {0}: {1}")]
    OutputError(String, String),
    #[error("failure building walk graph: {source}")]
    WalkError {
        #[from]
        source: WalkError,
    },
    #[error("invalid geometry: {source}")]
    CoreError {
        #[from]
        source: CoreError,
    },
    #[error("failure reading configuration: {source}")]
    StdIoError {
        #[from]
        source: std::io::Error,
    },
    #[error("failure decoding JSON: {source}")]
    SerdeJsonError {
        #[from]
        source: serde_json::Error,
    },
    #[error("{0}")]
    InternalError(String),
}
