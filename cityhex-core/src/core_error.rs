use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("unsupported geometry type for {0}, found {1}")]
    UnsupportedGeometry(String, String),
    #[error("geometry is empty: {0}")]
    EmptyGeometry(String),
    #[error("geometry has zero area: {0}")]
    ZeroArea(String),
    #[error("geometry contains non-finite coordinates: {0}")]
    NonFiniteCoordinate(String),
    #[error("unable to compute centroid of {0}")]
    MissingCentroid(String),
    #[error("{0}")]
    InternalError(String),
}
