use crate::graph::WalkNodeId;
use cityhex_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("invalid walk graph configuration: {0}")]
    ConfigurationError(String),
    #[error("attempting to get node '{0}' not in graph")]
    GraphMissingNodeId(WalkNodeId),
    #[error("invalid target extraction parameters: {0}")]
    TargetExtractionError(String),
    #[error(transparent)]
    CoreError {
        #[from]
        source: CoreError,
    },
    #[error("{0}")]
    InternalError(String),
}
