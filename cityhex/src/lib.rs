pub mod app;
pub mod config;
pub mod engine;
mod engine_error;
pub mod model;

pub use engine_error::EngineError;
