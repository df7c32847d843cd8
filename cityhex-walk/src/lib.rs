pub mod algorithm;
pub mod config;
pub mod graph;
pub mod model;
pub mod target;
mod walk_error;

pub use walk_error::WalkError;
