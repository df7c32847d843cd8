pub mod composite;
mod normalization;
pub mod stats;

pub use normalization::Normalization;
