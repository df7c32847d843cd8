mod input_layers;
mod score_run;
mod scoring_engine;

pub use input_layers::InputLayers;
pub use score_run::ScoreRun;
pub use scoring_engine::ScoringEngine;
