#[allow(clippy::module_inception)]
mod diagnostics;
mod scoring_warning;

pub use diagnostics::Diagnostics;
pub use scoring_warning::{DegenerateKind, ScoringWarning};
