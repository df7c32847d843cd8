mod gap;
mod gap_rule;
mod mismatch;
mod threshold;

pub use gap::{classify_gap, GapClassification};
pub use gap_rule::GapRule;
pub use mismatch::{classify_mismatch, hotspots, MismatchClassification};
pub use threshold::Threshold;
