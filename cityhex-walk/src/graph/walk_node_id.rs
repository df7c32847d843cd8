use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// index of a node in a [`super::WalkGraph`]. ids are dense, starting at zero,
/// and assigned in insertion order.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Deserialize, Serialize, Hash,
)]
pub struct WalkNodeId(pub usize);

impl Display for WalkNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
