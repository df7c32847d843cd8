pub mod highway;
mod passability_filter;

pub use highway::Highway;
pub use passability_filter::PassabilityFilter;
