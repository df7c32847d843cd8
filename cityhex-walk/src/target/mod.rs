mod segment_index;
mod target_extraction;
mod target_extraction_config;

pub use segment_index::SegmentIndex;
pub use target_extraction::{extract_polygon_targets, point_targets, TargetExtraction};
pub use target_extraction_config::TargetExtractionConfig;
