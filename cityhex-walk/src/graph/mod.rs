mod snapped_coord;
mod walk_graph;
mod walk_graph_summary;
mod walk_node_id;

pub use snapped_coord::SnappedCoord;
pub use walk_graph::WalkGraph;
pub use walk_graph_summary::WalkGraphSummary;
pub use walk_node_id::WalkNodeId;
