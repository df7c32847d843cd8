mod walk_graph_config;

pub use walk_graph_config::WalkGraphConfiguration;
