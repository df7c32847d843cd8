mod component_filter;
mod search;

pub use component_filter::ComponentFilter;
pub use search::{bfs_undirected, connected_components, dijkstra_to_nearest, SearchResult};
