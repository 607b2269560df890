//! Application state for the web layer.

use std::sync::Arc;

use crate::graph::Graph;
use crate::planner::SearchConfig;

/// Shared application state.
///
/// The graph is immutable after startup and shared read-only across
/// request handlers; no locks guard it because no mutation paths exist.
#[derive(Clone)]
pub struct AppState {
    /// The routing graph.
    pub graph: Arc<Graph>,

    /// Search configuration.
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(graph: Graph, config: SearchConfig) -> Self {
        Self {
            graph: Arc::new(graph),
            config: Arc::new(config),
        }
    }
}
