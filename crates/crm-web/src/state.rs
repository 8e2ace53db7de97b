//! Application state.

use crm_graph::CrmGraph;

/// Application state shared across handlers.
///
/// Holds the graph handle injected at startup; handlers never reach for a
/// global client.
#[derive(Clone)]
pub struct AppState {
    pub graph: CrmGraph,
}

impl AppState {
    pub fn new(graph: CrmGraph) -> Self {
        Self { graph }
    }
}
