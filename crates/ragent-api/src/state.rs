use ragent_graph::Graph;
use std::sync::Arc;

use crate::config::Config;
use crate::run_manager::RunManager;

/// Shared application state passed to all handlers
///
/// The Graph is stateless and created once at startup; runs only share the
/// ports it holds.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub graph: Arc<Graph>,
    pub runs: Arc<RunManager>,
    /// Backend of the memory ports, reported by `/info`
    pub persistence: &'static str,
}

impl AppState {
    pub fn new(config: Config, graph: Graph, persistence: &'static str) -> Self {
        let runs = RunManager::new(config.runs.result_ttl());
        Self {
            config: Arc::new(config),
            graph: Arc::new(graph),
            runs: Arc::new(runs),
            persistence,
        }
    }
}
