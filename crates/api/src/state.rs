use std::sync::Arc;

use mito_core::Pipeline;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). Both fields are
/// immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The response pipeline every handler renders through.
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(config: ServerConfig, pipeline: Pipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
        }
    }
}
