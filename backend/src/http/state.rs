//! Application state for the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ServiceConfig;
use crate::pipeline::IngestPipeline;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Pipeline shared by all requests; it holds no per-request state
    pub pipeline: Arc<IngestPipeline>,
    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
    /// Maximum time to receive a request body
    pub body_timeout: Duration,
}

impl AppState {
    /// Create a new application state with default body limits.
    pub fn new(pipeline: Arc<IngestPipeline>) -> Self {
        let defaults = ServiceConfig::default();
        Self {
            pipeline,
            max_body_bytes: defaults.max_body_bytes,
            body_timeout: defaults.body_timeout(),
        }
    }

    /// Create the state the server binary uses, limits taken from `config`.
    pub fn from_config(pipeline: Arc<IngestPipeline>, config: &ServiceConfig) -> Self {
        Self {
            pipeline,
            max_body_bytes: config.max_body_bytes,
            body_timeout: config.body_timeout(),
        }
    }
}
