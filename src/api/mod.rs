/// API error types and handling
pub mod errors;
/// HTTP handlers for task execution and knowledge search
pub mod handlers;
/// Routes configuration and setup
pub mod routes;
/// HTTP server implementation
pub mod server;

use crate::config::SearchConfig;
use crate::core::TaskEngine;
use crate::search::SemanticIndex;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub engine: TaskEngine,
    pub index: SemanticIndex,
    /// Defaults applied when a request omits ranking parameters
    pub search: SearchConfig,
    pub backfill_batch_size: usize,
}
