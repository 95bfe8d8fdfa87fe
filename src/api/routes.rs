//! API routes configuration module

use crate::api::handlers::{backfill, chat, execute_task, health, related_knowledge, search};
use crate::api::AppState;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

/// Creates and configures the API router with all routes
///
/// # Arguments
/// * `state` - Engine, index and defaults shared across handlers
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/execute", post(execute_task))
        .route("/chat", post(chat))
        .route("/search", post(search))
        .route("/knowledge/:id/related", get(related_knowledge))
        .route("/knowledge/backfill", post(backfill))
        .layer(Extension(state))
}
