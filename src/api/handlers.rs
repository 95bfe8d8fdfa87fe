use crate::api::errors::{api_error, ApiError};
use crate::api::AppState;
use crate::core::{ExecutionResult, Task, TaskType};
use crate::search::{BackfillReport, RelatedOptions, SearchOptions, SearchResult};
use axum::http::StatusCode;
use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// Request payload for running a task through the engine
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    pub task: String,
    #[serde(default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub context: serde_json::Map<String, Value>,
    /// Caller-chosen id, used to namespace stored files
    #[serde(default)]
    pub task_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub task: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub top_k: Option<usize>,
    #[serde(default)]
    pub min_similarity: Option<f32>,
}

/// Query string of the related-knowledge endpoint
#[derive(Debug, Deserialize)]
pub struct RelatedQuery {
    #[serde(default)]
    pub exclude_same_domain: bool,
    #[serde(default)]
    pub top_k: Option<usize>,
    #[serde(default)]
    pub min_similarity: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BackfillRequest {
    #[serde(default)]
    pub batch_size: Option<usize>,
}

fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            &format!("'{}' must not be empty", field),
        ));
    }
    Ok(())
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "agent_ready": true }))
}

/// Executes a task and returns its result, successful or not
///
/// Strategy failures are part of the body (`success: false`), not an HTTP error.
pub async fn execute_task(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<ExecuteRequest>,
) -> Result<Json<ExecutionResult>, ApiError> {
    require_text("task", &payload.task)?;

    let mut task = Task::new(&payload.task, payload.task_type).with_context(payload.context);
    if let Some(id) = payload.task_id.as_deref() {
        task = task.with_id(id);
    }
    info!("Received {} task {}", task.task_type, task.id);

    Ok(Json(state.engine.execute(&task).await))
}

/// Answers a free-form message with the general strategy
pub async fn chat(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    require_text("task", &payload.task)?;

    let task = Task::new(&payload.task, TaskType::General);
    let result = state.engine.execute(&task).await;
    if !result.success {
        let message = result.error.unwrap_or_else(|| "Task failed".to_string());
        return Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, &message));
    }

    Ok(Json(ChatResponse {
        success: true,
        response: result.result_text,
    }))
}

pub async fn search(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    require_text("query", &payload.query)?;

    let options = SearchOptions {
        domain: payload.domain,
        top_k: payload.top_k.unwrap_or(state.search.top_k),
        min_similarity: payload.min_similarity.unwrap_or(state.search.min_similarity),
    };
    let results = state.index.semantic_search(&payload.query, &options).await?;
    Ok(Json(results))
}

/// Lists items similar to the item `id`
pub async fn related_knowledge(
    Path(id): Path<String>,
    Query(query): Query<RelatedQuery>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let options = RelatedOptions {
        exclude_same_domain: query.exclude_same_domain,
        top_k: query.top_k.unwrap_or(state.search.related_top_k),
        min_similarity: query
            .min_similarity
            .unwrap_or(state.search.related_min_similarity),
    };
    let results = state.index.find_related_knowledge(&id, &options).await?;
    Ok(Json(results))
}

/// Runs one embedding backfill batch. The body is optional.
pub async fn backfill(
    Extension(state): Extension<Arc<AppState>>,
    payload: Option<Json<BackfillRequest>>,
) -> Result<Json<BackfillReport>, ApiError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let batch_size = request.batch_size.unwrap_or(state.backfill_batch_size);
    let report = state.index.backfill_embeddings(batch_size).await?;
    Ok(Json(report))
}
