use crate::api::AppState;
use crate::config::{EngineConfig, StorageKind};
use crate::core::TaskEngine;
use crate::db::{Database, SqliteKnowledgeStore};
use crate::errors::Error;
use crate::llm::{LlmClient, OpenAIEmbedder};
use crate::media::OpenAiImageGenerator;
use crate::search::SemanticIndex;
use crate::storage::{HttpObjectStore, LocalObjectStore, ObjectStore};
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds the object store selected by `storage.kind`
pub fn build_object_store(config: &EngineConfig) -> Result<Arc<dyn ObjectStore>, Error> {
    let storage = &config.storage;
    match storage.kind {
        StorageKind::Local => {
            debug!("Using local storage under {}", storage.directory.display());
            Ok(Arc::new(LocalObjectStore::new(storage.directory.clone())))
        }
        StorageKind::Http => {
            let base_url = storage
                .base_url
                .as_deref()
                .ok_or_else(|| Error::Config("storage.base_url is required for http storage".into()))?;
            let token = match storage.token_env.as_deref() {
                Some(var) => match std::env::var(var) {
                    Ok(token) => Some(token),
                    Err(_) => {
                        warn!("{} is not set, uploading without a token", var);
                        None
                    }
                },
                None => None,
            };
            Ok(Arc::new(HttpObjectStore::new(base_url, token)?))
        }
    }
}

/// Builds the task engine from the `llm`, `images` and `storage` sections
pub fn build_engine(config: &EngineConfig) -> Result<TaskEngine, Error> {
    let llm = LlmClient::new(
        &config.llm.provider,
        &config.llm.model,
        config.llm.base_url.as_deref(),
    )?;
    let images = OpenAiImageGenerator::new(&config.images.model, &config.images.size)?;
    let storage = build_object_store(config)?;
    Ok(TaskEngine::new(llm, Arc::new(images), storage))
}

/// Opens the knowledge database and wraps it in a semantic index
pub fn build_index(config: &EngineConfig) -> Result<SemanticIndex, Error> {
    let database = Database::new(&config.database.path)?;
    let store = SqliteKnowledgeStore::new(database);
    let embedder = OpenAIEmbedder::new(&config.embedder.model)?;
    Ok(SemanticIndex::new(Arc::new(store), Arc::new(embedder))
        .with_backfill_delay(config.backfill.delay))
}

/// Everything the HTTP API needs
pub fn build_app_state(config: &EngineConfig) -> Result<AppState, Error> {
    Ok(AppState {
        engine: build_engine(config)?,
        index: build_index(config)?,
        search: config.search.clone(),
        backfill_batch_size: config.backfill.batch_size,
    })
}
