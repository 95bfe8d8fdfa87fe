use diesel::result::Error as DieselError;

/// Crate-level error for persistence, configuration and serialization.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Diesel error: {0}")]
    DieselError(#[from] DieselError),
    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),
    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML config error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("TOML config error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Schema error: {0}")]
    Schema(String),
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Provider setup failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("Blocking database task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Failure reported by an external capability (language model, embeddings,
/// image generation or object storage).
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Upstream failure; the message is surfaced unmodified.
    #[error("{0}")]
    Upstream(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0} environment variable not set")]
    MissingCredentials(String),
    #[error("Unknown provider '{0}'")]
    UnknownProvider(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal failure of an execution strategy. Becomes the `error` field of a
/// failed [`ExecutionResult`](crate::core::ExecutionResult).
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error("Language model call failed: {0}")]
    LanguageModel(ProviderError),
    #[error("Image generation failed: {0}")]
    ImageGeneration(ProviderError),
    #[error("Failed to store {name}: {source}")]
    Storage {
        name: String,
        #[source]
        source: ProviderError,
    },
    #[error("Step budget of {0} exceeded")]
    StepBudgetExceeded(usize),
}

/// Errors raised by semantic search and related-knowledge lookup.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Knowledge item not found: {0}")]
    NotFound(String),
    #[error("Knowledge item {0} has no embedding")]
    MissingEmbedding(String),
    #[error("Knowledge item {id} has a malformed embedding: {reason}")]
    Parse { id: String, reason: String },
    #[error("Embedding provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Knowledge store error: {0}")]
    Store(#[from] Error),
}
