mod parser;
use crate::constants::*;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use parser::load_config;

/// Main configuration structure for the engine and search services
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct EngineConfig {
    /// Language model used by the planner and the strategies
    #[serde(default)]
    pub llm: LlmConfig,
    /// Embedding model used by search and backfill
    #[serde(default)]
    pub embedder: EmbedderConfig,
    /// Image generation settings for the media strategy
    #[serde(default)]
    pub images: ImagesConfig,
    /// Where generated files are stored
    #[serde(default)]
    pub storage: StorageConfig,
    /// Default ranking parameters
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub backfill: BackfillConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LlmConfig {
    /// "openai", "anthropic" or "ollama"
    #[serde(default = "default_llm_provider")]
    pub provider: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Optional endpoint override
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            model: default_llm_model(),
            base_url: None,
        }
    }
}

fn default_llm_provider() -> String {
    "openai".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Embedder configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EmbedderConfig {
    #[serde(default = "default_embedder_model")]
    pub model: String,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model: default_embedder_model(),
        }
    }
}

fn default_embedder_model() -> String {
    "text-embedding-3-small".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImagesConfig {
    #[serde(default = "default_image_model")]
    pub model: String,
    #[serde(default = "default_image_size")]
    pub size: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            model: default_image_model(),
            size: default_image_size(),
        }
    }
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Files written below `directory`
    #[default]
    Local,
    /// Files uploaded with HTTP PUT below `base_url`
    Http,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub kind: StorageKind,
    #[serde(default = "default_storage_directory")]
    pub directory: PathBuf,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Name of the environment variable holding the upload token
    #[serde(default)]
    pub token_env: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::default(),
            directory: default_storage_directory(),
            base_url: None,
            token_env: None,
        }
    }
}

fn default_storage_directory() -> PathBuf {
    PathBuf::from("artifacts")
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f32,
    #[serde(default = "default_related_top_k")]
    pub related_top_k: usize,
    #[serde(default = "default_related_min_similarity")]
    pub related_min_similarity: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            related_top_k: DEFAULT_RELATED_TOP_K,
            related_min_similarity: DEFAULT_RELATED_MIN_SIMILARITY,
        }
    }
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_min_similarity() -> f32 {
    DEFAULT_MIN_SIMILARITY
}

fn default_related_top_k() -> usize {
    DEFAULT_RELATED_TOP_K
}

fn default_related_min_similarity() -> f32 {
    DEFAULT_RELATED_MIN_SIMILARITY
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackfillConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Pause between embedding calls, e.g. "200ms" or "1s"
    #[serde(
        default = "default_backfill_delay",
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub delay: Duration,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BACKFILL_BATCH_SIZE,
            delay: default_backfill_delay(),
        }
    }
}

fn default_batch_size() -> usize {
    DEFAULT_BACKFILL_BATCH_SIZE
}

fn default_backfill_delay() -> Duration {
    Duration::from_millis(DEFAULT_BACKFILL_DELAY_MS)
}

fn deserialize_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
}

fn serialize_duration<S: serde::Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&humantime::format_duration(*delay).to_string())
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// SQLite database path; `:memory:` for a throwaway store
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("notus").join("knowledge.db"))
        .unwrap_or_else(|| PathBuf::from("notus.db"))
        .to_string_lossy()
        .into_owned()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
        }
    }
}

fn default_api_port() -> u16 {
    8001
}
