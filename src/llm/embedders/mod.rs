/// Module for OpenAI embedder implementation
pub mod openai_embedder;

use crate::errors::ProviderError;
use async_trait::async_trait;

pub use openai_embedder::*;

/// Converts text into a fixed-length vector.
///
/// Implementations must fail rather than return a placeholder vector: a
/// zero vector would silently rank as "unrelated to everything".
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds the given text into a vector of floating point numbers
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, ProviderError>;
}
