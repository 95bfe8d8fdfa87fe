//! Image generation capability

mod openai_images;

use crate::errors::ProviderError;
use async_trait::async_trait;

pub use openai_images::*;

/// Generates an image from a text prompt.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Returns the URL of the generated image, or `None` when the service
    /// answered without one.
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, ProviderError>;
}
