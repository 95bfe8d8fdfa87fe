use crate::errors::ProviderError;
use crate::llm::ChatMessage;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod anthropic;
pub mod ollama;
pub mod openai;

/// A chat-completion backend. Returns the text content of the reply.
#[async_trait]
pub trait LlmProvider: Debug + Send + Sync {
    async fn call_llm_api(&self, messages: Vec<ChatMessage>) -> Result<String, ProviderError>;
}

/// Reads an API key from the environment.
pub(crate) fn api_key_from_env(var: &str) -> Result<String, ProviderError> {
    std::env::var(var).map_err(|_| ProviderError::MissingCredentials(var.to_string()))
}
