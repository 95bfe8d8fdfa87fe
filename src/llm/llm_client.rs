use crate::errors::ProviderError;
use crate::llm::providers::{
    anthropic::AnthropicProvider, ollama::OllamaProvider, openai::OpenAiProvider, LlmProvider,
};
use crate::llm::ChatMessage;
use std::sync::Arc;
use tracing::debug;

/// Generic LLM client that delegates work to a concrete provider.
#[derive(Debug, Clone)]
pub struct LlmClient {
    provider: Arc<dyn LlmProvider>,
}

impl LlmClient {
    /// Creates a new LLM client with the specified provider and model.
    ///
    /// # Arguments
    /// * `provider_name` - Name of the LLM provider ("openai", "anthropic", or "ollama")
    /// * `model` - Model name to use with the provider
    /// * `base_url` - Optional endpoint override
    pub fn new(
        provider_name: &str,
        model: &str,
        base_url: Option<&str>,
    ) -> Result<Self, ProviderError> {
        let provider: Arc<dyn LlmProvider> = match provider_name {
            "openai" => Arc::new(OpenAiProvider::new(model, base_url)?),
            "anthropic" => Arc::new(AnthropicProvider::new(model, base_url)?),
            "ollama" => Arc::new(OllamaProvider::new(model, base_url)?),
            _ => return Err(ProviderError::UnknownProvider(provider_name.to_string())),
        };

        Ok(LlmClient { provider })
    }

    /// Wraps an already constructed provider.
    pub fn from_provider(provider: Arc<dyn LlmProvider>) -> Self {
        LlmClient { provider }
    }

    /// Calls the LLM with the full message list and returns the raw response.
    pub async fn call_llm_api(&self, messages: Vec<ChatMessage>) -> Result<String, ProviderError> {
        debug!("messages: {:?}", messages);
        let response = self.provider.call_llm_api(messages).await?;
        debug!("LLM response: {}", response);
        Ok(response)
    }

    /// Single-turn call with a system prompt and a user prompt.
    pub async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError> {
        self.call_llm_api(vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_prompt),
        ])
        .await
    }
}
