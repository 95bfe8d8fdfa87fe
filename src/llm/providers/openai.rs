use super::{api_key_from_env, LlmProvider};
use crate::errors::ProviderError;
use crate::llm::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Provider implementation for OpenAI's chat completions API
#[derive(Debug)]
pub struct OpenAiProvider {
    client: Client,
    /// OpenAI API key loaded from environment
    api_key: String,
    /// Model identifier to use (e.g. "gpt-4o", "gpt-4o-mini")
    model: String,
    /// Endpoint, overridable for OpenAI-compatible servers
    endpoint: String,
}

impl OpenAiProvider {
    /// Creates a new OpenAI provider instance
    ///
    /// # Arguments
    /// * `model` - The model identifier to use
    /// * `base_url` - Optional OpenAI-compatible endpoint replacing the default
    pub fn new(model: &str, base_url: Option<&str>) -> Result<Self, ProviderError> {
        Ok(OpenAiProvider {
            client: Client::new(),
            api_key: api_key_from_env("OPENAI_API_KEY")?,
            model: model.to_string(),
            endpoint: base_url.unwrap_or(OPENAI_CHAT_URL).to_string(),
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn call_llm_api(&self, messages: Vec<ChatMessage>) -> Result<String, ProviderError> {
        let request_body = json!({
          "model": self.model,
          "messages": messages,
          "temperature": 0.7
        });

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        if !res.status().is_success() {
            let text = res.text().await?;
            return Err(ProviderError::Upstream(format!("OpenAI API error: {}", text)));
        }

        let json_resp: serde_json::Value = res.json().await?;
        match json_resp["choices"][0]["message"]["content"].as_str() {
            Some(content) => {
                debug!("OpenAI response: {}", content);
                Ok(content.to_string())
            }
            None => Err(ProviderError::MalformedResponse(
                "No content in OpenAI LLM response".to_string(),
            )),
        }
    }
}
