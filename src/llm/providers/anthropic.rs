use super::{api_key_from_env, LlmProvider};
use crate::errors::ProviderError;
use crate::llm::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Code generation needs room for several files
const MAX_TOKENS: u32 = 8192;

/// Provider implementation for Anthropic's messages API
#[derive(Debug)]
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl AnthropicProvider {
    pub fn new(model: &str, base_url: Option<&str>) -> Result<Self, ProviderError> {
        Ok(AnthropicProvider {
            client: Client::new(),
            api_key: api_key_from_env("ANTHROPIC_API_KEY")?,
            model: model.to_string(),
            endpoint: base_url.unwrap_or(ANTHROPIC_MESSAGES_URL).to_string(),
        })
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    /// System messages are lifted into the top-level `system` field, the
    /// remaining turns are sent in order.
    async fn call_llm_api(&self, messages: Vec<ChatMessage>) -> Result<String, ProviderError> {
        let (system_messages, turns): (Vec<_>, Vec<_>) =
            messages.into_iter().partition(|msg| msg.role == "system");
        let system_content = system_messages
            .into_iter()
            .map(|m| m.content)
            .collect::<Vec<_>>()
            .join("\n");

        let request_body = json!({
            "model": self.model,
            "system": system_content,
            "max_tokens": MAX_TOKENS,
            "messages": turns
        });

        let res = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request_body)
            .send()
            .await?;

        if !res.status().is_success() {
            let text = res.text().await?;
            return Err(ProviderError::Upstream(format!(
                "Anthropic API error: {}",
                text
            )));
        }

        let json_resp: serde_json::Value = res.json().await?;
        if let Some(content) = json_resp["content"][0]["text"].as_str() {
            debug!("Anthropic response: {}", content);
            Ok(content.to_string())
        } else {
            Err(ProviderError::MalformedResponse(
                "No content in Anthropic LLM response".to_string(),
            ))
        }
    }
}
