use super::Embedder;
use crate::errors::ProviderError;
use crate::llm::providers::api_key_from_env;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// OpenAI embedder implementation that uses OpenAI's API to generate text embeddings
#[derive(Debug)]
pub struct OpenAIEmbedder {
    client: Client,
    /// OpenAI API key used for authentication
    api_key: String,
    /// Name of the OpenAI model to use for embeddings
    pub model: String,
}

impl OpenAIEmbedder {
    /// Creates a new OpenAIEmbedder instance
    ///
    /// # Errors
    /// Fails when the OPENAI_API_KEY environment variable is not set
    pub fn new(model: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            client: Client::new(),
            api_key: api_key_from_env("OPENAI_API_KEY")?,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let body = json!({
            "input": text,
            "model": self.model
        });

        let res = self
            .client
            .post(OPENAI_EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let txt = res.text().await?;
            return Err(ProviderError::Upstream(format!("Error from OpenAI: {}", txt)));
        }

        let json_resp: serde_json::Value = res.json().await?;
        let arr = json_resp["data"][0]["embedding"]
            .as_array()
            .ok_or_else(|| ProviderError::MalformedResponse("No embedding".to_string()))?;

        // A partially numeric array is a broken response, not a shorter vector
        arr.iter()
            .map(|x| {
                x.as_f64().map(|v| v as f32).ok_or_else(|| {
                    ProviderError::MalformedResponse(format!("Non-numeric embedding value {}", x))
                })
            })
            .collect()
    }
}
