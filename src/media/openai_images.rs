use super::ImageGenerator;
use crate::errors::ProviderError;
use crate::llm::providers::api_key_from_env;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

const OPENAI_IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";

/// Image generator backed by OpenAI's images API
#[derive(Debug)]
pub struct OpenAiImageGenerator {
    client: Client,
    api_key: String,
    model: String,
    /// Requested resolution, e.g. "1024x1024"
    size: String,
}

impl OpenAiImageGenerator {
    pub fn new(model: &str, size: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            client: Client::new(),
            api_key: api_key_from_env("OPENAI_API_KEY")?,
            model: model.to_string(),
            size: size.to_string(),
        })
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageGenerator {
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, ProviderError> {
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "n": 1,
            "size": self.size
        });

        let res = self
            .client
            .post(OPENAI_IMAGES_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let text = res.text().await?;
            return Err(ProviderError::Upstream(format!(
                "OpenAI images error: {}",
                text
            )));
        }

        let json_resp: serde_json::Value = res.json().await?;
        let url = json_resp["data"][0]["url"].as_str().map(String::from);
        debug!("Generated image url: {:?}", url);
        Ok(url)
    }
}
