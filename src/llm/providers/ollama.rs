use super::LlmProvider;
use crate::errors::ProviderError;
use crate::llm::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const OLLAMA_CHAT_URL: &str = "http://localhost:11434/api/chat";

/// Provider implementation for a local Ollama server. No credentials needed.
#[derive(Debug)]
pub struct OllamaProvider {
    client: Client,
    model: String,
    endpoint: String,
}

impl OllamaProvider {
    pub fn new(model: &str, base_url: Option<&str>) -> Result<Self, ProviderError> {
        Ok(OllamaProvider {
            client: Client::new(),
            model: model.to_string(),
            endpoint: base_url.unwrap_or(OLLAMA_CHAT_URL).to_string(),
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn call_llm_api(&self, messages: Vec<ChatMessage>) -> Result<String, ProviderError> {
        let request_body = json!({
            "model": self.model,
            "stream": false,
            "messages": messages
        });

        let res = self
            .client
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await?;

        if !res.status().is_success() {
            let text = res.text().await?;
            return Err(ProviderError::Upstream(format!("Ollama API error: {}", text)));
        }

        let json_resp: serde_json::Value = res.json().await?;
        json_resp["message"]["content"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| {
                ProviderError::MalformedResponse("No content in Ollama LLM response".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;

    async fn serve(reply: &'static str) -> String {
        let app = Router::new().route(
            "/api/chat",
            post(move |Json(_): Json<Value>| async move {
                Json(json!({ "message": { "role": "assistant", "content": reply } }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/chat", addr)
    }

    #[tokio::test]
    async fn returns_content_verbatim() {
        let endpoint = serve("\n  <html>\n</html>\n").await;
        let provider = OllamaProvider::new("llama3", Some(&endpoint)).unwrap();

        let content = provider
            .call_llm_api(vec![ChatMessage::user("hi")])
            .await
            .unwrap();
        assert_eq!(content, "\n  <html>\n</html>\n");
    }
}
