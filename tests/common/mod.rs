//! Mock capabilities shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use notus::core::TaskEngine;
use notus::errors::ProviderError;
use notus::llm::providers::LlmProvider;
use notus::llm::{ChatMessage, Embedder, LlmClient};
use notus::media::ImageGenerator;
use notus::storage::ObjectStore;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Replies with queued answers in order, then with `fallback`
#[derive(Debug)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, String>>>,
    fallback: String,
    pub calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            fallback: "ok".to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for ScriptedLlm {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn call_llm_api(&self, messages: Vec<ChatMessage>) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(messages);
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(ProviderError::Upstream(message)),
            None => Ok(self.fallback.clone()),
        }
    }
}

/// Image generator returning a fixed outcome
pub struct StubImages {
    outcome: Result<Option<String>, String>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubImages {
    pub fn returning(url: Option<&str>) -> Self {
        Self {
            outcome: Ok(url.map(str::to_string)),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ImageGenerator for StubImages {
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.outcome.clone().map_err(ProviderError::Upstream)
    }
}

/// One recorded `put_object` call
#[derive(Debug, Clone)]
pub struct PutCall {
    pub key: String,
    pub content: String,
    pub content_type: String,
}

/// Object store recording every call; optionally failing all of them
#[derive(Default)]
pub struct RecordingStorage {
    pub calls: Mutex<Vec<PutCall>>,
    fail_with: Option<String>,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<PutCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for RecordingStorage {
    async fn put_object(
        &self,
        key: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(PutCall {
            key: key.to_string(),
            content: String::from_utf8_lossy(&content).into_owned(),
            content_type: content_type.to_string(),
        });
        match &self.fail_with {
            Some(message) => Err(ProviderError::Upstream(message.clone())),
            None => Ok(format!("https://files.test/{}", key)),
        }
    }
}

/// Embedder backed by a lookup table; unknown texts fail
#[derive(Default)]
pub struct TableEmbedder {
    table: HashMap<String, Vec<f32>>,
}

impl TableEmbedder {
    pub fn new(entries: &[(&str, Vec<f32>)]) -> Self {
        Self {
            table: entries
                .iter()
                .map(|(text, vector)| (text.to_string(), vector.clone()))
                .collect(),
        }
    }
}

#[async_trait]
impl Embedder for TableEmbedder {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.table
            .get(text)
            .cloned()
            .ok_or_else(|| ProviderError::Upstream(format!("no embedding for {:?}", text)))
    }
}

pub fn engine(
    llm: Arc<ScriptedLlm>,
    images: Arc<StubImages>,
    storage: Arc<RecordingStorage>,
) -> TaskEngine {
    TaskEngine::new(LlmClient::from_provider(llm), images, storage)
}
