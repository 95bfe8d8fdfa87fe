use super::Step;
use serde::{Deserialize, Serialize};

/// A file produced by a run, stored by an external service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFile {
    pub url: String,
    pub content_type: String,
    /// File name including extension
    pub name: String,
}

/// The single, final outcome of executing a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(rename = "result")]
    pub result_text: String,
    pub steps: Vec<Step>,
    pub files: Vec<GeneratedFile>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn succeeded(result_text: String, steps: Vec<Step>, files: Vec<GeneratedFile>) -> Self {
        Self {
            success: true,
            result_text,
            steps,
            files,
            error: None,
        }
    }

    /// A failed run keeps the steps recorded before the failure and no files.
    pub fn failed(error: String, steps: Vec<Step>) -> Self {
        Self {
            success: false,
            result_text: String::new(),
            steps,
            files: Vec::new(),
            error: Some(error),
        }
    }
}
