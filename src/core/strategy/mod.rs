//! Execution strategies, selected by task type

mod code;
mod general;
mod media;

pub use code::parse_project_files;

use super::planner::Plan;
use super::{GeneratedFile, Task, TaskType};
use crate::errors::StrategyError;
use crate::llm::LlmClient;
use crate::media::ImageGenerator;
use crate::storage::ObjectStore;
use std::sync::Arc;

/// External capabilities the strategies call into
#[derive(Clone)]
pub struct Capabilities {
    pub llm: LlmClient,
    pub images: Arc<dyn ImageGenerator>,
    pub storage: Arc<dyn ObjectStore>,
}

/// What a strategy produced
#[derive(Debug, Clone)]
pub struct StrategyOutput {
    pub result_text: String,
    pub files: Vec<GeneratedFile>,
    /// Summary recorded in the strategy's step
    pub observation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Single image from the instruction
    Media,
    /// Multi-file project persisted to storage
    Code,
    /// Plain language-model answer
    General,
}

impl Strategy {
    pub fn for_task_type(task_type: TaskType) -> Self {
        match task_type {
            TaskType::Design | TaskType::Slides => Strategy::Media,
            TaskType::Website | TaskType::App => Strategy::Code,
            TaskType::General => Strategy::General,
        }
    }

    /// Action tag recorded for this strategy's step
    pub fn action(&self) -> &'static str {
        match self {
            Strategy::Media => "generate_image",
            Strategy::Code => "generate_code",
            Strategy::General => "llm_response",
        }
    }

    pub fn thought(&self, task: &Task) -> String {
        match self {
            Strategy::Media => format!("Generate an image for the {} task", task.task_type),
            Strategy::Code => format!("Generate the project files for the {} task", task.task_type),
            Strategy::General => "Answer the instruction with the language model".to_string(),
        }
    }

    pub async fn run(
        &self,
        capabilities: &Capabilities,
        task: &Task,
        plan: &Plan,
    ) -> Result<StrategyOutput, StrategyError> {
        match self {
            Strategy::Media => media::run(capabilities.images.as_ref(), task, plan).await,
            Strategy::Code => {
                code::run(&capabilities.llm, capabilities.storage.as_ref(), task, plan).await
            }
            Strategy::General => general::run(&capabilities.llm, task, plan).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_table() {
        assert_eq!(Strategy::for_task_type(TaskType::Design), Strategy::Media);
        assert_eq!(Strategy::for_task_type(TaskType::Slides), Strategy::Media);
        assert_eq!(Strategy::for_task_type(TaskType::Website), Strategy::Code);
        assert_eq!(Strategy::for_task_type(TaskType::App), Strategy::Code);
        assert_eq!(Strategy::for_task_type(TaskType::General), Strategy::General);
    }
}
