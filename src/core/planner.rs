use super::Task;
use crate::constants::{DEFAULT_PLAN, PLANNER_SYSTEM_PROMPT};
use crate::llm::LlmClient;
use tracing::{debug, warn};

/// Advisory plan for a task. `degraded` is set when the default plan was used.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub text: String,
    pub degraded: bool,
}

impl Plan {
    fn fallback() -> Self {
        Self {
            text: DEFAULT_PLAN.to_string(),
            degraded: true,
        }
    }
}

/// Builds the user prompt: the raw instruction, followed by the caller
/// context as JSON when there is any.
fn planner_prompt(task: &Task) -> String {
    let mut prompt = format!("Instruction:\n{}", task.instruction);
    if !task.context.is_empty() {
        let context = serde_json::to_string_pretty(&task.context).unwrap_or_default();
        prompt.push_str("\n\nContext:\n");
        prompt.push_str(&context);
    }
    prompt
}

/// Asks the language model for a 2-3 sentence plan.
///
/// Never fails: an error or an empty reply yields the default plan.
pub async fn plan_task(llm: &LlmClient, task: &Task) -> Plan {
    let system_prompt = PLANNER_SYSTEM_PROMPT.replace("{task_type}", task.task_type.as_str());

    match llm.complete(&system_prompt, &planner_prompt(task)).await {
        Ok(text) if !text.trim().is_empty() => {
            debug!("Plan for task {}: {}", task.id, text);
            Plan {
                text: text.trim().to_string(),
                degraded: false,
            }
        }
        Ok(_) => {
            warn!("Planner returned an empty plan for task {}, using default", task.id);
            Plan::fallback()
        }
        Err(e) => {
            warn!("Planning failed for task {}: {}, using default", task.id, e);
            Plan::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaskType;
    use crate::errors::ProviderError;
    use crate::llm::providers::LlmProvider;
    use crate::llm::ChatMessage;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    struct ScriptedProvider {
        reply: Result<String, String>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn call_llm_api(&self, messages: Vec<ChatMessage>) -> Result<String, ProviderError> {
            self.seen.lock().unwrap().push(messages);
            self.reply.clone().map_err(ProviderError::Upstream)
        }
    }

    fn client(reply: Result<&str, &str>) -> (LlmClient, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider {
            reply: reply.map(String::from).map_err(String::from),
            seen: Mutex::new(Vec::new()),
        });
        (LlmClient::from_provider(provider.clone()), provider)
    }

    #[tokio::test]
    async fn uses_model_plan_and_embeds_task_type() {
        let (llm, provider) = client(Ok("  Draft the layout. Then write copy.  "));
        let task = Task::new("Landing page for a bakery", TaskType::Website);

        let plan = plan_task(&llm, &task).await;
        assert_eq!(plan.text, "Draft the layout. Then write copy.");
        assert!(!plan.degraded);

        let seen = provider.seen.lock().unwrap();
        assert!(seen[0][0].content.contains("'website'"));
        assert!(seen[0][1].content.contains("Landing page for a bakery"));
    }

    #[tokio::test]
    async fn falls_back_on_error_or_blank_reply() {
        let task = Task::new("anything", TaskType::General);

        let (llm, _) = client(Err("upstream timeout"));
        let plan = plan_task(&llm, &task).await;
        assert_eq!(plan.text, DEFAULT_PLAN);
        assert!(plan.degraded);

        let (llm, _) = client(Ok("   "));
        assert_eq!(plan_task(&llm, &task).await.text, DEFAULT_PLAN);
    }

    #[tokio::test]
    async fn context_is_included_when_present() {
        let (llm, provider) = client(Ok("plan"));
        let mut context = serde_json::Map::new();
        context.insert("audience".into(), serde_json::json!("students"));
        let task = Task::new("Explain borrowing", TaskType::General).with_context(context);

        plan_task(&llm, &task).await;
        let seen = provider.seen.lock().unwrap();
        assert!(seen[0][1].content.contains("students"));
    }
}
