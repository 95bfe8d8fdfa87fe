use super::StrategyOutput;
use crate::constants::GENERAL_SYSTEM_PROMPT;
use crate::core::planner::Plan;
use crate::core::Task;
use crate::errors::StrategyError;
use crate::llm::LlmClient;

pub(super) async fn run(
    llm: &LlmClient,
    task: &Task,
    plan: &Plan,
) -> Result<StrategyOutput, StrategyError> {
    let prompt = format!("{}\n\nExecution plan:\n{}", task.instruction, plan.text);
    let content = llm
        .complete(GENERAL_SYSTEM_PROMPT, &prompt)
        .await
        .map_err(StrategyError::LanguageModel)?;

    Ok(StrategyOutput {
        observation: format!("Received a {}-character response", content.chars().count()),
        result_text: content,
        files: Vec::new(),
    })
}
