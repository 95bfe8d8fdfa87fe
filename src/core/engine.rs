use super::planner::{plan_task, Plan};
use super::strategy::{Capabilities, Strategy, StrategyOutput};
use super::{ExecutionResult, ExecutionState, StepTracer, Task};
use crate::errors::StrategyError;
use crate::llm::LlmClient;
use crate::media::ImageGenerator;
use crate::storage::ObjectStore;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Turns a task into an [`ExecutionResult`]: plan, run the strategy for the
/// task type, finalize.
///
/// The engine holds only shared, read-only handles to the capabilities; all
/// per-run state lives in a [`Run`] created by `execute`, so independent
/// tasks can execute concurrently on one engine.
#[derive(Clone)]
pub struct TaskEngine {
    capabilities: Capabilities,
}

/// State of one execution run
#[derive(Debug)]
struct Run {
    task_id: String,
    state: ExecutionState,
    tracer: StepTracer,
}

impl Run {
    fn new(task: &Task) -> Self {
        Self {
            task_id: task.id.clone(),
            state: ExecutionState::Planning,
            tracer: StepTracer::new(),
        }
    }

    fn advance(&mut self, next: ExecutionState) {
        debug_assert!(!self.state.is_terminal(), "run already finished");
        debug!("Task {}: {} -> {}", self.task_id, self.state, next);
        self.state = next;
    }
}

impl TaskEngine {
    pub fn new(
        llm: LlmClient,
        images: Arc<dyn ImageGenerator>,
        storage: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            capabilities: Capabilities {
                llm,
                images,
                storage,
            },
        }
    }

    /// Executes `task` once. Always returns a result; strategy failures are
    /// reported through `success`/`error` with the steps recorded so far.
    pub async fn execute(&self, task: &Task) -> ExecutionResult {
        info!("Starting task {} ({})", task.id, task.task_type);
        let mut run = Run::new(task);

        let plan = plan_task(&self.capabilities.llm, task).await;
        let outcome = self.run_stages(task, &plan, &mut run).await;

        match outcome {
            Ok(output) => {
                run.advance(ExecutionState::Succeeded);
                info!(
                    "Task {} succeeded with {} file(s)",
                    task.id,
                    output.files.len()
                );
                ExecutionResult::succeeded(output.result_text, run.tracer.into_steps(), output.files)
            }
            Err(e) => {
                let message = e.to_string();
                error!("Task {} failed: {}", task.id, message);
                run.advance(ExecutionState::Failed(message.clone()));
                ExecutionResult::failed(message, run.tracer.into_steps())
            }
        }
    }

    async fn run_stages(
        &self,
        task: &Task,
        plan: &Plan,
        run: &mut Run,
    ) -> Result<StrategyOutput, StrategyError> {
        let plan_observation = if plan.degraded {
            format!("Planner unavailable, using default plan: {}", plan.text)
        } else {
            plan.text.clone()
        };
        run.tracer.record(
            format!("Work out how to approach the {} task", task.task_type),
            "plan",
            plan_observation,
        )?;
        run.advance(ExecutionState::Executing);

        let strategy = Strategy::for_task_type(task.task_type);
        let output = strategy.run(&self.capabilities, task, plan).await?;
        run.tracer.record(
            strategy.thought(task),
            strategy.action(),
            output.observation.clone(),
        )?;
        run.advance(ExecutionState::Finalizing);

        run.tracer.record(
            "Assemble the final result",
            "finalize",
            format!("Task completed with {} file(s)", output.files.len()),
        )?;
        Ok(output)
    }
}
