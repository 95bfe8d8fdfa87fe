use crate::constants::MAX_STEPS;
use crate::errors::StrategyError;
use serde::{Deserialize, Serialize};

/// One recorded action of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Why the engine took the action
    pub thought: String,
    /// Short tag, e.g. "plan", "generate_code", "finalize"
    pub action: String,
    /// What came out of it
    pub observation: String,
}

/// Append-only, bounded log of steps for one run.
#[derive(Debug, Clone)]
pub struct StepTracer {
    steps: Vec<Step>,
    budget: usize,
}

impl Default for StepTracer {
    fn default() -> Self {
        Self::with_budget(MAX_STEPS)
    }
}

impl StepTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_budget(budget: usize) -> Self {
        Self {
            steps: Vec::new(),
            budget,
        }
    }

    /// Appends a step. Fails once the budget is used up.
    pub fn record(
        &mut self,
        thought: impl Into<String>,
        action: impl Into<String>,
        observation: impl Into<String>,
    ) -> Result<(), StrategyError> {
        if self.steps.len() >= self.budget {
            return Err(StrategyError::StepBudgetExceeded(self.budget));
        }
        self.steps.push(Step {
            thought: thought.into(),
            action: action.into(),
            observation: observation.into(),
        });
        Ok(())
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}
