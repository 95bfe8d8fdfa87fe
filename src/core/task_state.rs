use std::fmt;
use std::str::FromStr;

/// Phase of a single execution run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionState {
    /// Obtaining the advisory plan
    Planning,
    /// Running the selected strategy
    Executing,
    /// Recording the closing step
    Finalizing,
    /// Terminal, the run produced a result
    Succeeded,
    /// Terminal, includes the error message
    Failed(String),
}

impl ExecutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionState::Succeeded | ExecutionState::Failed(_))
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionState::Planning => write!(f, "Planning"),
            ExecutionState::Executing => write!(f, "Executing"),
            ExecutionState::Finalizing => write!(f, "Finalizing"),
            ExecutionState::Succeeded => write!(f, "Succeeded"),
            ExecutionState::Failed(msg) => write!(f, "Failed: {}", msg),
        }
    }
}

impl FromStr for ExecutionState {
    type Err = ();

    /// Parses the state name; a `Failed` state carries no message after parsing
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Planning" => Ok(ExecutionState::Planning),
            "Executing" => Ok(ExecutionState::Executing),
            "Finalizing" => Ok(ExecutionState::Finalizing),
            "Succeeded" => Ok(ExecutionState::Succeeded),
            s if s.starts_with("Failed") => Ok(ExecutionState::Failed(
                s.strip_prefix("Failed: ").unwrap_or_default().to_string(),
            )),
            _ => Err(()),
        }
    }
}
