use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of output a task asks for. Selects the execution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    #[default]
    General,
    Slides,
    Website,
    App,
    Design,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::General => "general",
            TaskType::Slides => "slides",
            TaskType::Website => "website",
            TaskType::App => "app",
            TaskType::Design => "design",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = std::convert::Infallible;

    /// Case-insensitive. Unrecognized names map to `General`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "slides" => TaskType::Slides,
            "website" => TaskType::Website,
            "app" => TaskType::App,
            "design" => TaskType::Design,
            _ => TaskType::General,
        })
    }
}

impl<'de> Deserialize<'de> for TaskType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}

/// A submitted instruction. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub instruction: String,
    pub task_type: TaskType,
    /// Free-form caller context, passed to the planner
    #[serde(default)]
    pub context: serde_json::Map<String, serde_json::Value>,
}

impl Task {
    /// Creates a task with a fresh UUID and no context
    pub fn new(instruction: &str, task_type: TaskType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            instruction: instruction.to_string(),
            task_type,
            context: serde_json::Map::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_context(mut self, context: serde_json::Map<String, serde_json::Value>) -> Self {
        self.context = context;
        self
    }
}
