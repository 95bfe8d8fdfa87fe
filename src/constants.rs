/// Plan used whenever the planner cannot obtain a usable response
pub const DEFAULT_PLAN: &str = "Execute task as requested";

/// Upper bound on recorded steps for a single run
pub const MAX_STEPS: usize = 10;

/// System prompt template for the planner; `{task_type}` is substituted
pub const PLANNER_SYSTEM_PROMPT: &str = "You are a task planner for an autonomous agent. The task type is '{task_type}'. \
Read the instruction and reply with a short, actionable execution plan of 2-3 sentences. \
No greetings, no lists, no code.";

/// System prompt for the code/project strategy
pub const CODE_SYSTEM_PROMPT: &str = "You are an expert software engineer. Build a complete, working multi-file project for the request. \
Respond ONLY with a JSON object mapping each file name (with extension) to its full file content as a string, \
for example {\"index.html\": \"...\", \"styles.css\": \"...\", \"app.js\": \"...\"}. \
No markdown fences, no explanations outside the JSON object.";

/// System prompt for the general strategy
pub const GENERAL_SYSTEM_PROMPT: &str = "You are a capable autonomous assistant. Complete the user's task thoroughly and return the final answer directly.";

/// File name used when a code response cannot be read as a file mapping
pub const FALLBACK_FILE_NAME: &str = "index.html";

pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.5;
pub const DEFAULT_RELATED_TOP_K: usize = 5;
pub const DEFAULT_RELATED_MIN_SIMILARITY: f32 = 0.6;

pub const DEFAULT_BACKFILL_BATCH_SIZE: usize = 50;
/// Pause between embedding calls during backfill, keeps the provider under its rate limit
pub const DEFAULT_BACKFILL_DELAY_MS: u64 = 200;
