use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command line interface for the application
#[derive(Parser)]
#[command(name = "notus", version, about = "Task execution engine with semantic knowledge search")]
pub struct Cli {
    /// Path to the YAML or TOML configuration file. Defaults apply when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Sets the logging verbosity level for the application
    /// Possible values: "error", "warn", "info", "debug", "trace"
    /// Default: "info"
    #[arg(long, global = true, default_value_t = String::from("info"))]
    pub logging_level: String,

    /// Also write logs to a daily rotating file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Execute a single task and print its result
    Run {
        /// Instruction to execute. Prompted for when omitted
        instruction: Option<String>,
        /// general, slides, website, app or design
        #[arg(short = 't', long, default_value = "general")]
        task_type: String,
        /// JSON object passed to the planner as context
        #[arg(long)]
        context: Option<String>,
        /// Print the raw JSON result instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Rank knowledge items against a query
    Search {
        query: String,
        #[arg(short, long)]
        domain: Option<String>,
        #[arg(long)]
        top_k: Option<usize>,
        #[arg(long)]
        min_similarity: Option<f32>,
    },
    /// List items similar to an existing knowledge item
    Related {
        id: String,
        #[arg(long)]
        exclude_same_domain: bool,
        #[arg(long)]
        top_k: Option<usize>,
        #[arg(long)]
        min_similarity: Option<f32>,
    },
    /// Embed knowledge items that have no embedding yet
    Backfill {
        #[arg(short, long)]
        batch_size: Option<usize>,
    },
    /// Store a new knowledge item (embedded on the next backfill)
    Add {
        #[arg(short, long)]
        domain: String,
        insight: String,
    },
    /// Serve the HTTP API
    Serve {
        /// Overrides `api.port`
        #[arg(short, long)]
        port: Option<u16>,
    },
}
