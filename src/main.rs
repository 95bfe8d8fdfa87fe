//! Main entry point for the application.
//!
//! Loads environment variables and configuration, initializes logging and
//! dispatches the selected subcommand: run a task, query the knowledge index,
//! backfill embeddings, seed an item or serve the HTTP API.

use clap::Parser;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input};
use indicatif::{ProgressBar, ProgressStyle};
use notus::api::server::launch_server;
use notus::cli::{Cli, Command};
use notus::config::{load_config, EngineConfig};
use notus::core::{ExecutionResult, Task, TaskType};
use notus::db::{Database, SqliteKnowledgeStore};
use notus::errors::Error;
use notus::search::{KnowledgeStore, NewKnowledgeItem, RelatedOptions, SearchOptions, SearchResult};
use notus::utils::{build_app_state, build_engine, build_index, init_logging};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.logging_level, cli.log_dir.as_deref());

    if let Err(e) = dotenvy::dotenv() {
        warn!("Failed to load .env file: {}", e);
    }

    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{} {}", "✗".red(), e.to_string().red());
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };

    match dispatch(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{} {}", "✗".red(), e.to_string().red());
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(command: Command, config: &EngineConfig) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Run {
            instruction,
            task_type,
            context,
            json,
        } => {
            let instruction = match instruction {
                Some(text) => text,
                None => prompt_instruction()?,
            };
            let task_type: TaskType = task_type.parse().unwrap_or_default();
            let mut task = Task::new(&instruction, task_type);
            if let Some(raw) = context {
                task = task.with_context(serde_json::from_str(&raw)?);
            }

            let engine = build_engine(config)?;
            let spinner = spinner(&format!("Running {} task...", task.task_type));
            let result = engine.execute(&task).await;
            spinner.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_execution(&result);
            }
        }
        Command::Search {
            query,
            domain,
            top_k,
            min_similarity,
        } => {
            let index = build_index(config)?;
            let options = SearchOptions {
                domain,
                top_k: top_k.unwrap_or(config.search.top_k),
                min_similarity: min_similarity.unwrap_or(config.search.min_similarity),
            };
            let results = index.semantic_search(&query, &options).await?;
            print_ranked(&results);
        }
        Command::Related {
            id,
            exclude_same_domain,
            top_k,
            min_similarity,
        } => {
            let index = build_index(config)?;
            let options = RelatedOptions {
                exclude_same_domain,
                top_k: top_k.unwrap_or(config.search.related_top_k),
                min_similarity: min_similarity.unwrap_or(config.search.related_min_similarity),
            };
            let results = index.find_related_knowledge(&id, &options).await?;
            print_ranked(&results);
        }
        Command::Backfill { batch_size } => {
            let index = build_index(config)?;
            let batch_size = batch_size.unwrap_or(config.backfill.batch_size);
            let spinner = spinner(&format!("Embedding up to {} items...", batch_size));
            let report = index.backfill_embeddings(batch_size).await?;
            spinner.finish_and_clear();

            println!(
                "{} processed {}, failed {}",
                "✓".green(),
                report.processed.to_string().bold(),
                report.failed.to_string().red()
            );
        }
        Command::Add { domain, insight } => {
            let store = SqliteKnowledgeStore::new(Database::new(&config.database.path)?);
            let item = store.insert(NewKnowledgeItem { domain, insight }).await?;
            println!("{} Stored knowledge item {}", "✓".green(), item.id.bold());
        }
        Command::Serve { port } => {
            let port = port.unwrap_or(config.api.port);
            let state = build_app_state(config)?;
            info!("Starting API server on port {}", port);
            launch_server(port, Arc::new(state)).await?;
        }
    }
    Ok(())
}

fn prompt_instruction() -> Result<String, Error> {
    println!("{}", "\n🤖 What should be done?".bold().cyan());
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt("📝 Your task")
        .interact_text()
        .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("-\\|/")
        .template("{spinner} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

fn print_execution(result: &ExecutionResult) {
    for (i, step) in result.steps.iter().enumerate() {
        println!(
            "{} {} {}",
            format!("[{}]", i + 1).dimmed(),
            step.action.blue().bold(),
            step.observation
        );
    }

    if result.success {
        println!("\n{}", "✅ Task completed".green().bold());
        if !result.result_text.is_empty() {
            println!("{}", result.result_text);
        }
        for file in &result.files {
            println!("  {} {} ({})", "•".green(), file.name.bold(), file.url);
        }
    } else {
        println!(
            "\n{} {}",
            "⚠️ Task failed:".red().bold(),
            result.error.as_deref().unwrap_or("unknown error").red()
        );
    }
}

fn print_ranked(results: &[SearchResult]) {
    if results.is_empty() {
        println!("{}", "No matching knowledge items".yellow());
        return;
    }
    for result in results {
        println!(
            "{} {} [{}] {}",
            format!("{:.3}", result.similarity).green(),
            result.item.id.dimmed(),
            result.item.domain.cyan(),
            result.item.insight
        );
    }
}
