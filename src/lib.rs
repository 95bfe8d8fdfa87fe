//! Notus: a task execution engine and a semantic knowledge index.
//!
//! A [`core::TaskEngine`] plans a task with a language model, runs the
//! strategy for its type (image, multi-file project or plain answer) and
//! returns a structured [`core::ExecutionResult`]. A [`search::SemanticIndex`]
//! ranks knowledge items by cosine similarity of their embeddings and fills
//! in missing embeddings in rate-limited batches.

pub mod api;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod db;
pub mod errors;
pub mod llm;
pub mod media;
pub mod schema;
pub mod search;
pub mod storage;
pub mod utils;
