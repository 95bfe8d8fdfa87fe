//! Semantic search over knowledge items
//!
//! This module contains:
//! - The validated embedding type and its stored text form
//! - Cosine similarity
//! - The knowledge store abstraction with an in-memory implementation
//! - The semantic index: ranked search, related-item lookup and embedding backfill

mod embedding;
mod index;
mod similarity;
mod store;

pub use embedding::*;
pub use index::*;
pub use similarity::*;
pub use store::*;
