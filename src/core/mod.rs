//! Task execution engine
//!
//! This module contains:
//! - The task model and run states
//! - The step tracer and result types
//! - The planner and the execution strategies
//! - The engine tying them together

mod engine;
pub mod mime;
pub mod planner;
mod result;
pub mod strategy;
mod task;
mod task_state;
mod trace;

pub use engine::*;
pub use result::*;
pub use task::*;
pub use task_state::*;
pub use trace::*;
