//! Core digest strategies
//!
//! Provides the two ingestion paths feeding the hash engine (synchronous
//! streaming and a memory-mapped background task) and the orchestrator that
//! times and reports them.

mod orchestrator;
mod streaming;
mod task;

pub use orchestrator::*;
pub use streaming::*;
pub use task::*;
