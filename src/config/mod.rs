//! Configuration module for FileDigest
//!
//! Provides CLI argument parsing and the runtime settings handed to the
//! orchestrator.

mod settings;

pub use settings::*;
