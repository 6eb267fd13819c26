//! Configuration settings for FileDigest
//!
//! Defines the CLI arguments and the runtime configuration derived from
//! them. Only the ingestion strategy is selectable; the streaming chunk size
//! and the host-loop tick are fixed.

use crate::error::{DigestError, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Host-loop tick between completion polls, roughly one frame at 60 Hz
pub const HOST_TICK: Duration = Duration::from_millis(16);

/// FileDigest - SHA-256 of large files, streamed or memory-mapped
#[derive(Parser, Debug, Clone)]
#[command(name = "filedigest")]
#[command(author = "FileDigest Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "SHA-256 of large files, streamed or hashed from a memory map in the background")]
#[command(long_about = r#"
FileDigest computes the SHA-256 digest of a file and reports the elapsed
wall-clock time and the digest.

Strategies:
  stream   - 64 KiB buffered reads hashed on the calling thread
  mapped   - zero-copy memory map hashed on a background worker, polled
             from a host loop without blocking
  compare  - run both and fail if they disagree

Examples:
  filedigest stream data.bin
  filedigest mapped data.bin
  filedigest -v compare data.bin
"#)]
pub struct CliArgs {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (no progress spinner)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Subcommand selecting the ingestion strategy
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Hash with buffered sequential reads on the calling thread
    #[command(name = "stream")]
    Stream {
        /// File to hash
        path: PathBuf,
    },

    /// Hash a memory-mapped view on a background worker
    #[command(name = "mapped")]
    Mapped {
        /// File to hash
        path: PathBuf,
    },

    /// Run both strategies and check that they agree
    #[command(name = "compare")]
    Compare {
        /// File to hash
        path: PathBuf,
    },
}

/// Data ingestion strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Buffered chunked reads
    Streaming,
    /// Memory-mapped view on a background worker
    Mapped,
}

impl Strategy {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Streaming => "streaming",
            Self::Mapped => "mapped",
        }
    }
}

/// What a run does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// A single strategy
    Single(Strategy),
    /// Both strategies, cross-checked
    Compare,
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// File to hash
    pub path: PathBuf,
    /// Strategy selection
    pub mode: RunMode,
    /// Suppress the progress spinner
    pub quiet: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            mode: RunMode::Single(Strategy::Streaming),
            quiet: false,
        }
    }
}

impl RunConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let (path, mode) = match &args.command {
            Commands::Stream { path } => (path, RunMode::Single(Strategy::Streaming)),
            Commands::Mapped { path } => (path, RunMode::Single(Strategy::Mapped)),
            Commands::Compare { path } => (path, RunMode::Compare),
        };

        if path.as_os_str().is_empty() {
            return Err(DigestError::config("File path required"));
        }

        Ok(Self {
            path: path.clone(),
            mode,
            quiet: args.quiet,
        })
    }
}
