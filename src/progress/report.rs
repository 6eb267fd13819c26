//! Run reports
//!
//! A run produces two human-readable lines: the elapsed wall-clock time as
//! `HH:MM:SS.CC` and the 64-character hex digest.

use crate::config::Strategy;
use crate::hash::Digest;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Format a duration as `HH:MM:SS.CC` (hundredths, truncated).
///
/// Hours are not wrapped at 24.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let hundredths = elapsed.subsec_millis() / 10;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{hundredths:02}")
}

/// Outcome of one digest run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestReport {
    /// Strategy that produced the digest
    pub strategy: Strategy,
    /// File that was hashed
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Elapsed time as `HH:MM:SS.CC`
    pub elapsed: String,
    /// Elapsed time in seconds
    pub elapsed_secs: f64,
    /// Resulting digest
    pub digest: Digest,
}

impl DigestReport {
    /// Create a new report
    pub fn new(
        strategy: Strategy,
        path: impl Into<PathBuf>,
        size: u64,
        elapsed: Duration,
        digest: Digest,
    ) -> Self {
        Self {
            strategy,
            path: path.into(),
            size,
            elapsed: format_elapsed(elapsed),
            elapsed_secs: elapsed.as_secs_f64(),
            digest,
        }
    }

    /// The two report lines: elapsed time, then digest
    pub fn lines(&self) -> [String; 2] {
        [self.elapsed.clone(), self.digest.to_hex()]
    }

    /// Throughput in bytes per second, if measurable
    pub fn throughput(&self) -> Option<f64> {
        (self.elapsed_secs > 0.0).then(|| self.size as f64 / self.elapsed_secs)
    }

    /// Print the report lines to stdout and log a summary line
    pub fn print(&self) {
        for line in self.lines() {
            println!("{line}");
        }

        match self.throughput() {
            Some(rate) => tracing::info!(
                "{} digest of {} ({}) at {}/s",
                self.strategy.name(),
                self.path.display(),
                humansize::format_size(self.size, humansize::BINARY),
                humansize::format_size(rate as u64, humansize::BINARY)
            ),
            None => tracing::info!(
                "{} digest of {} ({})",
                self.strategy.name(),
                self.path.display(),
                humansize::format_size(self.size, humansize::BINARY)
            ),
        }
    }
}
