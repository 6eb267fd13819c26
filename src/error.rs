//! Error types for FileDigest
//!
//! I/O faults are fatal to the current run: every fallible operation returns
//! a `DigestError` and no digest is produced. Call-order violations on the
//! hash engine and mapped view are ruled out by ownership and never show up
//! here.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for FileDigest operations
#[derive(Error, Debug)]
pub enum DigestError {
    /// I/O error during open, map or read
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File not found
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Background worker stopped before delivering a digest
    #[error("Background worker error: {0}")]
    Worker(String),

    /// Computed digest differs from the expected one
    #[error("Digest mismatch for '{path}': expected {expected}, got {actual}")]
    DigestMismatch {
        /// File that was hashed
        path: PathBuf,
        /// Digest of the first strategy, in hex
        expected: String,
        /// Digest of the second strategy, in hex
        actual: String,
    },

    /// Text that is not a 64-character hex digest
    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DigestError {
    /// Create an I/O error with path context.
    ///
    /// `NotFound` and `PermissionDenied` kinds are promoted to their own
    /// variants so callers can match on them without digging into the source.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source },
        }
    }

    /// Create a digest mismatch error
    pub fn mismatch(
        path: impl Into<PathBuf>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::DigestMismatch {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a worker error
    pub fn worker(message: impl Into<String>) -> Self {
        Self::Worker(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Check if this error is a permission issue
    pub fn is_permission_error(&self) -> bool {
        match self {
            Self::PermissionDenied(_) => true,
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::PermissionDenied,
            _ => false,
        }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. }
            | Self::NotFound(path)
            | Self::PermissionDenied(path)
            | Self::DigestMismatch { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for FileDigest operations
pub type Result<T> = std::result::Result<T, DigestError>;

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| DigestError::io(path, e))
    }
}
