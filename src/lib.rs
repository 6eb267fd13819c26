//! # FileDigest - SHA-256 of Large Files
//!
//! FileDigest computes the SHA-256 digest of a file with a from-scratch,
//! incremental hash engine fed by one of two ingestion strategies:
//!
//! - **Streaming**: 64 KiB buffered reads hashed on the calling thread
//! - **Mapped**: a zero-copy memory map hashed by a single task on a
//!   background worker, polled without blocking from the caller's loop
//!
//! Both strategies produce identical digests.
//!
//! ## Quick Start
//!
//! ```no_run
//! use filedigest::core::StreamingRunner;
//! use std::path::Path;
//!
//! let digest = StreamingRunner::new().hash_file(Path::new("data.bin")).unwrap();
//! println!("{}", digest);
//! ```
//!
//! ## Background Task
//!
//! ```no_run
//! use filedigest::core::{BackgroundHashTask, HashWorker};
//! use filedigest::fs::MappedView;
//! use std::sync::Arc;
//!
//! let worker = HashWorker::spawn().unwrap();
//! let view = Arc::new(MappedView::open("data.bin").unwrap());
//! let handle = BackgroundHashTask::new(Arc::clone(&view)).schedule(&worker).unwrap();
//!
//! while !handle.is_completed() {
//!     // one host-loop tick
//!     std::thread::sleep(std::time::Duration::from_millis(16));
//! }
//! let digest = handle.join().unwrap();
//!
//! if let Ok(view) = Arc::try_unwrap(view) {
//!     view.close();
//! }
//! println!("{}", digest);
//! ```
//!
//! ## Hash Engine
//!
//! ```
//! use filedigest::hash::Sha256;
//!
//! let mut hasher = Sha256::new();
//! hasher.update(b"a");
//! hasher.update(b"bc");
//! assert_eq!(
//!     hasher.finalize().to_hex(),
//!     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod fs;
pub mod hash;
pub mod progress;

// Re-export commonly used types
pub use config::{RunConfig, Strategy};
pub use core::{BackgroundHashTask, HashWorker, Orchestrator, StreamingRunner, TaskHandle};
pub use error::{DigestError, Result};
pub use hash::{sha256, Digest, Sha256};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use filedigest::prelude::*;
    //! ```

    pub use crate::config::{RunConfig, RunMode, Strategy};
    pub use crate::core::{
        BackgroundHashTask, HashWorker, Orchestrator, StreamingRunner, TaskHandle, TaskState,
    };
    pub use crate::error::{DigestError, Result};
    pub use crate::fs::MappedView;
    pub use crate::hash::{sha256, Digest, Sha256};
    pub use crate::progress::{format_elapsed, DigestReport};
}
