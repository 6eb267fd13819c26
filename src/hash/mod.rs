//! SHA-256 hash engine
//!
//! A from-scratch, incremental SHA-256 implementation and the digest type it
//! produces. Both ingestion strategies in [`crate::core`] feed this engine.

mod digest;
mod engine;

pub use digest::Digest;
pub use engine::{sha256, transform, Sha256, BLOCK_LEN};
