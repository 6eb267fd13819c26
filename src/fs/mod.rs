//! File system access module
//!
//! Provides the zero-copy memory-mapped file view used by the background
//! digest path.

mod mapped;

pub use mapped::MappedView;
