//! Progress and report module
//!
//! Formats run reports (elapsed time and digest) and drives the spinner
//! shown while a background task is polled.

mod report;
mod ticker;

pub use report::*;
pub use ticker::Ticker;
