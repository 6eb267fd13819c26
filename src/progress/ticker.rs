//! Host-loop ticker
//!
//! Stands in for the host's per-frame loop while a background task runs:
//! each tick advances a spinner and reports the task state.

use crate::core::TaskState;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Spinner advanced once per host tick
pub struct Ticker {
    bar: ProgressBar,
    ticks: u64,
    last_state: Option<TaskState>,
}

impl Ticker {
    /// Create a visible spinner on stderr
    pub fn new(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        let template = "{spinner:.cyan} [{prefix}] {msg} ({elapsed})";
        if let Ok(style) = ProgressStyle::default_spinner().template(template) {
            bar.set_style(style);
        }
        bar.set_message(message.into());
        Self {
            bar,
            ticks: 0,
            last_state: None,
        }
    }

    /// Create a ticker that draws nothing
    pub fn hidden() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
        Self {
            bar,
            ticks: 0,
            last_state: None,
        }
    }

    /// Advance one host tick
    pub fn tick(&mut self, state: TaskState) {
        self.ticks += 1;
        if self.last_state != Some(state) {
            self.bar.set_prefix(format!("{state:?}").to_lowercase());
            self.last_state = Some(state);
        }
        self.bar.tick();
    }

    /// Number of ticks so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Remove the spinner
    pub fn finish(&self) {
        self.bar.finish_and_clear();
        tracing::trace!("Host loop ran {} ticks", self.ticks);
    }
}
