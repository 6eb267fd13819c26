//! Run orchestration
//!
//! Selects an ingestion strategy, times it and turns the digest into a
//! [`DigestReport`]. For the mapped strategy the orchestrator also plays the
//! host loop: it polls the background task once per tick and never blocks
//! until the task reports completion.

use super::streaming::StreamingRunner;
use super::task::{BackgroundHashTask, HashWorker, TaskHandle, TaskState};
use crate::config::{RunConfig, RunMode, Strategy, HOST_TICK};
use crate::error::{DigestError, IoResultExt, Result};
use crate::fs::MappedView;
use crate::hash::Digest;
use crate::progress::DigestReport;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Drives one or both strategies over a file
pub struct Orchestrator {
    streaming: StreamingRunner,
    /// Spawned on first mapped run
    worker: Option<HashWorker>,
}

impl Orchestrator {
    /// Create an orchestrator. The background worker starts lazily.
    pub fn new() -> Self {
        Self {
            streaming: StreamingRunner::new(),
            worker: None,
        }
    }

    fn worker(&mut self) -> Result<&HashWorker> {
        if self.worker.is_none() {
            self.worker = Some(HashWorker::spawn()?);
        }
        self.worker
            .as_ref()
            .ok_or_else(|| DigestError::worker("worker unavailable"))
    }

    /// Digest `path` with buffered reads on this thread
    pub fn run_streaming(&self, path: &Path) -> Result<DigestReport> {
        let start = Instant::now();
        let size = std::fs::metadata(path).with_path(path)?.len();
        let digest = self.streaming.hash_file(path)?;
        let elapsed = start.elapsed();

        Ok(DigestReport::new(Strategy::Streaming, path, size, elapsed, digest))
    }

    /// Digest `path` through a mapped view hashed on the background worker.
    ///
    /// `on_tick` is the host loop body, called once per `tick` while the
    /// task is outstanding.
    pub fn run_mapped<F>(
        &mut self,
        path: &Path,
        tick: Duration,
        mut on_tick: F,
    ) -> Result<DigestReport>
    where
        F: FnMut(TaskState),
    {
        let start = Instant::now();

        let view = Arc::new(MappedView::open(path)?);
        let size = view.len() as u64;
        let handle = BackgroundHashTask::new(Arc::clone(&view)).schedule(self.worker()?)?;

        let digest = poll_until_complete(handle, tick, &mut on_tick)?;
        let elapsed = start.elapsed();

        // The worker dropped its reference before completing, so the owner
        // holds the only one now.
        match Arc::try_unwrap(view) {
            Ok(view) => view.close(),
            Err(_) => tracing::warn!("Mapped view of {} still shared after join", path.display()),
        }

        Ok(DigestReport::new(Strategy::Mapped, path, size, elapsed, digest))
    }

    /// Run both strategies and require identical digests
    pub fn run_compare<F>(
        &mut self,
        path: &Path,
        tick: Duration,
        on_tick: F,
    ) -> Result<[DigestReport; 2]>
    where
        F: FnMut(TaskState),
    {
        let streamed = self.run_streaming(path)?;
        let mapped = self.run_mapped(path, tick, on_tick)?;

        if streamed.digest != mapped.digest {
            return Err(DigestError::mismatch(
                path,
                streamed.digest.to_hex(),
                mapped.digest.to_hex(),
            ));
        }
        Ok([streamed, mapped])
    }

    /// Execute the run described by `config`, polling the mapped task once
    /// per [`HOST_TICK`]
    pub fn execute<F>(&mut self, config: &RunConfig, on_tick: F) -> Result<Vec<DigestReport>>
    where
        F: FnMut(TaskState),
    {
        tracing::debug!("Running {:?} on {}", config.mode, config.path.display());

        let reports = match config.mode {
            RunMode::Single(Strategy::Streaming) => vec![self.run_streaming(&config.path)?],
            RunMode::Single(Strategy::Mapped) => {
                vec![self.run_mapped(&config.path, HOST_TICK, on_tick)?]
            }
            RunMode::Compare => self.run_compare(&config.path, HOST_TICK, on_tick)?.to_vec(),
        };
        Ok(reports)
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Host loop: poll without blocking once per tick, then collect the digest
fn poll_until_complete<F>(handle: TaskHandle, tick: Duration, on_tick: &mut F) -> Result<Digest>
where
    F: FnMut(TaskState),
{
    while !handle.is_completed() {
        if handle.is_abandoned() {
            break;
        }
        on_tick(handle.state());
        thread::sleep(tick);
    }
    handle.join()
}
