//! Background digest task
//!
//! A single unit of work (initialize, one update over a mapped view,
//! finalize) is queued onto a dedicated worker thread. The scheduling side
//! keeps a [`TaskHandle`] it can poll without blocking from its own loop, or
//! join when it is ready to wait.
//!
//! Once scheduled, a task always runs to completion. There is no cancel
//! and no timeout.

use crate::error::{DigestError, Result};
use crate::fs::MappedView;
use crate::hash::{Digest, Sha256};
use crossbeam::channel::{bounded, unbounded, Receiver, Sender, TryRecvError};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;

const SCHEDULED: u8 = 0;
const RUNNING: u8 = 1;
const COMPLETED: u8 = 2;

/// Lifecycle of a background task. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Queued, not yet picked up by the worker
    Scheduled,
    /// Hashing on the worker thread
    Running,
    /// Digest written and visible to the scheduling thread
    Completed,
}

impl TaskState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            SCHEDULED => Self::Scheduled,
            RUNNING => Self::Running,
            _ => Self::Completed,
        }
    }
}

/// State shared between the worker and the handle
struct TaskShared {
    state: AtomicU8,
    /// Written once by the worker, before `state` becomes `COMPLETED`
    digest: OnceLock<Digest>,
}

/// A queued job as seen by the worker thread
struct HashJob {
    id: u64,
    view: Arc<MappedView>,
    shared: Arc<TaskShared>,
    done: Sender<()>,
}

impl HashJob {
    fn run(self) {
        let HashJob {
            id,
            view,
            shared,
            done,
        } = self;

        shared.state.store(RUNNING, Ordering::Release);
        tracing::debug!("Task {} running over {} bytes", id, view.len());

        let mut hasher = Sha256::new();
        hasher.update(view.as_slice());
        let digest = hasher.finalize();

        // Give the view back before announcing completion so the owner can
        // reclaim it as soon as it observes the task finished.
        drop(view);

        if shared.digest.set(digest).is_err() {
            tracing::warn!("Task {} digest slot was already written", id);
        }
        shared.state.store(COMPLETED, Ordering::Release);
        let _ = done.send(());

        tracing::debug!("Task {} completed", id);
    }
}

/// The single background thread that executes digest tasks in FIFO order.
///
/// Dropping the worker closes its queue and waits for queued tasks to
/// finish.
pub struct HashWorker {
    sender: Option<Sender<HashJob>>,
    handle: Option<thread::JoinHandle<()>>,
    next_task_id: AtomicU64,
}

impl HashWorker {
    /// Start the worker thread
    pub fn spawn() -> Result<Self> {
        let (sender, receiver) = unbounded::<HashJob>();

        let handle = thread::Builder::new()
            .name("digest-worker".to_string())
            .spawn(move || {
                tracing::debug!("Digest worker started");
                while let Ok(job) = receiver.recv() {
                    job.run();
                }
                tracing::debug!("Digest worker shutting down");
            })
            .map_err(|e| DigestError::worker(format!("failed to spawn worker thread: {e}")))?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
            next_task_id: AtomicU64::new(0),
        })
    }

    fn submit(&self, job: HashJob) -> Result<()> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| DigestError::worker("worker has shut down"))?;
        sender
            .send(job)
            .map_err(|_| DigestError::worker("worker is no longer accepting tasks"))
    }
}

impl Drop for HashWorker {
    fn drop(&mut self) {
        drop(self.sender.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Digest worker panicked");
            }
        }
    }
}

/// One digest run over a mapped view, ready to be scheduled.
///
/// The task shares the view read-only. Scheduling consumes the task, so a
/// task can be run at most once.
pub struct BackgroundHashTask {
    view: Arc<MappedView>,
}

impl BackgroundHashTask {
    /// Prepare a task over `view`
    pub fn new(view: Arc<MappedView>) -> Self {
        Self { view }
    }

    /// Queue the task on `worker` and return immediately
    pub fn schedule(self, worker: &HashWorker) -> Result<TaskHandle> {
        let id = worker.next_task_id.fetch_add(1, Ordering::Relaxed);
        let shared = Arc::new(TaskShared {
            state: AtomicU8::new(SCHEDULED),
            digest: OnceLock::new(),
        });
        let (done_tx, done_rx) = bounded(1);

        tracing::debug!(
            "Scheduling task {} for {} ({} bytes)",
            id,
            self.view.path().display(),
            self.view.len()
        );

        worker.submit(HashJob {
            id,
            view: self.view,
            shared: Arc::clone(&shared),
            done: done_tx,
        })?;

        Ok(TaskHandle {
            id,
            shared,
            done: done_rx,
        })
    }
}

/// Caller-side handle to a scheduled task
pub struct TaskHandle {
    id: u64,
    shared: Arc<TaskShared>,
    done: Receiver<()>,
}

impl TaskHandle {
    /// Task identifier, unique per worker
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current lifecycle state. Never blocks.
    pub fn state(&self) -> TaskState {
        TaskState::from_raw(self.shared.state.load(Ordering::Acquire))
    }

    /// Whether the digest has been written. Never blocks.
    ///
    /// A `true` result synchronizes with the worker's write, so
    /// [`digest`](Self::digest) returns the complete value afterwards.
    pub fn is_completed(&self) -> bool {
        self.state() == TaskState::Completed
    }

    /// The digest, once the task has completed
    pub fn digest(&self) -> Option<Digest> {
        if self.is_completed() {
            self.shared.digest.get().copied()
        } else {
            None
        }
    }

    /// Whether the task can no longer complete because its job was dropped
    /// or the worker died while running it. Never blocks.
    pub fn is_abandoned(&self) -> bool {
        !self.is_completed() && matches!(self.done.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Block until the task completes and return its digest
    pub fn join(self) -> Result<Digest> {
        // A closed channel without a message means the job was dropped or
        // the worker died mid-task.
        let _ = self.done.recv();

        self.shared.digest.get().copied().ok_or_else(|| {
            DigestError::worker(format!("task {} stopped before completing", self.id))
        })
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}
