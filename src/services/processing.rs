//! Simulated background processing.
//!
//! Nothing is actually processed: each task sleeps for a fixed delay and then
//! runs its completion. Tasks are registered under a [`TaskToken`] so they can
//! be awaited, cancelled, or coalesced when triggers overlap.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// What a processing task is pretending to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Runs after files are received.
    FileProcessing,
    /// Runs after quiz generation is requested.
    QuizGeneration,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::FileProcessing => f.write_str("file-processing"),
            TaskKind::QuizGeneration => f.write_str("quiz-generation"),
        }
    }
}

/// Identifies one scheduled task. Tokens increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskToken(u64);

impl TaskToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// A registered task. `done` flips to true once the completion has run; an
/// aborted task drops its sender instead.
#[derive(Debug)]
struct TaskEntry {
    kind: TaskKind,
    handle: JoinHandle<()>,
    done: watch::Receiver<bool>,
}

type TaskMap = BTreeMap<TaskToken, TaskEntry>;

/// Registry of pending processing tasks.
///
/// A task stays registered until it finishes or is cancelled. Waiting on it
/// never removes it, so an abandoned wait leaves it cancellable.
#[derive(Debug)]
pub struct ProcessingTasks {
    next_token: AtomicU64,
    tasks: Arc<Mutex<TaskMap>>,
    coalesce: bool,
}

impl ProcessingTasks {
    /// Independent tasks: overlapping triggers each run to completion.
    pub fn new() -> Self {
        Self::with_coalescing(false)
    }

    /// With `coalesce`, scheduling a task cancels every task still pending.
    pub fn with_coalescing(coalesce: bool) -> Self {
        Self {
            next_token: AtomicU64::new(1),
            tasks: Arc::new(Mutex::new(BTreeMap::new())),
            coalesce,
        }
    }

    pub fn coalesces(&self) -> bool {
        self.coalesce
    }

    fn lock(tasks: &Mutex<TaskMap>) -> MutexGuard<'_, TaskMap> {
        // A panicking completion cannot leave the map half-updated.
        tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Schedule `completion` to run after `delay`.
    pub fn schedule<F>(&self, kind: TaskKind, delay: Duration, completion: F) -> TaskToken
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.coalesce {
            let cancelled = self.cancel_all();
            if cancelled > 0 {
                debug!("Coalesced {} pending task(s) into new {} task", cancelled, kind);
            }
        }

        let token = TaskToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        let registry = Arc::clone(&self.tasks);
        let (done_tx, done) = watch::channel(false);

        // Hold the lock across spawn so the task cannot deregister before it
        // has been registered.
        let mut tasks = Self::lock(&self.tasks);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            completion.await;
            Self::lock(&registry).remove(&token);
            done_tx.send_replace(true);
            debug!("{} {} finished", kind, token);
        });
        tasks.insert(token, TaskEntry { kind, handle, done });
        drop(tasks);

        debug!("Scheduled {} {} in {:?}", kind, token, delay);
        token
    }

    /// Cancel one pending task. Returns false if it already finished.
    pub fn cancel(&self, token: TaskToken) -> bool {
        let entry = Self::lock(&self.tasks).remove(&token);
        match entry {
            Some(entry) => {
                entry.handle.abort();
                debug!("Cancelled {} {}", entry.kind, token);
                true
            }
            None => false,
        }
    }

    /// Cancel every pending task, returning how many were cancelled.
    pub fn cancel_all(&self) -> usize {
        let drained = std::mem::take(&mut *Self::lock(&self.tasks));
        let count = drained.len();
        for entry in drained.into_values() {
            entry.handle.abort();
        }
        count
    }

    async fn wait_done(mut done: watch::Receiver<bool>) -> bool {
        // The sender is dropped without sending when the task is aborted.
        let finished = done.wait_for(|finished| *finished).await.is_ok();
        finished
    }

    /// Wait for a task to finish.
    ///
    /// Returns true if the task ran its completion, false if it was cancelled
    /// or was not pending at the time of the call. Dropping the returned
    /// future leaves the task registered.
    pub async fn join(&self, token: TaskToken) -> bool {
        let done = Self::lock(&self.tasks).get(&token).map(|e| e.done.clone());
        match done {
            Some(done) => Self::wait_done(done).await,
            None => false,
        }
    }

    /// Wait for every task pending at the time of the call.
    pub async fn join_all(&self) -> usize {
        let waits: Vec<_> = Self::lock(&self.tasks)
            .values()
            .map(|e| e.done.clone())
            .collect();
        let mut completed = 0;
        for done in waits {
            if Self::wait_done(done).await {
                completed += 1;
            }
        }
        completed
    }

    pub fn is_pending(&self, token: TaskToken) -> bool {
        Self::lock(&self.tasks).contains_key(&token)
    }

    /// Tokens of pending tasks, oldest first.
    pub fn pending(&self) -> Vec<(TaskToken, TaskKind)> {
        Self::lock(&self.tasks)
            .iter()
            .map(|(token, entry)| (*token, entry.kind))
            .collect()
    }
}

impl Default for ProcessingTasks {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProcessingTasks {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
