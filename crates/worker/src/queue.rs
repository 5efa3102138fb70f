//! Bounded admission queue for fetch tasks.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Default concurrent-fetch ceiling.
pub const DEFAULT_CONCURRENCY: usize = 2;

/// Limits how many fetch tasks run at once.
///
/// Submissions beyond the ceiling wait for a free slot in arrival order
/// (the semaphore queues waiters fairly). A task's failure releases only its
/// own permit; sibling tasks are unaffected. There is no priority, no
/// cancellation, and no backpressure signal beyond the queueing itself.
#[derive(Debug, Clone)]
pub struct DownloadQueue {
    semaphore: Arc<Semaphore>,
    concurrency: usize,
}

impl DownloadQueue {
    pub fn new(concurrency: usize) -> Self {
        assert!(concurrency > 0, "queue concurrency must be positive");
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        }
    }

    /// Configured concurrency ceiling.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Spawn a task that runs once a slot frees up.
    ///
    /// Returns the detached handle; callers that fire-and-forget simply drop
    /// it. The semaphore is never closed, so acquisition cannot fail.
    pub fn spawn<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: std::future::Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let semaphore = Arc::clone(&self.semaphore);
        tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("download queue semaphore is never closed");
            task.await
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
