//! In-process progress tracking for fetch jobs.
//!
//! The tracker is a bounded shadow of the durable `downloads` rows: while a
//! fetch is in flight its entry here is more current than the database row,
//! and the read paths reconcile against it. Entries survive until evicted;
//! the durable row remains the source of truth afterwards.

use std::collections::HashMap;

use tokio::sync::RwLock;

use clookit_core::types::DbId;
use clookit_db::models::status::JobStatus;

/// Default maximum number of tracked jobs.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Ephemeral per-job progress. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    pub total_files: u32,
    pub downloaded_files: u32,
    pub status: JobStatus,
}

impl DownloadProgress {
    /// Fresh entry for a job that has been accepted but not yet claimed.
    pub fn pending() -> Self {
        Self {
            total_files: 0,
            downloaded_files: 0,
            status: JobStatus::Pending,
        }
    }

    /// Same counters, new status.
    pub fn with_status(self, status: JobStatus) -> Self {
        Self { status, ..self }
    }
}

#[derive(Debug, Clone)]
struct Tracked {
    progress: DownloadProgress,
    /// Insertion sequence; eviction removes the lowest.
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<DbId, Tracked>,
    next_seq: u64,
}

/// Bounded process-wide map from job id to in-flight progress.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared between the fetch workers and the read handlers.
///
/// When the map is full and a new job arrives, the oldest entry in a
/// terminal state is evicted; if every entry is still in flight, the oldest
/// entry overall goes.
#[derive(Debug)]
pub struct ProgressTracker {
    inner: RwLock<Inner>,
    capacity: usize,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ProgressTracker {
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "tracker capacity must be positive");
        Self {
            inner: RwLock::new(Inner::default()),
            capacity,
        }
    }

    /// Current progress for a job, if tracked.
    pub async fn get(&self, job_id: DbId) -> Option<DownloadProgress> {
        self.inner.read().await.entries.get(&job_id).map(|t| t.progress)
    }

    /// Insert or update a job's progress.
    ///
    /// Updates keep their original insertion order for eviction purposes.
    pub async fn set(&self, job_id: DbId, progress: DownloadProgress) {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner.entries.get_mut(&job_id) {
            existing.progress = progress;
            return;
        }

        if inner.entries.len() >= self.capacity {
            Self::evict_one(&mut inner);
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(job_id, Tracked { progress, seq });
    }

    /// Number of tracked jobs.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }

    /// Drop the oldest terminal entry, or the oldest entry overall if every
    /// tracked job is still in flight.
    fn evict_one(inner: &mut Inner) {
        let victim = inner
            .entries
            .iter()
            .filter(|(_, t)| t.progress.status.is_terminal())
            .min_by_key(|(_, t)| t.seq)
            .or_else(|| inner.entries.iter().min_by_key(|(_, t)| t.seq))
            .map(|(id, _)| *id);

        if let Some(id) = victim {
            tracing::debug!(job_id = %id, "Progress tracker evicting entry");
            inner.entries.remove(&id);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn get_returns_what_was_set() {
        let tracker = ProgressTracker::default();
        let id = Uuid::new_v4();

        assert!(tracker.get(id).await.is_none());

        tracker.set(id, DownloadProgress::pending()).await;
        assert_eq!(tracker.get(id).await, Some(DownloadProgress::pending()));
    }

    #[tokio::test]
    async fn updates_mutate_in_place() {
        let tracker = ProgressTracker::with_capacity(1);
        let id = Uuid::new_v4();

        tracker.set(id, DownloadProgress::pending()).await;
        tracker
            .set(
                id,
                DownloadProgress::pending().with_status(JobStatus::Processing),
            )
            .await;

        assert_eq!(tracker.len().await, 1);
        assert_eq!(
            tracker.get(id).await.unwrap().status,
            JobStatus::Processing
        );
    }

    #[tokio::test]
    async fn eviction_prefers_oldest_terminal_entry() {
        let tracker = ProgressTracker::with_capacity(2);
        let done = Uuid::new_v4();
        let active = Uuid::new_v4();
        let fresh = Uuid::new_v4();

        tracker
            .set(
                done,
                DownloadProgress::pending().with_status(JobStatus::Completed),
            )
            .await;
        tracker
            .set(
                active,
                DownloadProgress::pending().with_status(JobStatus::Processing),
            )
            .await;

        // Third insert evicts the completed entry, not the in-flight one.
        tracker.set(fresh, DownloadProgress::pending()).await;

        assert!(tracker.get(done).await.is_none());
        assert!(tracker.get(active).await.is_some());
        assert!(tracker.get(fresh).await.is_some());
    }

    #[tokio::test]
    async fn eviction_falls_back_to_oldest_when_all_in_flight() {
        let tracker = ProgressTracker::with_capacity(2);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let third = Uuid::new_v4();

        tracker
            .set(
                first,
                DownloadProgress::pending().with_status(JobStatus::Processing),
            )
            .await;
        tracker
            .set(
                second,
                DownloadProgress::pending().with_status(JobStatus::Processing),
            )
            .await;
        tracker.set(third, DownloadProgress::pending()).await;

        assert!(tracker.get(first).await.is_none());
        assert!(tracker.get(second).await.is_some());
        assert_eq!(tracker.len().await, 2);
    }
}
