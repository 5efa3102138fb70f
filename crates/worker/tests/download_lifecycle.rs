//! Fetch-worker lifecycle tests against a real database.
//!
//! These exercise the failure path end to end: an unreachable host must
//! leave the durable row `failed` with no storage path, and the tracker
//! must agree. The storage client is never reached on this path.

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use sqlx::PgPool;
use uuid::Uuid;

use clookit_core::error::CoreError;
use clookit_db::models::download::CreateDownload;
use clookit_db::models::status::JobStatus;
use clookit_db::repositories::DownloadRepo;
use clookit_storage::{ObjectStorage, StorageConfig};
use clookit_worker::{spawn_download, DownloadQueue, DownloadTask, ProgressTracker};

/// Storage client pointing nowhere; fine for paths that fail before upload.
async fn unreachable_storage() -> ObjectStorage {
    ObjectStorage::connect(&StorageConfig {
        endpoint: "http://127.0.0.1:1".to_string(),
        region: "local".to_string(),
        access_key: "test".to_string(),
        secret_key: "test".to_string(),
        bucket: "pages".to_string(),
    })
    .await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unreachable_host_marks_job_failed(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let row = DownloadRepo::create(
        &pool,
        &CreateDownload {
            user_id,
            // .invalid never resolves, so the existence probe fails.
            url: "https://clookit-test.invalid/file.pdf".to_string(),
        },
    )
    .await
    .unwrap();

    let tracker = Arc::new(ProgressTracker::default());
    let queue = DownloadQueue::new(1);

    let handle = spawn_download(
        &queue,
        Arc::clone(&tracker),
        pool.clone(),
        unreachable_storage().await,
        reqwest::Client::new(),
        DownloadTask {
            id: row.id,
            user_id,
            url: row.url.clone(),
        },
    )
    .await;

    let result = handle.await.unwrap();
    assert_matches!(result, Err(CoreError::Fetch(_)));

    let updated = DownloadRepo::find_for_user(&pool, row.id, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, JobStatus::Failed);
    assert!(updated.storage_path.is_none());
    assert!(updated.error_message.is_some());

    let progress = tracker.get(row.id).await.unwrap();
    assert_eq!(progress.status, JobStatus::Failed);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn queued_job_stays_pending_until_slot_frees(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let row = DownloadRepo::create(
        &pool,
        &CreateDownload {
            user_id,
            url: "https://clookit-test.invalid/file.pdf".to_string(),
        },
    )
    .await
    .unwrap();

    let tracker = Arc::new(ProgressTracker::default());
    let queue = DownloadQueue::new(1);

    // Occupy the only slot so the download must wait in the queue.
    let blocker = queue.spawn(async {
        tokio::time::sleep(Duration::from_millis(150)).await;
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    let handle = spawn_download(
        &queue,
        Arc::clone(&tracker),
        pool.clone(),
        unreachable_storage().await,
        reqwest::Client::new(),
        DownloadTask {
            id: row.id,
            user_id,
            url: row.url.clone(),
        },
    )
    .await;

    // Accepted but not yet claimed: tracker pending, durable row pending.
    assert_eq!(
        tracker.get(row.id).await.unwrap().status,
        JobStatus::Pending
    );
    let current = DownloadRepo::find_for_user(&pool, row.id, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.status, JobStatus::Pending);

    blocker.await.unwrap();
    let _ = handle.await.unwrap();

    // Only after the slot freed did the job run (and fail on DNS).
    let finished = DownloadRepo::find_for_user(&pool, row.id, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(finished.status, JobStatus::Failed);
}
