//! The fetch worker: validates, retrieves, stores, and tracks one URL fetch.
//!
//! State sequence per job:
//!
//! ```text
//! accepted        tracker entry created `pending` (durable row already pending)
//! slot claimed    tracker + durable row -> `processing`
//! probe/fetch     HEAD then GET, full body buffered in memory
//! persist         scratch file write, object-store upload
//! terminal        `completed` + storage_path, or `failed` + error_message
//! ```
//!
//! The scratch directory is removed on every exit path. Nothing is retried;
//! the first error terminates the job.

use std::sync::Arc;

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use tokio::task::JoinHandle;

use clookit_core::downloads::{download_object_key, resolve_filename};
use clookit_core::error::CoreError;
use clookit_core::types::DbId;
use clookit_db::models::status::JobStatus;
use clookit_db::repositories::DownloadRepo;
use clookit_db::DbPool;
use clookit_storage::ObjectStorage;

use crate::progress::{DownloadProgress, ProgressTracker};
use crate::queue::DownloadQueue;

/// Everything the worker needs to know about one accepted job.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub id: DbId,
    pub user_id: DbId,
    pub url: String,
}

/// Accept a fetch job: register it with the tracker and hand it to the
/// queue.
///
/// Returns the detached task handle. The caller's response is "accepted,
/// not completed": failures are recorded on the durable row and in the
/// tracker, never reported back through the creating request.
pub async fn spawn_download(
    queue: &DownloadQueue,
    tracker: Arc<ProgressTracker>,
    pool: DbPool,
    storage: ObjectStorage,
    http: reqwest::Client,
    task: DownloadTask,
) -> JoinHandle<Result<(), CoreError>> {
    tracker.set(task.id, DownloadProgress::pending()).await;
    tracing::info!(
        job_id = %task.id,
        user_id = %task.user_id,
        url = %task.url,
        "Download accepted"
    );

    queue.spawn(async move {
        let result = run_download(&pool, &storage, &tracker, &http, &task).await;

        if let Err(ref error) = result {
            tracing::error!(
                job_id = %task.id,
                user_id = %task.user_id,
                %error,
                "Download failed"
            );
            if let Err(db_error) =
                DownloadRepo::mark_failed(&pool, task.id, &error.to_string()).await
            {
                tracing::error!(job_id = %task.id, %db_error, "Failed to record download failure");
            }
            let progress = tracker
                .get(task.id)
                .await
                .unwrap_or_else(DownloadProgress::pending);
            tracker
                .set(task.id, progress.with_status(JobStatus::Failed))
                .await;
        }

        result
    })
}

/// Execute the fetch sequence for a job that has claimed a queue slot.
async fn run_download(
    pool: &DbPool,
    storage: &ObjectStorage,
    tracker: &ProgressTracker,
    http: &reqwest::Client,
    task: &DownloadTask,
) -> Result<(), CoreError> {
    // Slot claimed: both the tracker and the durable row move to processing.
    tracker
        .set(
            task.id,
            DownloadProgress::pending().with_status(JobStatus::Processing),
        )
        .await;
    DownloadRepo::update_status(pool, task.id, JobStatus::Processing)
        .await
        .map_err(|e| CoreError::Internal(format!("status update: {e}")))?;
    tracing::info!(job_id = %task.id, "Download processing");

    // Existence probe before committing to the full transfer.
    let probe = http
        .head(&task.url)
        .send()
        .await
        .map_err(|e| CoreError::Fetch(classify_fetch_error(&e)))?;
    if !probe.status().is_success() {
        return Err(CoreError::Fetch(format!(
            "Site returned status code {}",
            probe.status().as_u16()
        )));
    }

    // Retrieve the full body into memory.
    let response = http
        .get(&task.url)
        .send()
        .await
        .map_err(|e| CoreError::Fetch(classify_fetch_error(&e)))?;
    if !response.status().is_success() {
        return Err(CoreError::Fetch(format!(
            "Site returned status code {}",
            response.status().as_u16()
        )));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    let content_disposition = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = response
        .bytes()
        .await
        .map_err(|e| CoreError::Fetch(classify_fetch_error(&e)))?
        .to_vec();

    let filename = resolve_filename(content_disposition.as_deref(), &task.url);
    tracing::info!(
        job_id = %task.id,
        filename = %filename,
        size = body.len(),
        "Resource fetched"
    );

    tracker
        .set(
            task.id,
            DownloadProgress {
                total_files: 1,
                downloaded_files: 1,
                status: JobStatus::Processing,
            },
        )
        .await;

    // Stage the payload in a scratch directory, then upload. The TempDir
    // guard removes the directory on every exit path.
    let scratch =
        tempfile::tempdir().map_err(|e| CoreError::Internal(format!("scratch dir: {e}")))?;
    let scratch_path = scratch.path().join(&filename);
    tokio::fs::write(&scratch_path, &body)
        .await
        .map_err(|e| CoreError::Internal(format!("scratch write: {e}")))?;

    let key = download_object_key(task.user_id, task.id, &filename);
    tracing::info!(job_id = %task.id, storage_path = %key, "Uploading to storage");
    storage
        .upload(&key, body, &content_type)
        .await
        .map_err(|e| CoreError::UpstreamStorage(e.to_string()))?;

    DownloadRepo::mark_completed(pool, task.id, &key)
        .await
        .map_err(|e| CoreError::Internal(format!("completion update: {e}")))?;
    tracker
        .set(
            task.id,
            DownloadProgress {
                total_files: 1,
                downloaded_files: 1,
                status: JobStatus::Completed,
            },
        )
        .await;

    tracing::info!(job_id = %task.id, storage_path = %key, "Download complete");
    Ok(())
}

/// Render a transport error with its full source chain, then classify it.
fn classify_fetch_error(err: &reqwest::Error) -> String {
    let mut detail = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    classify_fetch_failure(&detail)
}

/// Map recognizable connection failures to user-facing messages; everything
/// else passes through verbatim.
pub fn classify_fetch_failure(detail: &str) -> String {
    let lower = detail.to_lowercase();
    if lower.contains("dns error")
        || lower.contains("failed to lookup")
        || lower.contains("name or service not known")
    {
        "Site not found. Check that the URL is correct.".to_string()
    } else if lower.contains("certificate") || lower.contains("tls") || lower.contains("ssl") {
        "Site not found or invalid TLS certificate. Check that the URL is correct.".to_string()
    } else {
        detail.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dns_failures_become_not_found() {
        let msg = classify_fetch_failure(
            "error sending request: dns error: failed to lookup address information",
        );
        assert_eq!(msg, "Site not found. Check that the URL is correct.");
    }

    #[test]
    fn certificate_failures_are_called_out() {
        let msg = classify_fetch_failure(
            "error sending request: invalid peer certificate: NotValidForName",
        );
        assert_eq!(
            msg,
            "Site not found or invalid TLS certificate. Check that the URL is correct."
        );
    }

    #[test]
    fn other_failures_pass_through_verbatim() {
        let msg = classify_fetch_failure("connection reset by peer");
        assert_eq!(msg, "connection reset by peer");
    }
}
