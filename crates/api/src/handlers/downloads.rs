//! Handlers for the `/downloads` resource.
//!
//! Creation is "accepted, not completed": the fetch runs as a detached task
//! and failures are only visible on subsequent reads. Reads reconcile the
//! durable row against the in-process progress tracker, which is more
//! current while a fetch is in flight.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use clookit_core::downloads::validate_download_url;
use clookit_core::error::CoreError;
use clookit_core::types::DbId;
use clookit_db::models::download::{CreateDownload, Download};
use clookit_db::repositories::DownloadRepo;
use clookit_worker::{spawn_download, DownloadTask};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /downloads`.
#[derive(Debug, Deserialize)]
pub struct CreateDownloadRequest {
    pub url: String,
}

/// Simple acknowledgement body for delete/cancel.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

// ---------------------------------------------------------------------------
// POST /downloads
// ---------------------------------------------------------------------------

/// Create a fetch job and hand it to the download queue.
///
/// Responds 202 with the pending row: the work continues after this request
/// returns, and failures are recorded on the row, never reported here.
pub async fn create_download(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateDownloadRequest>,
) -> AppResult<impl IntoResponse> {
    validate_download_url(&input.url)?;

    let download = DownloadRepo::create(
        &state.pool,
        &CreateDownload {
            user_id: user.id,
            url: input.url,
        },
    )
    .await?;

    // Detached task: the handle is tracked by job id in the tracker/row,
    // not awaited here.
    let _handle = spawn_download(
        &state.queue,
        Arc::clone(&state.tracker),
        state.pool.clone(),
        state.storage.clone(),
        state.http.clone(),
        DownloadTask {
            id: download.id,
            user_id: user.id,
            url: download.url.clone(),
        },
    )
    .await;

    tracing::info!(
        job_id = %download.id,
        user_id = %user.id,
        "Download job created",
    );

    Ok((StatusCode::ACCEPTED, Json(download)))
}

// ---------------------------------------------------------------------------
// GET /downloads/{id}
// ---------------------------------------------------------------------------

/// Get a single download, reconciled against the progress tracker.
///
/// When a tracker entry exists its status is written back to the durable
/// row before the row is returned.
pub async fn get_download(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Download>> {
    let mut download = DownloadRepo::find_for_user(&state.pool, id, user.id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Download",
            id,
        })?;

    if let Some(progress) = state.tracker.get(download.id).await {
        if progress.status != download.status {
            tracing::debug!(
                job_id = %download.id,
                tracked = %progress.status.as_str(),
                stored = %download.status.as_str(),
                "Reconciling download status from tracker",
            );
            DownloadRepo::update_status(&state.pool, download.id, progress.status).await?;
            download.status = progress.status;
        }
    }

    Ok(Json(download))
}

// ---------------------------------------------------------------------------
// GET /downloads
// ---------------------------------------------------------------------------

/// List the user's downloads, newest first, tracker-reconciled in memory.
pub async fn list_downloads(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Download>>> {
    let mut downloads = DownloadRepo::list_for_user(&state.pool, user.id).await?;

    for download in &mut downloads {
        if let Some(progress) = state.tracker.get(download.id).await {
            download.status = progress.status;
        }
    }

    Ok(Json(downloads))
}

// ---------------------------------------------------------------------------
// DELETE /downloads/{id}
// ---------------------------------------------------------------------------

/// Delete a download row and its stored object, if any.
///
/// Storage removal is best-effort: a failure is logged and the row is
/// deleted anyway.
pub async fn delete_download(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SuccessResponse>> {
    let download = DownloadRepo::find_for_user(&state.pool, id, user.id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Download",
            id,
        })?;

    if let Some(path) = &download.storage_path {
        if let Err(error) = state.storage.remove(std::slice::from_ref(path)).await {
            tracing::error!(job_id = %id, %error, "Failed to delete stored object");
        }
    }

    DownloadRepo::delete_for_user(&state.pool, id, user.id).await?;
    tracing::info!(job_id = %id, user_id = %user.id, "Download deleted");

    Ok(Json(SuccessResponse { success: true }))
}

// ---------------------------------------------------------------------------
// POST /downloads/{id}/cancel
// ---------------------------------------------------------------------------

/// Cancel a download.
///
/// This only flips the stored status to `failed` so the job is no longer
/// treated as active; an in-flight fetch is NOT interrupted and may still
/// overwrite the status when it finishes.
pub async fn cancel_download(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SuccessResponse>> {
    let updated = DownloadRepo::update_status_for_user(
        &state.pool,
        id,
        user.id,
        clookit_db::models::status::JobStatus::Failed,
    )
    .await?;

    if !updated {
        return Err(CoreError::NotFound {
            entity: "Download",
            id,
        }
        .into());
    }

    tracing::info!(job_id = %id, user_id = %user.id, "Download cancelled");
    Ok(Json(SuccessResponse { success: true }))
}
