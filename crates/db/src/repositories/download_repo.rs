//! Repository for the `downloads` table.

use sqlx::PgPool;

use clookit_core::types::DbId;

use crate::models::download::{CreateDownload, Download};
use crate::models::status::JobStatus;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, url, status, storage_path, error_message, created_at, updated_at";

/// Provides CRUD and status management for download jobs.
pub struct DownloadRepo;

impl DownloadRepo {
    /// Insert a new download job in `pending` state. Returns the created row.
    pub async fn create(pool: &PgPool, input: &CreateDownload) -> Result<Download, sqlx::Error> {
        let query = format!(
            "INSERT INTO downloads (user_id, url)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Download>(&query)
            .bind(input.user_id)
            .bind(&input.url)
            .fetch_one(pool)
            .await
    }

    /// Find a download by ID, scoped to its owner.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Download>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM downloads WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Download>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List all downloads for a user, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Download>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM downloads WHERE user_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Download>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update the status of a download (worker-side, not owner-scoped).
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: JobStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE downloads SET status = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update the status of a download, scoped to its owner (cancel path).
    pub async fn update_status_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        status: JobStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE downloads SET status = $3, updated_at = now()
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .bind(status)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a download as completed with its final storage path.
    pub async fn mark_completed(
        pool: &PgPool,
        id: DbId,
        storage_path: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE downloads SET status = $2, storage_path = $3, updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(JobStatus::Completed)
        .bind(storage_path)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a download as failed, recording the error message.
    pub async fn mark_failed(
        pool: &PgPool,
        id: DbId,
        error_message: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE downloads SET status = $2, error_message = $3, updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(JobStatus::Failed)
        .bind(error_message)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a download row, scoped to its owner.
    pub async fn delete_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM downloads WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
