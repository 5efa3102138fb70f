//! Download job entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use clookit_core::types::{DbId, Timestamp};

use crate::models::status::JobStatus;

/// A row from the `downloads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Download {
    pub id: DbId,
    pub user_id: DbId,
    pub url: String,
    pub status: JobStatus,
    pub storage_path: Option<String>,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new download job record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDownload {
    pub user_id: DbId,
    pub url: String,
}
