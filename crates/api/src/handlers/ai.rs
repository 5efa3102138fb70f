//! Handlers for the `/api/ai` resource.

use axum::extract::State;
use axum::Json;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use validator::Validate;

use clookit_core::types::{DbId, Timestamp};
use clookit_db::models::generation::Generation;
use clookit_db::models::status::JobStatus;
use clookit_db::repositories::GenerationRepo;
use clookit_worker::generation::{resign_output_urls, run_generation, GenerationRequest};

use crate::error::AppResult;
use crate::handlers::validation_error;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /api/ai/generate`.
///
/// Only prompt, negative prompt, and geometry are client-controlled; the
/// model tuning parameters are server-side constants.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRequest {
    #[validate(length(min = 1, message = "prompt must not be empty"))]
    pub prompt: String,
    pub negative_prompt: Option<String>,
    #[validate(range(min = 128, max = 2048, message = "width must be 128-2048"))]
    pub width: Option<i32>,
    #[validate(range(min = 128, max = 2048, message = "height must be 128-2048"))]
    pub height: Option<i32>,
}

/// Response body for a completed generation.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub id: DbId,
    pub urls: Vec<String>,
    pub prompt: String,
    pub status: JobStatus,
    pub created_at: Timestamp,
}

/// One listing entry: the stored row plus freshly signed artifact URLs.
#[derive(Debug, Serialize)]
pub struct GenerationEntry {
    #[serde(flatten)]
    pub generation: Generation,
    pub urls: Vec<String>,
}

// ---------------------------------------------------------------------------
// POST /api/ai/generate
// ---------------------------------------------------------------------------

/// Run one generation to completion and return its signed URLs.
///
/// This blocks for the whole inference + upload sequence; a failure
/// anywhere surfaces as 500 `generation_failed` (or `storage_failed`) with
/// the row already marked `failed`.
pub async fn generate(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<GenerateRequest>,
) -> AppResult<Json<GenerateResponse>> {
    input.validate().map_err(validation_error)?;

    tracing::info!(user_id = %user.id, prompt = %input.prompt, "Generate request received");

    let outcome = run_generation(
        &state.pool,
        &state.storage,
        &state.inference,
        GenerationRequest {
            user_id: user.id,
            prompt: input.prompt,
            negative_prompt: input.negative_prompt,
            width: input.width,
            height: input.height,
        },
    )
    .await?;

    Ok(Json(GenerateResponse {
        success: true,
        id: outcome.generation.id,
        urls: outcome.urls,
        prompt: outcome.generation.prompt.clone(),
        status: outcome.generation.status,
        created_at: outcome.generation.created_at,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/ai/generations
// ---------------------------------------------------------------------------

/// List the user's generations with re-signed artifact URLs.
///
/// Stored URLs may have expired, so each artifact is re-signed at read
/// time. A generation whose signing fails entirely still appears, with an
/// empty `urls` list.
pub async fn list_generations(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<GenerationEntry>>> {
    let generations = GenerationRepo::list_for_user(&state.pool, user.id).await?;

    let entries = join_all(generations.into_iter().map(|generation| {
        let storage = state.storage.clone();
        async move {
            let urls = resign_output_urls(&storage, &generation).await;
            GenerationEntry { generation, urls }
        }
    }))
    .await;

    tracing::info!(
        user_id = %user.id,
        count = entries.len(),
        "Generations listed",
    );

    Ok(Json(entries))
}
