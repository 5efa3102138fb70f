//! AI generation entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use clookit_core::types::{DbId, Timestamp};

use crate::models::status::JobStatus;

/// A row from the `ai_generations` table.
///
/// The tuning columns (`refine` through `num_inference_steps`) record the
/// server-side constants the artifact was generated with; they are never
/// client-supplied.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Generation {
    pub id: DbId,
    pub user_id: DbId,
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub width: i32,
    pub height: i32,
    pub refine: String,
    pub scheduler: String,
    pub lora_scale: f64,
    pub num_outputs: i32,
    pub guidance_scale: f64,
    pub apply_watermark: bool,
    pub high_noise_frac: f64,
    pub prompt_strength: f64,
    pub num_inference_steps: i32,
    pub output_urls: Vec<String>,
    pub status: JobStatus,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new generation record in `pending` state.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGeneration {
    pub user_id: DbId,
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub width: i32,
    pub height: i32,
    pub refine: String,
    pub scheduler: String,
    pub lora_scale: f64,
    pub num_outputs: i32,
    pub guidance_scale: f64,
    pub apply_watermark: bool,
    pub high_noise_frac: f64,
    pub prompt_strength: f64,
    pub num_inference_steps: i32,
}
