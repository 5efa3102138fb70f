//! Repository for the `ai_generations` table.

use sqlx::PgPool;

use clookit_core::types::DbId;

use crate::models::generation::{CreateGeneration, Generation};
use crate::models::status::JobStatus;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, prompt, negative_prompt, width, height, \
    refine, scheduler, lora_scale, num_outputs, guidance_scale, \
    apply_watermark, high_noise_frac, prompt_strength, num_inference_steps, \
    output_urls, status, error_message, created_at, updated_at";

/// Provides CRUD and status management for AI generations.
pub struct GenerationRepo;

impl GenerationRepo {
    /// Insert a new generation in `pending` state. Returns the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGeneration,
    ) -> Result<Generation, sqlx::Error> {
        let query = format!(
            "INSERT INTO ai_generations
                (user_id, prompt, negative_prompt, width, height, refine,
                 scheduler, lora_scale, num_outputs, guidance_scale,
                 apply_watermark, high_noise_frac, prompt_strength,
                 num_inference_steps)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(input.user_id)
            .bind(&input.prompt)
            .bind(&input.negative_prompt)
            .bind(input.width)
            .bind(input.height)
            .bind(&input.refine)
            .bind(&input.scheduler)
            .bind(input.lora_scale)
            .bind(input.num_outputs)
            .bind(input.guidance_scale)
            .bind(input.apply_watermark)
            .bind(input.high_noise_frac)
            .bind(input.prompt_strength)
            .bind(input.num_inference_steps)
            .fetch_one(pool)
            .await
    }

    /// Find a generation by ID, scoped to its owner.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ai_generations WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Generation>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List all generations for a user, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Generation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ai_generations WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Mark a generation as completed with its signed output URLs.
    /// Returns the updated row.
    pub async fn mark_completed(
        pool: &PgPool,
        id: DbId,
        output_urls: &[String],
    ) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!(
            "UPDATE ai_generations
             SET status = $2, output_urls = $3, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(id)
            .bind(JobStatus::Completed)
            .bind(output_urls)
            .fetch_optional(pool)
            .await
    }

    /// Mark a generation as failed, recording the error message.
    pub async fn mark_failed(
        pool: &PgPool,
        id: DbId,
        error_message: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE ai_generations SET status = $2, error_message = $3, updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(JobStatus::Failed)
        .bind(error_message)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
