//! The generation orchestrator: durable record, inference call, artifact
//! uploads, signed URLs, final status.
//!
//! Unlike the fetch path there is no persisted `processing` state: the row
//! goes `pending -> {completed | failed}` within one request. There is no
//! retry and no deduplication; resubmitting the same prompt creates a new
//! record and a new inference call.

use chrono::Utc;
use futures::future::{join_all, try_join_all};

use clookit_core::downloads::generation_object_key;
use clookit_core::error::CoreError;
use clookit_core::types::DbId;
use clookit_db::models::generation::{CreateGeneration, Generation};
use clookit_db::repositories::GenerationRepo;
use clookit_db::DbPool;
use clookit_inference::{tuning, GenerationInput, InferenceClient};
use clookit_storage::ObjectStorage;

/// Client-controlled generation parameters, as accepted by the route.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub user_id: DbId,
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

/// A finished generation with its freshly signed artifact URLs.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub generation: Generation,
    pub urls: Vec<String>,
}

/// Run one generation end to end.
///
/// Failures after the durable row exists mark it `failed` with the error
/// message before propagating; failures before that simply propagate.
pub async fn run_generation(
    pool: &DbPool,
    storage: &ObjectStorage,
    inference: &InferenceClient,
    request: GenerationRequest,
) -> Result<GenerationOutcome, CoreError> {
    let input = GenerationInput::new(
        request.prompt.clone(),
        request.negative_prompt.clone(),
        request.width,
        request.height,
    );

    // Durable record first, in pending state with the fixed tuning values.
    let generation = GenerationRepo::create(
        pool,
        &CreateGeneration {
            user_id: request.user_id,
            prompt: input.prompt.clone(),
            negative_prompt: request.negative_prompt,
            width: input.width,
            height: input.height,
            refine: tuning::REFINE.to_string(),
            scheduler: tuning::SCHEDULER.to_string(),
            lora_scale: tuning::LORA_SCALE,
            num_outputs: tuning::NUM_OUTPUTS,
            guidance_scale: tuning::GUIDANCE_SCALE,
            apply_watermark: tuning::APPLY_WATERMARK,
            high_noise_frac: tuning::HIGH_NOISE_FRAC,
            prompt_strength: tuning::PROMPT_STRENGTH,
            num_inference_steps: tuning::NUM_INFERENCE_STEPS,
        },
    )
    .await
    .map_err(|e| CoreError::Internal(format!("generation insert: {e}")))?;

    tracing::info!(
        generation_id = %generation.id,
        user_id = %request.user_id,
        "Generation record created"
    );

    match produce_artifacts(pool, storage, inference, &generation, &input).await {
        Ok(outcome) => Ok(outcome),
        Err(error) => {
            tracing::error!(
                generation_id = %generation.id,
                user_id = %request.user_id,
                %error,
                "Generation failed"
            );
            if let Err(db_error) =
                GenerationRepo::mark_failed(pool, generation.id, &error.to_string()).await
            {
                tracing::error!(
                    generation_id = %generation.id,
                    %db_error,
                    "Failed to record generation failure"
                );
            }
            Err(error)
        }
    }
}

/// Inference call, per-artifact upload + signing, completion update.
async fn produce_artifacts(
    pool: &DbPool,
    storage: &ObjectStorage,
    inference: &InferenceClient,
    generation: &Generation,
    input: &GenerationInput,
) -> Result<GenerationOutcome, CoreError> {
    // Blocks until the provider has produced every artifact.
    let artifacts = inference
        .generate(input)
        .await
        .map_err(|e| CoreError::UpstreamInference(e.to_string()))?;

    tracing::info!(
        generation_id = %generation.id,
        artifacts = artifacts.len(),
        "Inference returned artifacts"
    );

    // Upload and sign each artifact; try_join_all preserves arrival order
    // and fails the whole generation on the first error.
    let timestamp_ms = Utc::now().timestamp_millis();
    let urls = try_join_all(artifacts.into_iter().enumerate().map(|(index, bytes)| {
        let key = generation_object_key(generation.user_id, timestamp_ms, index);
        async move {
            storage
                .upload(&key, bytes, "image/png")
                .await
                .map_err(|e| CoreError::UpstreamStorage(e.to_string()))?;
            storage
                .signed_url(&key)
                .await
                .map_err(|e| CoreError::UpstreamStorage(e.to_string()))
        }
    }))
    .await?;

    let updated = GenerationRepo::mark_completed(pool, generation.id, &urls)
        .await
        .map_err(|e| CoreError::Internal(format!("completion update: {e}")))?
        .ok_or(CoreError::NotFound {
            entity: "Generation",
            id: generation.id,
        })?;

    tracing::info!(
        generation_id = %updated.id,
        urls = urls.len(),
        "Generation complete"
    );

    Ok(GenerationOutcome {
        generation: updated,
        urls,
    })
}

/// Re-sign the stored output URLs of a generation for a read.
///
/// Stored URLs may have expired, so each artifact gets a fresh signed URL
/// derived from its object key. Individual failures degrade to a dropped
/// artifact (logged); an empty `output_urls` yields an empty list.
pub async fn resign_output_urls(storage: &ObjectStorage, generation: &Generation) -> Vec<String> {
    let signed = join_all(generation.output_urls.iter().map(|stored| async move {
        let key = match storage.object_key_from_url(stored) {
            Some(key) => key,
            None => {
                tracing::warn!(
                    generation_id = %generation.id,
                    stored_url = %stored,
                    "Stored URL does not reference the configured bucket"
                );
                return None;
            }
        };

        match storage.signed_url(&key).await {
            Ok(url) => Some(url),
            Err(error) => {
                tracing::warn!(
                    generation_id = %generation.id,
                    key = %key,
                    %error,
                    "Re-signing artifact URL failed"
                );
                None
            }
        }
    }))
    .await;

    signed.into_iter().flatten().collect()
}
