//! Repository tests for the `ai_generations` table lifecycle.

use sqlx::PgPool;
use uuid::Uuid;

use clookit_db::models::generation::CreateGeneration;
use clookit_db::models::status::JobStatus;
use clookit_db::repositories::GenerationRepo;

fn new_generation(user_id: Uuid) -> CreateGeneration {
    CreateGeneration {
        user_id,
        prompt: "a red fox".to_string(),
        negative_prompt: None,
        width: 1024,
        height: 1024,
        refine: "expert_ensemble_refiner".to_string(),
        scheduler: "K_EULER".to_string(),
        lora_scale: 0.6,
        num_outputs: 1,
        guidance_scale: 7.5,
        apply_watermark: false,
        high_noise_frac: 0.9,
        prompt_strength: 0.8,
        num_inference_steps: 25,
    }
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_starts_pending_with_empty_outputs(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let generation = GenerationRepo::create(&pool, &new_generation(user_id))
        .await
        .unwrap();

    assert_eq!(generation.status, JobStatus::Pending);
    assert!(generation.output_urls.is_empty());
    assert_eq!(generation.num_inference_steps, 25);
    assert_eq!(generation.scheduler, "K_EULER");
}

// ---------------------------------------------------------------------------
// Lifecycle transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn completion_sets_urls_in_order(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let generation = GenerationRepo::create(&pool, &new_generation(user_id))
        .await
        .unwrap();

    let urls = vec![
        "https://storage.example/bucket/a.png?sig=1".to_string(),
        "https://storage.example/bucket/b.png?sig=2".to_string(),
    ];
    let updated = GenerationRepo::mark_completed(&pool, generation.id, &urls)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.status, JobStatus::Completed);
    assert_eq!(updated.output_urls, urls);
}

#[sqlx::test(migrations = "./migrations")]
async fn failure_keeps_outputs_empty(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let generation = GenerationRepo::create(&pool, &new_generation(user_id))
        .await
        .unwrap();

    GenerationRepo::mark_failed(&pool, generation.id, "connection reset by peer")
        .await
        .unwrap();

    let row = GenerationRepo::find_for_user(&pool, generation.id, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, JobStatus::Failed);
    assert_eq!(
        row.error_message.as_deref(),
        Some("connection reset by peer")
    );
    assert!(row.output_urls.is_empty());
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn list_is_scoped_to_user(pool: PgPool) {
    let user_a = Uuid::new_v4();
    let user_b = Uuid::new_v4();

    GenerationRepo::create(&pool, &new_generation(user_a))
        .await
        .unwrap();
    GenerationRepo::create(&pool, &new_generation(user_b))
        .await
        .unwrap();

    let listed = GenerationRepo::list_for_user(&pool, user_a).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].user_id, user_a);
}
