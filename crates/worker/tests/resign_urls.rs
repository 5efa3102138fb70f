//! Read-time URL re-signing tests.
//!
//! Presigning is a local computation, so these run without any live
//! storage backend.

use chrono::Utc;
use uuid::Uuid;

use clookit_db::models::generation::Generation;
use clookit_db::models::status::JobStatus;
use clookit_storage::{ObjectStorage, StorageConfig};
use clookit_worker::generation::resign_output_urls;

async fn local_storage() -> ObjectStorage {
    ObjectStorage::connect(&StorageConfig {
        endpoint: "http://127.0.0.1:1".to_string(),
        region: "local".to_string(),
        access_key: "test".to_string(),
        secret_key: "test".to_string(),
        bucket: "pages".to_string(),
    })
    .await
}

fn generation_with_urls(output_urls: Vec<String>) -> Generation {
    let now = Utc::now();
    Generation {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
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
        output_urls,
        status: JobStatus::Completed,
        error_message: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn empty_output_urls_yield_empty_list() {
    let storage = local_storage().await;
    let generation = generation_with_urls(vec![]);

    let urls = resign_output_urls(&storage, &generation).await;
    assert!(urls.is_empty());
}

#[tokio::test]
async fn stored_urls_get_fresh_signatures() {
    let storage = local_storage().await;
    let generation = generation_with_urls(vec![
        "http://127.0.0.1:1/pages/generations/u1/tattoo_1_0.png?X-Amz-Signature=stale".to_string(),
        "http://127.0.0.1:1/pages/generations/u1/tattoo_1_1.png?X-Amz-Signature=stale".to_string(),
    ]);

    let urls = resign_output_urls(&storage, &generation).await;

    assert_eq!(urls.len(), 2);
    // Order preserved, keys carried over, fresh signature attached.
    assert!(urls[0].contains("generations/u1/tattoo_1_0.png"));
    assert!(urls[1].contains("generations/u1/tattoo_1_1.png"));
    for url in &urls {
        assert!(url.contains("X-Amz-Signature="));
        assert!(!url.contains("X-Amz-Signature=stale"));
    }
}

#[tokio::test]
async fn urls_outside_the_bucket_are_dropped() {
    let storage = local_storage().await;
    let generation = generation_with_urls(vec![
        "http://elsewhere.example.com/other-bucket/file.png".to_string(),
        "http://127.0.0.1:1/pages/generations/u1/tattoo_1_0.png".to_string(),
    ]);

    let urls = resign_output_urls(&storage, &generation).await;

    // The foreign URL degrades to a dropped artifact; the valid one stays.
    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("generations/u1/tattoo_1_0.png"));
}
