use std::sync::Arc;

use clookit_identity::IdentityClient;
use clookit_inference::InferenceClient;
use clookit_storage::ObjectStorage;
use clookit_worker::{DownloadQueue, ProgressTracker};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: clookit_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Identity service client (auth proxy + bearer validation).
    pub identity: IdentityClient,
    /// Object storage client.
    pub storage: ObjectStorage,
    /// Inference provider client.
    pub inference: InferenceClient,
    /// Bounded admission queue for fetch tasks.
    pub queue: DownloadQueue,
    /// In-process progress tracker for fetch jobs.
    pub tracker: Arc<ProgressTracker>,
    /// Shared HTTP client used by the fetch worker.
    pub http: reqwest::Client,
}
