//! Route definitions for the `/api/ai` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ai;
use crate::state::AppState;

/// Routes mounted at `/api/ai` (all require authentication).
///
/// ```text
/// POST /generate     -> generate
/// GET  /generations  -> list_generations
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(ai::generate))
        .route("/generations", get(ai::list_generations))
}
