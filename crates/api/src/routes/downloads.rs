//! Route definitions for the `/downloads` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::downloads;
use crate::state::AppState;

/// Routes mounted at `/downloads` (all require authentication).
///
/// ```text
/// POST   /              -> create_download (202, accepted not completed)
/// GET    /              -> list_downloads
/// GET    /{id}          -> get_download
/// DELETE /{id}          -> delete_download
/// POST   /{id}/cancel   -> cancel_download (status flip only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(downloads::create_download).get(downloads::list_downloads),
        )
        .route(
            "/{id}",
            get(downloads::get_download).delete(downloads::delete_download),
        )
        .route("/{id}/cancel", post(downloads::cancel_download))
}
