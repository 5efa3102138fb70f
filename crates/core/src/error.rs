use crate::types::DbId;

/// Closed error taxonomy for the whole service.
///
/// Callers branch on variants instead of matching on message strings. The
/// three `Upstream*` variants carry the upstream message verbatim so it can
/// be surfaced to the client and logged with context.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Identity service error: {0}")]
    UpstreamIdentity(String),

    #[error("Storage error: {0}")]
    UpstreamStorage(String),

    #[error("Inference error: {0}")]
    UpstreamInference(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
