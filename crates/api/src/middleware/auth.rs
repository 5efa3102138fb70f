//! Bearer-token authentication extractor.
//!
//! Token validation is fully delegated to the identity service: every
//! protected request costs one `get_user` round-trip. No token parsing or
//! verification happens in-process.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use clookit_core::error::CoreError;
use clookit_identity::IdentityError;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a Bearer token in the `Authorization`
/// header and validated against the identity service.
///
/// Use as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's id as issued by the identity service.
    pub id: Uuid,
    pub email: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let user = state.identity.get_user(token.trim()).await.map_err(|e| {
            if e.is_credential_rejection() {
                AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
            } else {
                AppError::Core(match e {
                    IdentityError::Transport(err) => CoreError::UpstreamIdentity(err.to_string()),
                    IdentityError::Rejected { message, .. } => {
                        CoreError::UpstreamIdentity(message)
                    }
                })
            }
        })?;

        Ok(AuthUser {
            id: user.id,
            email: user.email,
        })
    }
}
