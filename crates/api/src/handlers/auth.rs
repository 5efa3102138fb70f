//! Handlers for the `/auth` resource.
//!
//! Both routes proxy the identity service; this backend never sees a
//! password beyond forwarding it.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use clookit_core::error::CoreError;
use clookit_identity::{IdentityError, SignInResponse};

use crate::error::{AppError, AppResult};
use crate::handlers::validation_error;
use crate::state::AppState;

/// Request body for `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// POST /auth/login
///
/// Sign in with email + password. Returns the user and a token bundle
/// issued by the identity service.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<Json<SignInResponse>> {
    input.validate().map_err(validation_error)?;

    let response = state
        .identity
        .sign_in(&input.email, &input.password)
        .await
        .map_err(|e| credential_error(e, CoreError::Unauthorized))?;

    tracing::info!(user_id = %response.user.id, "User signed in");
    Ok(Json(response))
}

/// POST /auth/register
///
/// Register a new account with email + password.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<Json<SignInResponse>> {
    input.validate().map_err(validation_error)?;

    let response = state
        .identity
        .sign_up(&input.email, &input.password)
        .await
        .map_err(|e| credential_error(e, CoreError::Validation))?;

    tracing::info!(user_id = %response.user.id, "User registered");
    Ok(Json(response))
}

/// Map an identity-service error: credential rejections become the
/// route-specific variant (401 for login, 400 for register), anything else
/// is an upstream failure.
fn credential_error(error: IdentityError, rejected: fn(String) -> CoreError) -> AppError {
    let is_rejection = error.is_credential_rejection();
    match error {
        IdentityError::Rejected { message, .. } if is_rejection => AppError::Core(rejected(message)),
        IdentityError::Rejected { message, .. } => {
            AppError::Core(CoreError::UpstreamIdentity(message))
        }
        IdentityError::Transport(err) => {
            AppError::Core(CoreError::UpstreamIdentity(err.to_string()))
        }
    }
}
