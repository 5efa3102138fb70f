//! Wire types for the identity service API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated user as reported by the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// A token bundle issued on sign-in / sign-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Combined response for sign-in and sign-up.
#[derive(Debug, Clone, Serialize)]
pub struct SignInResponse {
    pub user: AuthUser,
    pub session: AuthSession,
}

/// Raw token-endpoint payload: the service returns the session fields at the
/// top level with the user embedded.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenPayload {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: AuthUser,
}

impl From<TokenPayload> for SignInResponse {
    fn from(payload: TokenPayload) -> Self {
        SignInResponse {
            user: payload.user,
            session: AuthSession {
                access_token: payload.access_token,
                refresh_token: payload.refresh_token,
                expires_in: payload.expires_in,
            },
        }
    }
}

/// Error body shape used by the identity service. Field names vary between
/// endpoints, so all are optional.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    pub msg: Option<String>,
    pub message: Option<String>,
    pub error_description: Option<String>,
}

impl ErrorPayload {
    pub fn into_message(self) -> Option<String> {
        self.msg.or(self.message).or(self.error_description)
    }
}
