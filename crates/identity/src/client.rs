//! REST client for the identity service.

use serde_json::json;

use crate::types::{AuthUser, ErrorPayload, SignInResponse, TokenPayload};

/// Errors from the identity service client.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The service could not be reached or the response body was unreadable.
    #[error("Identity service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

impl IdentityError {
    /// Whether the service rejected the supplied credentials/token
    /// (as opposed to being unreachable or broken).
    pub fn is_credential_rejection(&self) -> bool {
        matches!(
            self,
            IdentityError::Rejected { status, .. } if matches!(status, 400 | 401 | 403 | 422)
        )
    }
}

/// Client for the identity service's REST API.
///
/// Holds the service base URL and the server-side service key. The service
/// key authorizes this backend to the identity service; end-user requests
/// are authorized by their own bearer tokens passed to [`get_user`].
///
/// [`get_user`]: IdentityClient::get_user
#[derive(Debug, Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl IdentityClient {
    /// Create a new client targeting `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            service_key: service_key.into(),
        }
    }

    /// Sign in with email + password. Returns the user and a token bundle.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInResponse, IdentityError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.service_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let payload: TokenPayload = Self::decode(response).await?;
        Ok(payload.into())
    }

    /// Register a new account with email + password.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInResponse, IdentityError> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.service_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let payload: TokenPayload = Self::decode(response).await?;
        Ok(payload.into())
    }

    /// Validate an end-user bearer token, returning the user it belongs to.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, IdentityError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = self
            .http
            .get(&url)
            .header("apikey", &self.service_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Decode a success body, or turn a non-success status into
    /// [`IdentityError::Rejected`] with the service's message.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, IdentityError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorPayload>(&body)
            .ok()
            .and_then(ErrorPayload::into_message)
            .unwrap_or_else(|| format!("identity service returned status {status}"));

        tracing::warn!(status = status.as_u16(), %message, "Identity service rejected request");
        Err(IdentityError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped() {
        let client = IdentityClient::new("https://id.example.com//", "key");
        assert_eq!(client.base_url, "https://id.example.com");
    }

    #[test]
    fn credential_rejection_classification() {
        let rejected = IdentityError::Rejected {
            status: 401,
            message: "bad token".into(),
        };
        assert!(rejected.is_credential_rejection());

        let broken = IdentityError::Rejected {
            status: 503,
            message: "unavailable".into(),
        };
        assert!(!broken.is_credential_rejection());
    }
}
