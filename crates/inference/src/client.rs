//! REST client for the prediction API of the inference provider.

use std::time::Duration;

use serde_json::json;

use crate::types::{GenerationInput, Prediction, PredictionInput, PredictionStatus};

/// Delay between polls while a prediction is still running.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Errors from the inference provider client.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// The provider could not be reached or a body was unreadable.
    #[error("Inference provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("Inference provider returned status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The prediction itself reached a failed/canceled terminal state.
    #[error("Prediction failed: {0}")]
    Prediction(String),

    /// The prediction succeeded but carried no artifact URLs.
    #[error("Prediction succeeded without output artifacts")]
    MissingOutput,
}

/// Client for the hosted inference API.
///
/// One call to [`generate`](Self::generate) is the whole contract: it blocks
/// (cooperatively) until the provider has produced every artifact, then
/// returns the raw bytes in provider order. There is no cancellation and no
/// partial-progress callback.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    model_version: String,
}

impl InferenceClient {
    /// Create a new client.
    ///
    /// * `base_url`      - provider API root, e.g. `https://api.example.com`.
    /// * `token`         - provider API token.
    /// * `model_version` - opaque model version identifier to run.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        model_version: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.into(),
            model_version: model_version.into(),
        }
    }

    /// Run one generation to completion and download every artifact.
    ///
    /// Returns the artifact byte buffers in the order the provider listed
    /// them.
    pub async fn generate(&self, input: &GenerationInput) -> Result<Vec<Vec<u8>>, InferenceError> {
        let prediction = self.create_prediction(input).await?;
        tracing::info!(
            prediction_id = %prediction.id,
            model_version = %self.model_version,
            "Prediction created"
        );

        let finished = self.wait_for_terminal(prediction).await?;

        let urls = match finished.status {
            PredictionStatus::Succeeded => finished.output.unwrap_or_default(),
            _ => {
                let message = finished
                    .error
                    .unwrap_or_else(|| "prediction did not succeed".to_string());
                return Err(InferenceError::Prediction(message));
            }
        };

        if urls.is_empty() {
            return Err(InferenceError::MissingOutput);
        }

        // Fetch artifacts concurrently; try_join_all preserves input order.
        let artifacts = futures::future::try_join_all(
            urls.iter().map(|url| self.fetch_artifact(url)),
        )
        .await?;

        tracing::info!(
            prediction_id = %finished.id,
            artifacts = artifacts.len(),
            "Prediction artifacts downloaded"
        );
        Ok(artifacts)
    }

    /// Submit the prediction request.
    async fn create_prediction(
        &self,
        input: &GenerationInput,
    ) -> Result<Prediction, InferenceError> {
        let url = format!("{}/v1/predictions", self.base_url);
        let body = json!({
            "version": self.model_version,
            "input": PredictionInput::from_input(input),
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Poll the prediction until it reaches a terminal state.
    async fn wait_for_terminal(
        &self,
        mut prediction: Prediction,
    ) -> Result<Prediction, InferenceError> {
        while !prediction.status.is_terminal() {
            tokio::time::sleep(POLL_INTERVAL).await;

            let url = format!("{}/v1/predictions/{}", self.base_url, prediction.id);
            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await?;
            prediction = Self::decode(response).await?;
        }
        Ok(prediction)
    }

    /// Download one artifact into memory.
    async fn fetch_artifact(&self, url: &str) -> Result<Vec<u8>, InferenceError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Rejected {
                status: status.as_u16(),
                message: format!("artifact fetch from {url} failed"),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Decode a success body, or map a non-success status to
    /// [`InferenceError::Rejected`].
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, InferenceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = response.text().await.unwrap_or_default();
        Err(InferenceError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
