//! Workers AI client.
//!
//! Implements the core `InferenceClient` port over the provider's `run`
//! endpoint. Streaming calls return the provider's newline-delimited JSON
//! bytes untouched; unwrapping any `data: ` framing is the consumer's
//! concern.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;

use chatrelay_core::ports::inference::{ByteStream, InferenceClient, InferenceError};
use chatrelay_core::registry::DispatchBody;

use crate::config::ProviderConfig;

/// HTTP client for the hosted inference provider.
pub struct WorkersAiClient {
    http: Client,
    config: ProviderConfig,
}

impl WorkersAiClient {
    /// Build a client from configuration.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized.
    #[must_use]
    pub fn new(config: &ProviderConfig) -> Self {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .expect("reqwest client");
        Self {
            http,
            config: config.clone(),
        }
    }

    async fn post(
        &self,
        model_id: &str,
        body: &DispatchBody,
    ) -> Result<reqwest::Response, InferenceError> {
        let url = self.config.run_url(model_id);
        tracing::debug!(model = model_id, stream = body.stream, "dispatching chat call");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(body)
            .send()
            .await
            .map_err(|e| InferenceError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(model = model_id, status, "provider rejected chat call");
            return Err(InferenceError::Status { status, detail });
        }

        Ok(response)
    }
}

#[async_trait]
impl InferenceClient for WorkersAiClient {
    async fn stream_chat(
        &self,
        model_id: &str,
        body: &DispatchBody,
    ) -> Result<ByteStream, InferenceError> {
        let response = self.post(model_id, body).await?;

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| InferenceError::Stream(e.to_string())));

        Ok(Box::pin(stream))
    }

    async fn run_chat(
        &self,
        model_id: &str,
        body: &DispatchBody,
    ) -> Result<serde_json::Value, InferenceError> {
        let response = self.post(model_id, body).await?;
        response
            .json()
            .await
            .map_err(|e| InferenceError::Stream(e.to_string()))
    }
}
