//! Inference provider port.
//!
//! The provider consumes a model routing id plus a dispatch body and
//! returns a byte stream of newline-delimited JSON chunks. Implementations
//! live outside core; no HTTP types appear in these signatures.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use thiserror::Error;

use crate::registry::DispatchBody;

/// Raw byte stream returned by a streaming provider call.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, InferenceError>> + Send>>;

/// Errors surfaced by the inference provider.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The request could not be sent at all.
    #[error("provider request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("provider returned status {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The response stream errored mid-flight.
    #[error("provider stream error: {0}")]
    Stream(String),
}

/// Client for the hosted inference provider.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Run a chat call in streaming mode.
    ///
    /// The returned stream carries the provider's bytes verbatim; chunk
    /// boundaries are not guaranteed to align with lines.
    async fn stream_chat(
        &self,
        model_id: &str,
        body: &DispatchBody,
    ) -> Result<ByteStream, InferenceError>;

    /// Run a chat call in buffered mode, returning the provider's JSON
    /// response body.
    async fn run_chat(
        &self,
        model_id: &str,
        body: &DispatchBody,
    ) -> Result<serde_json::Value, InferenceError>;
}
