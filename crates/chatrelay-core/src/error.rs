//! Core error taxonomy for the chat request path.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::ports::inference::InferenceError;

/// Everything that can go wrong between receiving a chat request body and
/// opening the provider stream.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The body could not be interpreted as JSON by any decode strategy.
    #[error(transparent)]
    Malformed(#[from] DecodeError),

    /// The body parsed, but its shape is invalid.
    #[error("invalid request: {0}")]
    InvalidShape(String),

    /// The requested model is not in the registry.
    #[error("unknown model: {0}")]
    UnknownModel(String),

    /// The provider call failed.
    #[error(transparent)]
    Upstream(#[from] InferenceError),

    /// Anything unexpected.
    #[error("internal error: {0}")]
    Internal(String),
}
