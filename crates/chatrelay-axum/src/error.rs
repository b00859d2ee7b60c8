//! Axum-specific error types and mappings.
//!
//! Maps the core error taxonomy to HTTP status codes and JSON response
//! bodies. Decode failures carry the raw-body preview; the attempt log is
//! attached only when the caller asked for diagnostics.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use chatrelay_core::decode::{DecodeAttempt, DecodeError};
use chatrelay_core::error::ChatError;
use chatrelay_core::ports::kv::RepositoryError;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Body could not be interpreted as JSON by any strategy.
    #[error("Malformed body: {message}")]
    DecodeFailed {
        message: String,
        body_preview: String,
        /// Populated only under the debug header.
        attempts: Option<Vec<DecodeAttempt>>,
    },

    /// Requested model is not in the registry.
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The inference provider call failed.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
    /// Stable error type discriminant for client-side handling
    #[serde(skip_serializing_if = "Option::is_none", rename = "type")]
    error_type: Option<String>,
    /// Optional additional metadata for specific error types
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<serde_json::Value>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message, error_type, metadata) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None, None),
            HttpError::DecodeFailed {
                message,
                body_preview,
                attempts,
            } => {
                let mut meta = serde_json::json!({ "bodyPreview": body_preview });
                if let Some(attempts) = attempts {
                    meta["attempts"] = serde_json::json!(attempts);
                }
                (
                    StatusCode::BAD_REQUEST,
                    message,
                    Some("DECODE_FAILED".to_string()),
                    Some(meta),
                )
            }
            HttpError::UnknownModel(name) => (
                StatusCode::BAD_REQUEST,
                format!("unknown model: {name}"),
                Some("UNKNOWN_MODEL".to_string()),
                None,
            ),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None, None),
            HttpError::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None, None),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None, None),
        };

        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
            error_type,
            metadata,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<DecodeError> for HttpError {
    fn from(err: DecodeError) -> Self {
        HttpError::DecodeFailed {
            message: err.message,
            body_preview: err.body_preview,
            attempts: None,
        }
    }
}

impl From<ChatError> for HttpError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Malformed(decode_err) => decode_err.into(),
            ChatError::InvalidShape(msg) => HttpError::BadRequest(msg),
            ChatError::UnknownModel(name) => HttpError::UnknownModel(name),
            ChatError::Upstream(e) => HttpError::Upstream(e.to_string()),
            ChatError::Internal(msg) => HttpError::Internal(msg),
        }
    }
}

impl From<RepositoryError> for HttpError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => HttpError::NotFound(msg),
            RepositoryError::Storage(msg) => HttpError::Internal(format!("Storage: {msg}")),
            RepositoryError::Serialization(msg) => {
                HttpError::Internal(format!("Serialization: {msg}"))
            }
        }
    }
}
