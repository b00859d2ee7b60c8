//! Chat dispatch handler.
//!
//! Buffers the raw body, runs it through the decode cascade, validates the
//! resulting request, resolves tuning parameters against the model's
//! bounds, then relays the provider's stream back with a trailing metadata
//! line.

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};

use chatrelay_core::decode::{DecodeInput, decode_body};
use chatrelay_core::registry::DispatchBody;
use chatrelay_core::validate::validate_request;

use crate::error::HttpError;
use crate::relay::{MetaTrailer, StreamMetadata};
use crate::state::AppState;

/// When present, the handler returns the decode result as JSON instead of
/// dispatching to the provider.
const DEBUG_HEADER: &str = "x-chatrelay-debug";

/// Clients that base64-encode the whole body declare it here.
const ENCODING_HEADER: &str = "x-payload-encoding";

fn wants_debug(headers: &HeaderMap) -> bool {
    headers.contains_key(DEBUG_HEADER)
}

fn declares_base64(headers: &HeaderMap) -> bool {
    headers
        .get(ENCODING_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().contains("base64"))
}

/// Dispatch a chat request to the inference provider.
///
/// POST /api/chat
///
/// The body is accepted in any shape the decode cascade understands:
/// plain JSON, urlencoded or multipart form wrappers, base64 payloads,
/// or near-JSON needing repair. The response is a pass-through of the
/// provider's NDJSON stream, plus one final `{"meta":{...}}` line.
pub async fn chat(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, HttpError> {
    let debug = wants_debug(&headers);

    let mut input = DecodeInput::new(body).with_encoded_hint(declares_base64(&headers));
    if let Some(ct) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        input = input.with_content_type(ct);
    }
    if let Some(query) = query {
        input = input.with_query(query);
    }

    let decoded = decode_body(&input).map_err(|err| {
        tracing::warn!(
            attempts = err.attempts.len(),
            preview = %err.body_preview,
            "request body exhausted every decode strategy"
        );
        HttpError::DecodeFailed {
            message: err.message,
            body_preview: err.body_preview,
            attempts: debug.then_some(err.attempts),
        }
    })?;

    tracing::debug!(strategy = decoded.strategy, "request body decoded");

    if debug {
        // Short-circuit: report what the cascade found, dispatch nothing.
        return Ok(Json(serde_json::json!({
            "parsed": decoded.value,
            "strategy": decoded.strategy,
            "attempts": decoded.attempts,
        }))
        .into_response());
    }

    let request = validate_request(decoded.value, &state.registry)?;

    let config = state
        .registry
        .get(&request.model)
        .ok_or_else(|| HttpError::Internal(format!("model vanished: {}", request.model)))?;

    let resolved = config.resolve(&request.params);
    let dispatch = DispatchBody {
        messages: request.messages,
        stream: true,
        params: resolved.clone(),
    };

    let upstream = state
        .inference
        .stream_chat(&config.id, &dispatch)
        .await
        .map_err(|e| HttpError::Upstream(e.to_string()))?;

    let metadata = StreamMetadata {
        model_key: request.model,
        model_id: config.id.clone(),
        params: resolved,
    };

    let relay = MetaTrailer::new(upstream, metadata);

    Ok((
        [
            (header::CONTENT_TYPE, "application/x-ndjson"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(relay),
    )
        .into_response())
}
