//! Shape validation of decoded chat requests.
//!
//! Decode failure and shape failure are distinct: once a body parses as
//! JSON, problems with its shape are classified as client errors naming
//! the violated field, not as decode failures.

use serde_json::Value;

use crate::domain::chat::{ChatRequest, ensure_system_message};
use crate::error::ChatError;
use crate::registry::ModelRegistry;

/// Validate a decoded JSON value into a dispatch-ready [`ChatRequest`].
///
/// Checks, in order: `messages` is an array, the request deserializes, and
/// `model` names a registry entry. On success the default system message
/// has been prepended if none was present.
pub fn validate_request(value: Value, registry: &ModelRegistry) -> Result<ChatRequest, ChatError> {
    let Some(obj) = value.as_object() else {
        return Err(ChatError::InvalidShape(
            "request body must be a JSON object".to_string(),
        ));
    };

    match obj.get("messages") {
        Some(Value::Array(_)) => {}
        Some(_) => {
            return Err(ChatError::InvalidShape(
                "`messages` must be an array".to_string(),
            ));
        }
        None => {
            return Err(ChatError::InvalidShape(
                "`messages` is required".to_string(),
            ));
        }
    }

    let mut request: ChatRequest = serde_json::from_value(value)
        .map_err(|e| ChatError::InvalidShape(format!("invalid request shape: {e}")))?;

    if registry.get(&request.model).is_none() {
        let name = if request.model.is_empty() {
            "(none)".to_string()
        } else {
            request.model.clone()
        };
        return Err(ChatError::UnknownModel(name));
    }

    ensure_system_message(&mut request.messages);
    Ok(request)
}
