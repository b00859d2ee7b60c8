//! Chat configuration CRUD over the key-value store.
//!
//! A configuration names a model from the registry; the model key is
//! validated on every write so stored configs never point at models the
//! service cannot dispatch to.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use chatrelay_core::domain::chat::{ChatMessage, TuningParams, ensure_system_message};
use chatrelay_core::domain::records::{CONFIG_PREFIX, ChatConfig};
use chatrelay_core::ports::kv::RepositoryError;
use chatrelay_core::registry::DispatchBody;

use crate::error::HttpError;
use crate::state::AppState;

/// Body for creating or updating a configuration.
#[derive(Debug, Deserialize)]
pub struct ConfigRequest {
    pub name: String,
    pub model: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub params: TuningParams,
}

fn check_model(state: &AppState, model: &str) -> Result<(), HttpError> {
    if state.registry.get(model).is_none() {
        return Err(HttpError::UnknownModel(model.to_string()));
    }
    Ok(())
}

fn serialize(record: &ChatConfig) -> Result<String, HttpError> {
    serde_json::to_string(record)
        .map_err(|e| RepositoryError::Serialization(e.to_string()).into())
}

/// List chat configurations.
///
/// GET /api/configs
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ChatConfig>>, HttpError> {
    let rows = state.kv.list(CONFIG_PREFIX).await?;
    let configs = rows
        .iter()
        .filter_map(|(key, value)| match serde_json::from_str(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key, error = %e, "skipping unreadable config record");
                None
            }
        })
        .collect();
    Ok(Json(configs))
}

/// Create a chat configuration.
///
/// POST /api/configs
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<ConfigRequest>,
) -> Result<(StatusCode, Json<ChatConfig>), HttpError> {
    check_model(&state, &req.model)?;

    let record = ChatConfig {
        id: uuid::Uuid::new_v4().to_string(),
        name: req.name,
        model: req.model,
        system_prompt: req.system_prompt,
        params: req.params,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    state
        .kv
        .put(&ChatConfig::key(&record.id), &serialize(&record)?)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Fetch one chat configuration.
///
/// GET /api/configs/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ChatConfig>, HttpError> {
    let value = state
        .kv
        .get(&ChatConfig::key(&id))
        .await?
        .ok_or_else(|| HttpError::NotFound(format!("config {id} not found")))?;

    let record = serde_json::from_str(&value)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
    Ok(Json(record))
}

/// Replace a chat configuration. The original creation time is kept.
///
/// PUT /api/configs/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ConfigRequest>,
) -> Result<Json<ChatConfig>, HttpError> {
    check_model(&state, &req.model)?;

    let key = ChatConfig::key(&id);
    let existing = state
        .kv
        .get(&key)
        .await?
        .ok_or_else(|| HttpError::NotFound(format!("config {id} not found")))?;

    let created_at = serde_json::from_str::<ChatConfig>(&existing)
        .map(|c| c.created_at)
        .unwrap_or_else(|_| chrono::Utc::now().to_rfc3339());

    let record = ChatConfig {
        id,
        name: req.name,
        model: req.model,
        system_prompt: req.system_prompt,
        params: req.params,
        created_at,
    };

    state.kv.put(&key, &serialize(&record)?).await?;
    Ok(Json(record))
}

/// Body for exercising a stored configuration.
#[derive(Debug, Deserialize)]
pub struct TestRequest {
    #[serde(default = "default_test_message")]
    pub message: String,
}

fn default_test_message() -> String {
    "Say hello in one short sentence.".to_string()
}

/// Run one buffered chat call through a stored configuration.
///
/// POST /api/configs/{id}/test
///
/// Useful for checking a configuration's model and parameters without
/// opening a stream; returns the provider's JSON response as-is.
pub async fn test(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TestRequest>,
) -> Result<Json<serde_json::Value>, HttpError> {
    let value = state
        .kv
        .get(&ChatConfig::key(&id))
        .await?
        .ok_or_else(|| HttpError::NotFound(format!("config {id} not found")))?;
    let config: ChatConfig = serde_json::from_str(&value)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

    let model = state
        .registry
        .get(&config.model)
        .ok_or_else(|| HttpError::UnknownModel(config.model.clone()))?;

    let mut messages = Vec::new();
    if let Some(prompt) = &config.system_prompt {
        messages.push(ChatMessage::new("system", prompt));
    }
    messages.push(ChatMessage::new("user", &req.message));
    ensure_system_message(&mut messages);

    let body = DispatchBody {
        messages,
        stream: false,
        params: model.resolve(&config.params),
    };

    let response = state
        .inference
        .run_chat(&model.id, &body)
        .await
        .map_err(|e| HttpError::Upstream(e.to_string()))?;

    Ok(Json(response))
}

/// Delete a chat configuration.
///
/// DELETE /api/configs/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpError> {
    let key = ChatConfig::key(&id);
    if state.kv.get(&key).await?.is_none() {
        return Err(HttpError::NotFound(format!("config {id} not found")));
    }
    state.kv.delete(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}
