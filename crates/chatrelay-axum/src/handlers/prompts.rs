//! Saved prompt CRUD over the key-value store.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use chatrelay_core::domain::records::{PROMPT_PREFIX, SavedPrompt};
use chatrelay_core::ports::kv::RepositoryError;

use crate::error::HttpError;
use crate::state::AppState;

/// Body for creating or updating a prompt.
#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub title: String,
    pub content: String,
}

fn parse_record(key: &str, value: &str) -> Option<SavedPrompt> {
    match serde_json::from_str(value) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(key, error = %e, "skipping unreadable prompt record");
            None
        }
    }
}

fn serialize(record: &SavedPrompt) -> Result<String, HttpError> {
    serde_json::to_string(record)
        .map_err(|e| RepositoryError::Serialization(e.to_string()).into())
}

/// List saved prompts.
///
/// GET /api/prompts
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<SavedPrompt>>, HttpError> {
    let rows = state.kv.list(PROMPT_PREFIX).await?;
    let prompts = rows
        .iter()
        .filter_map(|(key, value)| parse_record(key, value))
        .collect();
    Ok(Json(prompts))
}

/// Create a saved prompt.
///
/// POST /api/prompts
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<PromptRequest>,
) -> Result<(StatusCode, Json<SavedPrompt>), HttpError> {
    let record = SavedPrompt {
        id: uuid::Uuid::new_v4().to_string(),
        title: req.title,
        content: req.content,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    state
        .kv
        .put(&SavedPrompt::key(&record.id), &serialize(&record)?)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Fetch one saved prompt.
///
/// GET /api/prompts/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SavedPrompt>, HttpError> {
    let value = state
        .kv
        .get(&SavedPrompt::key(&id))
        .await?
        .ok_or_else(|| HttpError::NotFound(format!("prompt {id} not found")))?;

    let record = serde_json::from_str(&value)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
    Ok(Json(record))
}

/// Replace a saved prompt. The original creation time is kept.
///
/// PUT /api/prompts/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PromptRequest>,
) -> Result<Json<SavedPrompt>, HttpError> {
    let key = SavedPrompt::key(&id);
    let existing = state
        .kv
        .get(&key)
        .await?
        .ok_or_else(|| HttpError::NotFound(format!("prompt {id} not found")))?;

    let created_at = serde_json::from_str::<SavedPrompt>(&existing)
        .map(|p| p.created_at)
        .unwrap_or_else(|_| chrono::Utc::now().to_rfc3339());

    let record = SavedPrompt {
        id,
        title: req.title,
        content: req.content,
        created_at,
    };

    state.kv.put(&key, &serialize(&record)?).await?;
    Ok(Json(record))
}

/// Delete a saved prompt.
///
/// DELETE /api/prompts/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpError> {
    let key = SavedPrompt::key(&id);
    if state.kv.get(&key).await?.is_none() {
        return Err(HttpError::NotFound(format!("prompt {id} not found")));
    }
    state.kv.delete(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}
