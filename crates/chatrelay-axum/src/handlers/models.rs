//! Model registry listing.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use chatrelay_core::registry::ParamBounds;

use crate::state::AppState;

/// One model entry in the listing, shaped for the client's model picker.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    /// Short registry key clients pass in `model`.
    pub key: String,
    /// Provider routing id.
    pub id: String,
    pub display_name: String,
    pub max_tokens: ParamBounds<u32>,
    pub temperature: ParamBounds<f64>,
    pub top_p: ParamBounds<f64>,
    pub top_k: ParamBounds<u32>,
    pub supports_tools: bool,
    pub supports_json_mode: bool,
}

/// List available models.
///
/// GET /api/models
pub async fn list(State(state): State<AppState>) -> Json<Vec<ModelEntry>> {
    let entries = state
        .registry
        .iter()
        .map(|(key, config)| ModelEntry {
            key: key.to_string(),
            id: config.id.clone(),
            display_name: config.display_name.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            supports_tools: config.supports_tools,
            supports_json_mode: config.supports_json_mode,
        })
        .collect();
    Json(entries)
}
