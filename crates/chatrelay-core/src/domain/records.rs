//! Persisted record types.
//!
//! Small JSON documents stored in the key-value store, one record per key.
//! Keys are namespaced by prefix so listing stays cheap.

use serde::{Deserialize, Serialize};

use super::chat::TuningParams;

/// Key prefix for saved prompts.
pub const PROMPT_PREFIX: &str = "prompt:";
/// Key prefix for chat configurations.
pub const CONFIG_PREFIX: &str = "config:";

/// A saved prompt template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPrompt {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

/// A named chat configuration: model choice plus tuning overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub id: String,
    pub name: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub params: TuningParams,
    pub created_at: String,
}

impl SavedPrompt {
    /// Storage key for this record.
    #[must_use]
    pub fn key(id: &str) -> String {
        format!("{PROMPT_PREFIX}{id}")
    }
}

impl ChatConfig {
    /// Storage key for this record.
    #[must_use]
    pub fn key(id: &str) -> String {
        format!("{CONFIG_PREFIX}{id}")
    }
}
