//! Chat domain types.
//!
//! These types represent a single chat call in the domain model,
//! independent of any transport or provider concerns.

use serde::{Deserialize, Serialize};

/// System message prepended when a request carries none of its own.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful, concise assistant. Answer in plain language.";

/// A decoded chat request.
///
/// Constructed fresh per request by the body decoder, consumed exactly once
/// by the dispatch path. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages in order. Order is significant.
    pub messages: Vec<ChatMessage>,
    /// Key into the model registry.
    #[serde(default)]
    pub model: String,
    /// Optional tuning parameters, clamped against the model's bounds
    /// before dispatch.
    #[serde(flatten)]
    pub params: TuningParams,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sender role. Kept as a free string at decode time; the provider is
    /// authoritative about which roles each model accepts.
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tool call ID (for tool role messages returning results).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Tool calls made by the assistant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<serde_json::Value>>,
}

impl ChatMessage {
    /// Build a plain message with no tool fields.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            name: None,
            tool_call_id: None,
            tool_calls: None,
        }
    }
}

/// The role of a message sender, as accepted by the inference provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

impl MessageRole {
    /// Parse a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system" => Some(Self::System),
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            "tool" => Some(Self::Tool),
            _ => None,
        }
    }

    /// Convert role to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional tuning parameters supplied by the client.
///
/// All fields are optional; resolution against a model's bounds happens in
/// [`crate::registry::ModelConfig::resolve`]. The wire format is camelCase,
/// with snake_case accepted as an alias since both spellings show up from
/// older clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TuningParams {
    #[serde(default, alias = "max_tokens", skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, alias = "top_p", skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, alias = "top_k", skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(
        default,
        alias = "repetition_penalty",
        skip_serializing_if = "Option::is_none"
    )]
    pub repetition_penalty: Option<f64>,
    #[serde(
        default,
        alias = "frequency_penalty",
        skip_serializing_if = "Option::is_none"
    )]
    pub frequency_penalty: Option<f64>,
    #[serde(
        default,
        alias = "presence_penalty",
        skip_serializing_if = "Option::is_none"
    )]
    pub presence_penalty: Option<f64>,
    #[serde(default, alias = "use_json_mode", skip_serializing_if = "Option::is_none")]
    pub use_json_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<serde_json::Value>>,
    #[serde(
        default,
        alias = "response_format",
        skip_serializing_if = "Option::is_none"
    )]
    pub response_format: Option<serde_json::Value>,
}

/// Prepend the default system message unless one is already present.
///
/// Existing messages keep their relative order; the prepend happens at most
/// once per request.
pub fn ensure_system_message(messages: &mut Vec<ChatMessage>) {
    let has_system = messages.iter().any(|m| m.role == "system");
    if !has_system {
        messages.insert(0, ChatMessage::new("system", DEFAULT_SYSTEM_PROMPT));
    }
}
