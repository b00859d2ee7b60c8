//! Domain types for chatrelay.

pub mod chat;
pub mod records;

pub use chat::{
    ChatMessage, ChatRequest, DEFAULT_SYSTEM_PROMPT, MessageRole, TuningParams,
    ensure_system_message,
};
pub use records::{CONFIG_PREFIX, ChatConfig, PROMPT_PREFIX, SavedPrompt};
