//! Core domain for chatrelay: chat request types, the static model
//! registry with parameter clamping, the resilient body decoder, and the
//! ports adapters implement.

#![deny(unused_crate_dependencies)]

pub mod decode;
pub mod domain;
pub mod error;
pub mod ports;
pub mod registry;
pub mod validate;

// Re-export commonly used types for convenience
pub use decode::{DecodeAttempt, DecodeError, DecodeInput, Decoded, PREVIEW_LEN, decode_body};
pub use domain::{
    ChatConfig, ChatMessage, ChatRequest, DEFAULT_SYSTEM_PROMPT, MessageRole, SavedPrompt,
    TuningParams, ensure_system_message,
};
pub use error::ChatError;
pub use ports::{ByteStream, InferenceClient, InferenceError, KvStore, RepositoryError};
pub use registry::{DispatchBody, ModelConfig, ModelRegistry, ParamBounds, ResolvedParams};
pub use validate::validate_request;
