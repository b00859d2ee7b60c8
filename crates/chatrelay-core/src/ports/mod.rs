//! Port definitions: interfaces core depends on, implemented by adapters.

pub mod inference;
pub mod kv;

pub use inference::{ByteStream, InferenceClient, InferenceError};
pub use kv::{KvStore, RepositoryError};
