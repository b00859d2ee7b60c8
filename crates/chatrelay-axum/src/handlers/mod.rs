//! HTTP request handlers for the Axum web server.
//!
//! Each submodule contains handlers for a specific API area.
//! Handlers are thin wrappers that delegate to the core decode and
//! registry layers and to the stores behind `AppContext`.

pub mod chat;
pub mod configs;
pub mod models;
pub mod prompts;
