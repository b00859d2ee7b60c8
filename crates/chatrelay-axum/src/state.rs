//! Shared application state type.

use std::sync::Arc;

use crate::bootstrap::AppContext;

/// Application state shared across all handlers.
///
/// An Arc-wrapped [`AppContext`] carrying the model registry, the KV
/// store and the inference client.
pub type AppState = Arc<AppContext>;
