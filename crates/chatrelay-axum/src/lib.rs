//! Axum web adapter for chatrelay: router, handlers, error mapping, the
//! streaming metadata relay, and the bootstrap composition root.

#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings; used by integration tests.
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use base64 as _;
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tower as _;
#[cfg(test)]
use urlencoding as _;

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod relay;
pub mod routes;
pub mod state;

// Re-export primary types
pub use bootstrap::{AppContext, CorsConfig, ServerConfig, bootstrap, start_server};
pub use error::HttpError;
pub use relay::{MetaTrailer, StreamMetadata};
pub use routes::{create_router, create_spa_router};
pub use state::AppState;
