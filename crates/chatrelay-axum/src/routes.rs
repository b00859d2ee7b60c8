//! Route definitions and router construction.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::bootstrap::{AppContext, CorsConfig};
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            use axum::http::HeaderValue;
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Build all API routes without the `/api` prefix (for nesting under /api).
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        // Chat endpoint - the core of the service
        .route("/chat", post(handlers::chat::chat))
        // Model registry listing
        .route("/models", get(handlers::models::list))
        // Saved prompts CRUD
        .route(
            "/prompts",
            get(handlers::prompts::list).post(handlers::prompts::create),
        )
        .route(
            "/prompts/{id}",
            get(handlers::prompts::get)
                .put(handlers::prompts::update)
                .delete(handlers::prompts::remove),
        )
        // Chat configurations CRUD
        .route(
            "/configs",
            get(handlers::configs::list).post(handlers::configs::create),
        )
        .route(
            "/configs/{id}",
            get(handlers::configs::get)
                .put(handlers::configs::update)
                .delete(handlers::configs::remove),
        )
        .route("/configs/{id}/test", post(handlers::configs::test))
}

/// Create the main router with all API routes.
///
/// # Path Parameter Syntax
/// Axum 0.8 uses brace syntax for path parameters: `{id}`
pub fn create_router(ctx: AppContext, cors_config: &CorsConfig) -> Router {
    let state: AppState = Arc::new(ctx);
    let cors = build_cors_layer(cors_config);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes().with_state(state).layer(cors))
}

/// Create a router with API routes and static asset serving.
///
/// Serves API routes under `/api/*` and `/health`, static assets for
/// matching files, and falls back to `index.html` for client-side routing.
pub fn create_spa_router<P: AsRef<Path>>(
    ctx: AppContext,
    static_dir: P,
    cors_config: &CorsConfig,
) -> Router {
    let static_path = static_dir.as_ref();
    let index_path = static_path.join("index.html");

    let serve_dir = ServeDir::new(static_path).fallback(ServeFile::new(&index_path));

    create_router(ctx, cors_config).fallback_service(serve_dir)
}

/// Health check endpoint.
pub(crate) async fn health_check() -> &'static str {
    "OK"
}
