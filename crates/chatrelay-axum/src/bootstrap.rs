//! Server bootstrap - the composition root.
//!
//! This module is the only place where infrastructure is wired together:
//! database pool, KV store, inference client and model registry.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use chatrelay_ai::{ProviderConfig, WorkersAiClient};
use chatrelay_core::ports::inference::InferenceClient;
use chatrelay_core::ports::kv::KvStore;
use chatrelay_core::registry::ModelRegistry;
use chatrelay_db::{SqliteKvStore, setup_database};

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Path to the `SQLite` database file.
    pub db_path: PathBuf,
    /// Optional path to static assets for SPA serving.
    pub static_dir: Option<PathBuf>,
    /// CORS configuration.
    pub cors: CorsConfig,
    /// Inference provider configuration.
    pub provider: ProviderConfig,
}

impl ServerConfig {
    /// Create config with defaults, provider settings from the environment.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            port: 8787,
            db_path: PathBuf::from("chatrelay.db"),
            static_dir: None,
            cors: CorsConfig::default(),
            provider: ProviderConfig::from_env(),
        }
    }

    /// Set the static directory for SPA serving.
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }
}

/// All services the handlers need.
pub struct AppContext {
    /// Read-only model registry, built once at startup.
    pub registry: ModelRegistry,
    /// Key-value store for prompts and chat configs.
    pub kv: Arc<dyn KvStore>,
    /// Inference provider client.
    pub inference: Arc<dyn InferenceClient>,
}

impl AppContext {
    /// Assemble a context from already-built parts.
    ///
    /// Primarily for tests, which inject stub clients and in-memory KV.
    #[must_use]
    pub fn new(
        registry: ModelRegistry,
        kv: Arc<dyn KvStore>,
        inference: Arc<dyn InferenceClient>,
    ) -> Self {
        Self {
            registry,
            kv,
            inference,
        }
    }
}

/// Bootstrap all services.
pub async fn bootstrap(config: &ServerConfig) -> Result<AppContext> {
    tracing::info!(
        db_path = %config.db_path.display(),
        provider_url = %config.provider.base_url,
        "bootstrapping chatrelay"
    );

    let pool = setup_database(&config.db_path).await?;
    let kv: Arc<dyn KvStore> = Arc::new(SqliteKvStore::new(pool));

    let inference: Arc<dyn InferenceClient> = Arc::new(WorkersAiClient::new(&config.provider));

    let registry = ModelRegistry::builtin();
    tracing::debug!(models = registry.len(), "model registry built");

    Ok(AppContext::new(registry, kv, inference))
}

/// Bootstrap and serve until shutdown.
///
/// If `config.static_dir` is set, serves static assets with SPA fallback.
/// Otherwise, serves only the API endpoints.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;

    let ctx = bootstrap(&config).await?;

    let app = if let Some(ref static_dir) = config.static_dir {
        tracing::info!("serving static assets from: {}", static_dir.display());
        crate::routes::create_spa_router(ctx, static_dir, &config.cors)
    } else {
        crate::routes::create_router(ctx, &config.cors)
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("chatrelay listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
