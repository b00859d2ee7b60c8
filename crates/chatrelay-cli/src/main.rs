//! CLI entry point.
//!
//! Wires configuration from flags and environment, then hands off to the
//! web adapter's bootstrap. No infrastructure is constructed here.

#![deny(unused_crate_dependencies)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use chatrelay_axum::{ServerConfig, start_server};
use chatrelay_core::registry::ModelRegistry;

/// Command-line interface for the chatrelay server.
#[derive(Parser)]
#[command(name = "chatrelay")]
#[command(about = "Chat backend relaying requests to a hosted inference provider")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value_t = 8787, env = "CHATRELAY_PORT")]
        port: u16,

        /// Path to the SQLite database file.
        #[arg(long, default_value = "chatrelay.db", env = "CHATRELAY_DB")]
        db: PathBuf,

        /// Serve static assets from this directory with SPA fallback.
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Restrict CORS to these origins. Repeatable; default allows all.
        #[arg(long = "allow-origin")]
        allow_origins: Vec<String>,
    },

    /// List the built-in model registry.
    Models,
}

fn print_models() {
    let registry = ModelRegistry::builtin();
    println!("{:<20} {:<45} {}", "KEY", "PROVIDER ID", "NAME");
    for (key, config) in registry.iter() {
        println!("{:<20} {:<45} {}", key, config.id, config.display_name);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            db,
            static_dir,
            allow_origins,
        } => {
            let mut config = ServerConfig::with_defaults();
            config.port = port;
            config.db_path = db;
            if let Some(dir) = static_dir {
                config = config.with_static_dir(dir);
            }
            if !allow_origins.is_empty() {
                config = config.with_allowed_origins(allow_origins);
            }
            start_server(config).await?;
        }
        Commands::Models => print_models(),
    }

    Ok(())
}
