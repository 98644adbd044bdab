//! Darul Ifta server
//!
//! HTTP front end for fatwa request intake, public listing and reviewer
//! decisions, plus the operator commands of the `ifta` binary.

#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;

pub use cli::{Cli, Command};
pub use config::ServerConfig;
pub use error::{Result, ServerError};

use handlers::{create_router, AppState};
use ifta_store::SqliteStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over `default_level` when set. Calling this more than
/// once is harmless.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Open the store named by the configuration
pub fn open_store(config: &ServerConfig) -> Result<SqliteStore> {
    let store = SqliteStore::open(&config.database_path)?;
    info!(database = %config.database_path, "Opened request store");
    Ok(store)
}

/// Start the HTTP server
///
/// Opens the store, serves until Ctrl-C, then closes the store.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    info!("Starting Darul Ifta server");
    info!("Bind address: {}", config.bind_addr());

    let store = Arc::new(open_store(&config)?);

    let state = AppState {
        store: Arc::clone(&store),
        listing: config.listing.clone(),
        static_dir: config.static_dir.clone(),
    };
    if let Some(dir) = &state.static_dir {
        info!(dir = %dir.display(), "Serving static pages");
    }

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    match Arc::try_unwrap(store) {
        Ok(store) => store.close()?,
        Err(_) => warn!("Store still in use at shutdown, skipping close"),
    }
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
