//! Distribution Engine HTTP Server Binary
//!
//! Loads the engine settings and data snapshot, sets up the HTTP router and
//! starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! CONFIG_DIR=./config/sample RUST_LOG=info cargo run --bin distribution-server
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG_DIR`: Configuration directory holding `engine.yaml` (default: ./config/sample)
//! - `RUST_LOG`: Log filter (default: info)

use std::env;

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use distribution_engine::api::{AppState, create_router};
use distribution_engine::config::ConfigLoader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Distribution Engine HTTP Server");

    let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "./config/sample".to_string());
    let config = ConfigLoader::load(&config_dir)?;
    info!(config_dir = %config_dir, "Configuration loaded");

    // Load the snapshot once and share it across the app
    let state = AppState::from_config(&config)?;
    let app = create_router(state);

    let addr = config.settings().bind_address.clone();
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
