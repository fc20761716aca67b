use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use vufeed::api::{create_ws_router, WsAppState};
use vufeed::config::{self, VuFeedConfig};
use vufeed::level::LevelReader;

const CONFIG_FILE: &str = "vufeed.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vufeed=info".into()),
        )
        .init();

    let config = resolve_config()?;

    info!(
        file_prefix = %config.audio.file_prefix,
        port = config.server.port,
        "vufeed starting"
    );

    let reader = Arc::new(LevelReader::new(config.audio.file_prefix));
    let state = Arc::new(WsAppState { reader });
    let app = create_ws_router(state);

    // A failed bind is the only fatal startup condition
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.server.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.server.port))?;

    info!(port = config.server.port, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

/// Config file if present, defaults otherwise, positional args on top
fn resolve_config() -> Result<VuFeedConfig> {
    let config = if Path::new(CONFIG_FILE).exists() {
        config::load_config(CONFIG_FILE)?
    } else {
        VuFeedConfig::default()
    };
    config.apply_args(std::env::args().skip(1))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
