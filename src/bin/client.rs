//! Trivial test client: subscribe to a unit's levels and print every
//! message the server pushes.
//!
//! Usage: vufeed-client [url] [frequency] [unit]

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vufeed_client=info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let url = args
        .next()
        .unwrap_or_else(|| "ws://localhost:5555/ws".to_string());
    let frequency: f64 = args
        .next()
        .unwrap_or_else(|| "1".to_string())
        .parse()
        .context("invalid frequency argument")?;
    let unit = args.next().unwrap_or_else(|| "0".to_string());

    let (mut socket, _) = connect_async(url.as_str())
        .await
        .with_context(|| format!("failed to connect to {url}"))?;
    info!(url = %url, "connected");

    let request = json!({ "event": "audio", "frequency": frequency, "unit": unit });
    socket
        .send(Message::text(request.to_string()))
        .await
        .context("failed to send audio request")?;

    while let Some(msg) = socket.next().await {
        match msg.context("websocket error")? {
            Message::Text(text) => println!("{text}"),
            Message::Close(_) => break,
            _ => {}
        }
    }

    Ok(())
}
