use crate::level::LevelReader;
use crate::subscription::protocol::{validate_request, AudioMessage, ClientMessage, ErrorMessage};
use axum::extract::ws::{Message, WebSocket};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::{interval_at, Instant, Interval};
use tracing::{error, info, warn};
use uuid::Uuid;

/// An armed poll timer plus the resolved file it reads each tick.
struct ActivePoll {
    interval: Interval,
    path: PathBuf,
}

/// Manages a single WebSocket connection with at most one level poll
pub struct ConnectionManager {
    reader: Arc<LevelReader>,
    connection_id: Uuid,
}

impl ConnectionManager {
    pub fn new(reader: Arc<LevelReader>) -> Self {
        Self {
            reader,
            connection_id: Uuid::new_v4(),
        }
    }

    /// Handle WebSocket connection lifecycle
    ///
    /// Runs one select loop over inbound frames and the optional poll
    /// timer. Returning drops the timer, so a disconnect ends the poll
    /// with no extra bookkeeping.
    pub async fn handle(self, mut socket: WebSocket) {
        info!(connection = %self.connection_id, "WebSocket connection established");

        let mut poll: Option<ActivePoll> = None;

        loop {
            tokio::select! {
                // Handle incoming client messages
                msg = socket.recv() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if let Err(e) = self
                                .handle_client_message(&mut socket, &text, &mut poll)
                                .await
                            {
                                error!(connection = %self.connection_id, error = %e, "Error handling client message");
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!(connection = %self.connection_id, "WebSocket client disconnected");
                            break;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = socket.send(Message::Pong(data)).await {
                                error!(connection = %self.connection_id, error = %e, "Failed to send pong");
                                break;
                            }
                        }
                        Some(Ok(_)) => {
                            // Ignore binary, pong messages
                        }
                        Some(Err(e)) => {
                            warn!(connection = %self.connection_id, error = %e, "WebSocket error");
                            break;
                        }
                    }
                }

                // Poll the unit's level file on each timer fire
                _ = Self::next_tick(&mut poll), if poll.is_some() => {
                    let snapshot = match poll.as_ref() {
                        Some(active) => self.reader.read_path(&active.path).await,
                        None => None,
                    };

                    // A failed read emits nothing; the next tick retries
                    if let Some(snapshot) = snapshot {
                        if let Err(e) = Self::send_levels(&mut socket, snapshot.levels).await {
                            error!(connection = %self.connection_id, error = %e, "Failed to send levels");
                            break;
                        }
                    }
                }
            }
        }

        info!(connection = %self.connection_id, "WebSocket connection closed");
    }

    /// Wait for the active timer; never resolves when no poll is armed
    /// (the select arm is guarded by `poll.is_some()`).
    async fn next_tick(poll: &mut Option<ActivePoll>) {
        match poll {
            Some(active) => {
                active.interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    /// Handle an audio request: validate and arm (or replace) the poll
    async fn handle_client_message(
        &self,
        socket: &mut WebSocket,
        text: &str,
        poll: &mut Option<ActivePoll>,
    ) -> anyhow::Result<()> {
        let msg: ClientMessage = serde_json::from_str(text)?;

        match msg {
            ClientMessage::Audio { frequency, unit } => {
                // Validation also derives the poll period, rejecting
                // frequencies whose period Duration cannot represent
                let (period, unit) = match validate_request(frequency, unit) {
                    Ok(fields) => fields,
                    Err(reason) => {
                        // An invalid request leaves any running poll untouched
                        let json = serde_json::to_string(&ErrorMessage::new(reason.to_string()))?;
                        socket.send(Message::Text(json)).await?;
                        return Ok(());
                    }
                };

                if poll.take().is_some() {
                    info!(connection = %self.connection_id, "Replacing active subscription");
                }

                let path = self.reader.unit_path(&unit);

                // First fire lands one full period after the request
                let interval = interval_at(Instant::now() + period, period);
                *poll = Some(ActivePoll {
                    interval,
                    path: path.clone(),
                });

                info!(
                    connection = %self.connection_id,
                    unit = %unit,
                    period_ms = period.as_millis() as u64,
                    path = %path.display(),
                    "Client subscribed to unit levels"
                );
            }
        }

        Ok(())
    }

    /// Send one tick's decoded levels to the client
    async fn send_levels(socket: &mut WebSocket, levels: Vec<u8>) -> anyhow::Result<()> {
        let json = serde_json::to_string(&AudioMessage::new(levels))?;
        socket.send(Message::Text(json)).await?;
        Ok(())
    }
}
