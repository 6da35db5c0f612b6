// [apps/server/src/handlers/session.rs]
//! The collaboration WebSocket endpoint. A session is a Triple-Task
//! arrangement — downstream, upstream, and an internal command worker —
//! so that a slow command handler never blocks outbound delivery and a
//! slow reader never blocks command ingestion (spec §4.8, §6).

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use warroom_domain::commands::InboundCommand;
use warroom_domain::events::OutboundEvent;
use warroom_domain::principal::Principal;

use crate::error::AppError;
use crate::services::command_dispatcher;
use crate::state::AppState;

const KEEPALIVE_INTERVAL_SECONDS: u64 = 25;
const COMMAND_BUFFER_CAPACITY: usize = 32;

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub token: String,
}

fn to_principal(account: &warroom_store::Account) -> Principal {
    Principal {
        id: account.id,
        display_name: account.display_name.clone(),
        email: account.email.clone(),
        role: account.role,
    }
}

/// Authenticates the bearer token carried as a query parameter before the
/// protocol upgrade completes — a rejected handshake never reaches
/// `on_upgrade`, so an unauthenticated caller never gets a socket at all.
pub async fn handler(
    websocket_upgrade: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<impl IntoResponse, AppError> {
    let claims = state.verifier.verify(&query.token)?;
    let account = state.users.find_by_id(claims.sub).await?;
    let principal = to_principal(&account);

    Ok(websocket_upgrade.on_upgrade(move |socket| run_session(socket, state, principal)))
}

#[instrument(skip(socket, state, principal), fields(principal_id = %principal.id))]
async fn run_session(socket: WebSocket, state: AppState, principal: Principal) {
    let session_id = Uuid::new_v4();
    let (mut socket_sender, mut socket_receiver) = socket.split();
    let mut outbound_receiver = state.room_hub.register_session(session_id);

    info!(%session_id, "session opened");

    let (command_sender, mut command_receiver) = mpsc::channel::<InboundCommand>(COMMAND_BUFFER_CAPACITY);

    let worker_state = state.clone();
    let worker_principal = principal.clone();
    let mut worker_task = tokio::spawn(async move {
        while let Some(command) = command_receiver.recv().await {
            command_dispatcher::dispatch(&worker_state, &worker_principal, session_id, command).await;
        }
    });

    let mut downstream_task = tokio::spawn(async move {
        let mut keepalive = interval(Duration::from_secs(KEEPALIVE_INTERVAL_SECONDS));
        loop {
            tokio::select! {
                _ = keepalive.tick() => {
                    if socket_sender.send(Message::Ping(Vec::new())).await.is_err() {
                        break;
                    }
                }
                received = outbound_receiver.recv() => {
                    let Some(event) = received else { break };
                    match serde_json::to_string(&event) {
                        Ok(payload) => {
                            if socket_sender.send(Message::Text(payload)).await.is_err() {
                                break;
                            }
                        }
                        Err(error) => warn!(%session_id, %error, "failed to encode outbound event"),
                    }
                }
            }
        }
    });

    let mut upstream_task = tokio::spawn(async move {
        while let Some(frame) = socket_receiver.next().await {
            match frame {
                Ok(Message::Text(raw)) => match serde_json::from_str::<InboundCommand>(&raw) {
                    Ok(command) => {
                        if command_sender.send(command).await.is_err() {
                            break;
                        }
                    }
                    Err(error) => debug!(%session_id, %error, "dropped malformed inbound frame"),
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(error) => {
                    warn!(%session_id, %error, "socket read error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut downstream_task => {
            upstream_task.abort();
            worker_task.abort();
        }
        _ = &mut upstream_task => {
            downstream_task.abort();
            worker_task.abort();
        }
        _ = &mut worker_task => {
            downstream_task.abort();
            upstream_task.abort();
        }
    }

    cleanup_session(&state, session_id, principal.id).await;
    info!(%session_id, "session closed");
}

/// Unwinds everything a session held: room subscriptions, presence
/// entries, and any outstanding focus cursor, broadcasting the matching
/// `presence:left` / `focus:cleared` events to the rooms it leaves behind.
async fn cleanup_session(state: &AppState, session_id: Uuid, principal_id: Uuid) {
    state.room_hub.remove_session(session_id);

    let pairs = state.presence.remove_by_session(session_id).await;
    for (incident_id, principal_id) in &pairs {
        state.room_hub.broadcast(
            *incident_id,
            OutboundEvent::PresenceLeft { incident_id: *incident_id, principal_id: *principal_id },
            None,
        );
    }

    if let Some(entry) = state.focus.clear(principal_id) {
        state.room_hub.broadcast(
            entry.incident_id,
            OutboundEvent::FocusCleared { incident_id: entry.incident_id, principal_id },
            None,
        );
    }
}
