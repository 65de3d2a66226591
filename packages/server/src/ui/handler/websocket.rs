//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, RoomId},
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
    ui::state::AppState,
    usecase::LeaveOutcome,
};

use serde::Deserialize;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Optional client-supplied connection id; the server generates one
    /// when absent or invalid.
    pub connection_id: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    // Convert String -> ConnectionId (Domain Model), or generate one
    let connection_id = match query.connection_id {
        Some(raw) => match ConnectionId::new(raw.clone()) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Invalid connection_id '{}' ({}), generating one", raw, e);
                ConnectionId::generate()
            }
        },
        None => ConnectionId::generate(),
    };

    // Create a channel for this client to receive pushed messages
    let (tx, rx) = mpsc::unbounded_channel();
    state.pusher.register_client(connection_id.clone(), tx).await;
    tracing::info!("Connection '{}' registered", connection_id.as_str());

    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id, rx))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: events published to the
/// rooms this connection joined (via rx channel) are sent to this client's
/// WebSocket connection.
///
/// # Arguments
///
/// * `rx` - Channel receiver for pushed events
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();

    // Tell the client the id the server will address it by
    {
        let connected = ServerEvent::Connected {
            connection_id: connection_id.as_str().to_string(),
        };
        let connected_json = serde_json::to_string(&connected).unwrap();
        if let Err(e) = sender.send(Message::Text(connected_json.into())).await {
            tracing::error!(
                "Failed to send connected handshake to '{}': {}",
                connection_id.as_str(),
                e
            );
            state.pusher.unregister_client(&connection_id).await;
            return;
        }
        tracing::info!("Sent connected handshake to '{}'", connection_id.as_str());
    }

    let recv_connection_id = connection_id.clone();
    let recv_state = state.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text: {}", text);

                    // Parse the incoming event; a malformed payload is
                    // logged and dropped without touching any room state
                    match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => {
                            handle_event(&recv_state, &recv_connection_id, event).await;
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Ignoring malformed event from '{}': {}",
                                recv_connection_id.as_str(),
                                e
                            );
                        }
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!(
                        "Connection '{}' requested close",
                        recv_connection_id.as_str()
                    );
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward pushed events to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Implicit leave: the connection dropped, so every joined room gets the
    // same treatment as an explicit leaveRoom
    let outcomes = state.disconnect_usecase.execute(&connection_id).await;
    tracing::info!(
        "Connection '{}' disconnected, left {} room(s)",
        connection_id.as_str(),
        outcomes.len()
    );
    for (room_id, outcome) in outcomes {
        broadcast_leave_outcome(&state, &room_id, outcome).await;
    }
}

/// Dispatch one parsed client event to its use case and publish the results.
async fn handle_event(state: &Arc<AppState>, connection_id: &ConnectionId, event: ClientEvent) {
    match event {
        ClientEvent::Join { room_id } => {
            let Ok(room_id) = RoomId::new(room_id) else {
                tracing::warn!("Rejecting join with invalid room id");
                return;
            };

            let outcome = state.join_room_usecase.execute(connection_id, &room_id).await;
            let student_count = outcome.student_count;
            tracing::info!(
                "Connection '{}' joined room '{}' as {}",
                connection_id.as_str(),
                room_id.as_str(),
                outcome.role.as_str()
            );

            // Snapshot goes only to the joiner
            let init = ServerEvent::Init {
                role: outcome.role.into(),
                current_code: outcome.current_code,
                student_count,
                chat_log: outcome.chat_log.into_iter().map(Into::into).collect(),
            };
            let init_json = serde_json::to_string(&init).unwrap();
            if let Err(e) = state.pusher.push_to(connection_id, &init_json).await {
                tracing::warn!("Failed to push init snapshot: {}", e);
            }

            // The new count goes to the whole room, joiner included
            let count = ServerEvent::StudentCountChanged { student_count };
            publish(state, &room_id, &count).await;
        }
        ClientEvent::UpdateCode { room_id, new_code } => {
            let Ok(room_id) = RoomId::new(room_id) else {
                tracing::warn!("Rejecting updateCode with invalid room id");
                return;
            };

            // Serialize here, publish inside the usecase: overwrite and
            // broadcast happen under the room's operation lock, so the
            // last codeUpdated on the wire always carries the latest code
            let code_updated_json = serde_json::to_string(&ServerEvent::CodeUpdated {
                new_code: new_code.clone(),
            })
            .unwrap();
            let solution_matched_json =
                serde_json::to_string(&ServerEvent::SolutionMatched).unwrap();

            state
                .update_code_usecase
                .execute(&room_id, &new_code, code_updated_json, solution_matched_json)
                .await;
        }
        ClientEvent::SendMessage { room_id, text } => {
            let Ok(room_id) = RoomId::new(room_id) else {
                tracing::warn!("Rejecting sendMessage with invalid room id");
                return;
            };

            let message = state
                .send_message_usecase
                .execute(connection_id.clone(), &room_id, text)
                .await;

            let event = ServerEvent::NewMessage(message.into());
            publish(state, &room_id, &event).await;
        }
        ClientEvent::LeaveRoom { room_id } => {
            let Ok(room_id) = RoomId::new(room_id) else {
                tracing::warn!("Rejecting leaveRoom with invalid room id");
                return;
            };

            let outcome = state
                .leave_room_usecase
                .execute(connection_id, &room_id)
                .await;
            tracing::info!(
                "Connection '{}' left room '{}'",
                connection_id.as_str(),
                room_id.as_str()
            );
            broadcast_leave_outcome(state, &room_id, outcome).await;
        }
    }
}

/// Publish the event a departure produced to the remaining room members.
async fn broadcast_leave_outcome(state: &Arc<AppState>, room_id: &RoomId, outcome: LeaveOutcome) {
    match outcome {
        LeaveOutcome::MentorLeft => {
            tracing::info!("Mentor left room '{}', state was reset", room_id.as_str());
            publish(state, room_id, &ServerEvent::MentorLeft).await;
        }
        LeaveOutcome::StudentLeft { student_count } => {
            publish(state, room_id, &ServerEvent::StudentCountChanged { student_count }).await;
        }
    }
}

/// Serialize an event and push it to every member of a room.
async fn publish(state: &Arc<AppState>, room_id: &RoomId, event: &ServerEvent) {
    let json = serde_json::to_string(event).unwrap();
    if let Err(e) = state.pusher.publish(room_id, &json).await {
        tracing::warn!("Failed to publish to room '{}': {}", room_id.as_str(), e);
    }
}
