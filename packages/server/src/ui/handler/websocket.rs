//! WebSocket signaling endpoint and the per-connection pump.
//!
//! Each accepted connection runs two loops coupled only through the
//! connection's cancellation token and its wire: a receiver that decodes
//! incoming frames, stamps the authenticated identity and hands them to the
//! switch, and a sender that drains the outbound wire interleaved with
//! keepalive pings. Either loop exiting cancels the other; the handler
//! waits for both before the close handshake and session teardown.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::sync::mpsc;
use tokio::time::{Instant, interval_at, sleep_until, timeout};
use tokio_util::sync::CancellationToken;

use crate::domain::{Announcement, RoomId, UserId, new_wire};
use crate::ui::state::AppState;
use crate::usecase::CreateSessionError;

/// Timing knobs of the connection pump.
///
/// `pong_wait - ping_interval` is how long the client has to answer a
/// keepalive probe before its read deadline expires.
#[derive(Debug, Clone, Copy)]
pub struct PumpConfig {
    /// Keepalive probe period.
    pub ping_interval: Duration,
    /// Rolling read deadline, reset on every pong.
    pub pong_wait: Duration,
    /// Upper bound for a single outgoing frame write.
    pub write_deadline: Duration,
    /// Upper bound for the close-frame write during teardown.
    pub close_write_deadline: Duration,
    /// Maximum accepted incoming frame size in bytes.
    pub max_message_size: usize,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(5),
            pong_wait: Duration::from_secs(7),
            write_deadline: Duration::from_secs(5),
            close_write_deadline: Duration::from_secs(2),
            max_message_size: 9000,
        }
    }
}

pub async fn signal_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path((room_id, user_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert path segments into domain ids before any upgrade attempt.
    let room_id = match RoomId::new(room_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid room id in signal path: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };
    let user_id = match UserId::new(user_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid user id in signal path: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    // Check room membership before upgrading.
    if let Err(e) = state
        .create_session_usecase
        .authorize(&room_id, &user_id)
        .await
    {
        tracing::warn!(
            "Rejecting signaling connection of '{}' to room '{}': {}",
            user_id,
            room_id,
            e
        );
        return Err(match e {
            CreateSessionError::GetRoom(_) => StatusCode::NOT_FOUND,
            CreateSessionError::NotAMember(_) => StatusCode::FORBIDDEN,
        });
    }

    let config = state.pump;
    Ok(ws
        .max_message_size(config.max_message_size)
        .on_upgrade(move |socket| handle_socket(socket, state, room_id, user_id)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, room_id: RoomId, user_id: UserId) {
    let config = state.pump;
    let (pump_wire, switch_wire) = new_wire();
    let cancel = CancellationToken::new();

    if let Err(e) = state
        .create_session_usecase
        .execute(cancel.clone(), room_id.clone(), user_id.clone(), switch_wire)
        .await
    {
        tracing::error!(
            "Failed to create signaling session for '{}' in room '{}': {}",
            user_id,
            room_id,
            e
        );
        let (sink, _stream) = socket.split();
        close_socket(sink, config).await;
        return;
    }
    tracing::debug!(
        "Signaling session created for '{}' in room '{}'",
        user_id,
        room_id
    );

    let (sink, stream) = socket.split();

    // Either loop exiting cancels the shared token, which stops the other
    // loop and the switch's forwarding loop for this connection.
    let recv_cancel = cancel.clone();
    let recv_user = user_id.clone();
    let inbound = pump_wire.inbound;
    let recv_task = tokio::spawn(async move {
        receiver_loop(stream, recv_user, inbound, recv_cancel.clone(), config).await;
        recv_cancel.cancel();
    });

    let send_cancel = cancel.clone();
    let outbound = pump_wire.outbound;
    let send_task = tokio::spawn(async move {
        let sink = sender_loop(sink, outbound, send_cancel.clone(), config).await;
        send_cancel.cancel();
        sink
    });

    let (recv_result, send_result) = tokio::join!(recv_task, send_task);
    if let Err(e) = recv_result {
        tracing::error!("Receiver task of '{}' did not finish cleanly: {}", user_id, e);
    }
    match send_result {
        Ok(sink) => close_socket(sink, config).await,
        Err(e) => tracing::error!("Sender task of '{}' did not finish cleanly: {}", user_id, e),
    }

    state
        .delete_session_usecase
        .execute(room_id.clone(), user_id.clone())
        .await;
    tracing::debug!(
        "Signaling session for '{}' in room '{}' ended",
        user_id,
        room_id
    );
}

/// Read frames from the transport and feed decoded announcements into the
/// wire, enforcing the sliding keepalive deadline.
async fn receiver_loop(
    mut stream: SplitStream<WebSocket>,
    user_id: UserId,
    inbound: mpsc::Sender<Announcement>,
    cancel: CancellationToken,
    config: PumpConfig,
) {
    let mut deadline = Instant::now() + config.pong_wait;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = sleep_until(deadline) => {
                tracing::warn!("Keepalive deadline of '{}' expired, connection is dead", user_id);
                break;
            }
            frame = stream.next() => match frame {
                None => {
                    tracing::warn!("Connection of '{}' closed", user_id);
                    break;
                }
                Some(Err(e)) => {
                    tracing::error!("Unexpected error during receive from '{}': {}", user_id, e);
                    break;
                }
                Some(Ok(Message::Pong(_))) => {
                    tracing::trace!("Got pong from '{}'", user_id);
                    deadline = Instant::now() + config.pong_wait;
                }
                // Pong replies to client pings are queued by axum itself.
                Some(Ok(Message::Ping(_))) => {}
                Some(Ok(Message::Close(_))) => {
                    tracing::warn!("Connection closed by '{}'", user_id);
                    break;
                }
                Some(Ok(Message::Text(text))) => {
                    if !handle_incoming(text.as_bytes(), &user_id, &inbound, &cancel).await {
                        break;
                    }
                }
                Some(Ok(Message::Binary(data))) => {
                    if !handle_incoming(&data, &user_id, &inbound, &cancel).await {
                        break;
                    }
                }
            },
        }
    }
}

/// Decode one frame and hand it to the wire.
///
/// A malformed message is logged and dropped without terminating the
/// connection. Returns `false` when the session is shutting down and the
/// receiver loop should stop.
async fn handle_incoming(
    data: &[u8],
    user_id: &UserId,
    inbound: &mpsc::Sender<Announcement>,
    cancel: &CancellationToken,
) -> bool {
    let mut ann: Announcement = match serde_json::from_slice(data) {
        Ok(ann) => ann,
        Err(e) => {
            tracing::error!("Failed to decode incoming message from '{}': {}", user_id, e);
            return true;
        }
    };
    ann.stamp_src(user_id);
    tokio::select! {
        _ = cancel.cancelled() => false,
        result = inbound.send(ann) => result.is_ok(),
    }
}

/// Drain the outbound wire towards the transport, interleaved with
/// keepalive pings. Returns the sink for the close handshake.
async fn sender_loop(
    mut sink: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<Announcement>,
    cancel: CancellationToken,
    config: PumpConfig,
) -> SplitSink<WebSocket, Message> {
    let mut ping = interval_at(Instant::now() + config.ping_interval, config.ping_interval);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ping.tick() => {
                match timeout(config.write_deadline, sink.send(Message::Ping(Vec::new().into()))).await {
                    Ok(Ok(())) => tracing::trace!("Ping sent"),
                    Ok(Err(e)) => {
                        tracing::error!("Failed to send ping: {}", e);
                        break;
                    }
                    Err(_) => {
                        tracing::error!("Ping write deadline exceeded");
                        break;
                    }
                }
            }
            received = outbound.recv() => match received {
                None => break,
                Some(ann) => {
                    let text = match serde_json::to_string(&ann) {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::error!("Failed to encode outgoing message: {}", e);
                            break;
                        }
                    };
                    match timeout(config.write_deadline, sink.send(Message::Text(text.into()))).await {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => {
                            tracing::error!("Failed to write outgoing message: {}", e);
                            break;
                        }
                        Err(_) => {
                            tracing::error!("Write deadline exceeded");
                            break;
                        }
                    }
                }
            },
        }
    }
    sink
}

/// Best-effort close handshake; failures are logged, never escalated.
async fn close_socket(mut sink: SplitSink<WebSocket, Message>, config: PumpConfig) {
    match timeout(config.close_write_deadline, sink.send(Message::Close(None))).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::debug!("Failed to send close frame: {}", e),
        Err(_) => tracing::debug!("Close frame write deadline exceeded"),
    }
}
