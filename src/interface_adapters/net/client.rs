// Per-connection WebSocket handling: decode inbound messages, route them
// through the session hub, and write queued hub deliveries back out.

use crate::interface_adapters::protocol::{ClientMessage, ServerMessage};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::conn_id::next_conn_id;
use crate::use_cases::{ConnId, SessionHub, SessionPayload};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, Stream, StreamExt};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

const LOG_THROTTLE: Duration = Duration::from_secs(2);
// Outbound queue per connection; a slow client drops its own messages
// instead of stalling the room.
const OUTBOUND_CHANNEL_CAPACITY: usize = 256;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let hub = state.hub.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

async fn handle_socket(socket: WebSocket, hub: Arc<SessionHub>) {
    // Connection id correlates logs before a player id exists; the hub
    // logs the player id once the connection identifies.
    let conn_id = next_conn_id();

    let (out_tx, mut out_rx) = mpsc::channel::<SessionPayload>(OUTBOUND_CHANNEL_CAPACITY);
    hub.open(conn_id, out_tx).await;
    info!(conn_id, "client connected");

    let (mut ws_tx, mut ws_rx) = socket.split();

    // Writer task: encodes queued payloads onto the socket in queue
    // order. It ends on its own once the hub releases the connection's
    // sender.
    let writer = tokio::spawn(async move {
        while let Some(payload) = out_rx.recv().await {
            let msg = ServerMessage::from(&payload);
            let txt = match serde_json::to_string(&msg) {
                Ok(txt) => txt,
                Err(e) => {
                    error!(conn_id, error = ?e, "failed to serialize server message");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(txt.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    run_reader_loop(&mut ws_rx, conn_id, &hub).await;

    // Transport closed: cache the player for reconnection and tell the
    // rest of the room.
    hub.close(conn_id).await;
    let _ = writer.await;
    info!(conn_id, "client disconnected");
}

async fn run_reader_loop(
    ws_rx: &mut (impl Stream<Item = Result<Message, axum::Error>> + Unpin),
    conn_id: ConnId,
    hub: &Arc<SessionHub>,
) {
    let mut msgs_in: u64 = 0;
    let mut bytes_in: u64 = 0;
    let mut invalid_msgs: u32 = 0;
    let mut last_invalid_log = Instant::now() - LOG_THROTTLE;

    while let Some(incoming) = ws_rx.next().await {
        match incoming {
            Ok(Message::Text(text)) => {
                msgs_in += 1;
                bytes_in += text.len() as u64;

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(msg) => hub.handle(conn_id, msg.into()).await,
                    Err(parse_err) => {
                        // Recoverable per-message failure: drop it, keep
                        // the connection, send no reply.
                        invalid_msgs += 1;
                        if should_log(&mut last_invalid_log) {
                            warn!(
                                conn_id,
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse client message; dropped"
                            );
                        }
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                invalid_msgs += 1;
                if should_log(&mut last_invalid_log) {
                    warn!(conn_id, "binary message dropped; text frames expected");
                }
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Ok(Message::Close(_)) => break,
            Err(e) => {
                warn!(conn_id, error = %e, "websocket recv error");
                break;
            }
        }
    }

    debug!(conn_id, msgs_in, bytes_in, invalid_msgs, "connection stats");
}
