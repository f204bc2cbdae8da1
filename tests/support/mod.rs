// Shared primitives for driving a live relay server in integration tests.

use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Boots a dedicated server on an ephemeral port and returns its ws URL.
/// Each test gets its own server so room state never leaks across tests.
pub async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        let _ = relay_server::run(listener).await;
    });
    format!("ws://{addr}/ws")
}

pub async fn connect(url: &str) -> WsClient {
    let (ws, _response) = connect_async(url).await.expect("websocket connect");
    ws
}

pub async fn send_json(ws: &mut WsClient, value: serde_json::Value) {
    ws.send(Message::Text(value.to_string()))
        .await
        .expect("send message");
}

/// Receives the next text frame as JSON, skipping control frames.
pub async fn recv_json(ws: &mut WsClient) -> serde_json::Value {
    let deadline = tokio::time::sleep(RECV_TIMEOUT);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            frame = ws.next() => {
                match frame.expect("connection closed while waiting for a message") {
                    Ok(Message::Text(text)) => {
                        return serde_json::from_str(&text).expect("server sent valid JSON");
                    }
                    Ok(_) => continue,
                    Err(e) => panic!("websocket error: {e}"),
                }
            }
            _ = &mut deadline => panic!("timed out waiting for a server message"),
        }
    }
}

/// Asserts that no text frame arrives within the given window.
pub async fn expect_silence(ws: &mut WsClient, window: Duration) {
    let deadline = tokio::time::sleep(window);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            frame = ws.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        panic!("expected no message, received: {text}");
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => panic!("websocket error: {e}"),
                    None => return,
                }
            }
            _ = &mut deadline => return,
        }
    }
}
