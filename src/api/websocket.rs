use axum::{
    extract::{State, ws::{Message, WebSocket, WebSocketUpgrade}},
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval, Duration};
use crate::api::rest::AppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Answer to a client text frame, if it needs one
fn reply_to(text: &str) -> Option<String> {
    let cmd: serde_json::Value = serde_json::from_str(text).ok()?;
    (cmd["type"] == "ping").then(|| r#"{"type":"pong"}"#.to_string())
}

/// Sends the current snapshot, then every notification as it happens
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut notifications = state.store.subscribe();
    let mut heartbeat_ticker = interval(Duration::from_secs(10));

    let snapshot = serde_json::json!({
        "type": "state",
        "data": state.store.snapshot(state.prefs.dark_mode()),
    });
    if sender.send(Message::Text(snapshot.to_string())).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            note = notifications.recv() => {
                match note {
                    Ok(note) => {
                        let msg = serde_json::json!({
                            "type": "notification",
                            "data": note,
                        });
                        match tokio::time::timeout(
                            Duration::from_secs(5),
                            sender.send(Message::Text(msg.to_string()))
                        ).await {
                            Ok(Ok(_)) => {},
                            _ => return,
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!("WebSocket client lagged, {} notifications skipped", skipped);
                    }
                    Err(RecvError::Closed) => return,
                }
            }

            _ = heartbeat_ticker.tick() => {
                if sender.send(Message::Ping(vec![])).await.is_err() {
                    return;
                }
            }

            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = reply_to(&text) {
                            if sender.send(Message::Text(reply)).await.is_err() {
                                return;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => return,
                    _ => {}
                }
            }
        }
    }
}
