//! WebSocket connection handler.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{ClientEvent, ConnectionId},
    infrastructure::dto::websocket::InboundMessage,
    ui::state::AppState,
    usecase::CoordinatorError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Forwards encoded events from the connection's channel to the socket
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();
    state.coordinator.connect(connection_id, tx).await;

    let (sender, mut receiver) = socket.split();
    let coordinator = state.coordinator.clone();
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

    // The stop signal is only observed between frames; a dispatch in flight
    // always runs to completion.
    let mut recv_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                _ = &mut stop_rx => break,
                msg = receiver.next() => msg,
            };
            let Some(msg) = msg else {
                break;
            };
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!(connection_id = %connection_id, "WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match serde_json::from_str::<InboundMessage>(&text) {
                    Ok(message) => {
                        coordinator
                            .dispatch(connection_id, ClientEvent::from(message))
                            .await;
                    }
                    Err(e) => {
                        tracing::warn!(connection_id = %connection_id, "Malformed frame: {}", e);
                        coordinator
                            .report(
                                connection_id,
                                "frame",
                                CoordinatorError::Validation(e.to_string()),
                            )
                            .await;
                    }
                },
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!(connection_id = %connection_id, "Client requested close");
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If the reader completes, abort the writer. If the writer completes, ask
    // the reader to stop after its current frame.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => {
            let _ = stop_tx.send(());
            if let Err(e) = recv_task.await {
                tracing::error!(connection_id = %connection_id, "Reader task failed: {}", e);
            }
        }
    };

    state.coordinator.disconnect(connection_id).await;
}
