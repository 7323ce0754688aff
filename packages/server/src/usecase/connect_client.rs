//! UseCase: register a new transport connection.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, SharedState};

/// Registers a connection in the coordinator state and with the transport
pub struct ConnectClientUseCase {
    state: SharedState,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    pub fn new(state: SharedState, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            state,
            message_pusher,
        }
    }

    pub async fn execute(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.state.lock().await.connect(connection_id);
        self.message_pusher
            .register_client(connection_id, sender)
            .await;
        tracing::info!(connection_id = %connection_id, "connection registered");
    }
}
