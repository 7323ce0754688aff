//! UseCase: tear down a connection.
//!
//! Always completes: unknown connections are only unregistered from the
//! transport.

use std::sync::Arc;

use crate::domain::{ConnectionId, Disconnection, MessagePusher, ServerEvent, SharedState};

use super::delivery::broadcast_or_log;

pub struct DisconnectClientUseCase {
    state: SharedState,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    pub fn new(state: SharedState, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            state,
            message_pusher,
        }
    }

    pub async fn execute(&self, connection_id: ConnectionId) -> Option<Disconnection> {
        let disconnection = self.state.lock().await.disconnect(&connection_id);
        self.message_pusher.unregister_client(&connection_id).await;

        let Some(disconnection) = disconnection else {
            tracing::debug!(connection_id = %connection_id, "disconnect of unknown connection");
            return None;
        };

        tracing::info!(
            connection_id = %connection_id,
            user_id = ?disconnection.connection.user_id().map(|id| id.value()),
            dequeued = disconnection.dequeued,
            "connection closed"
        );

        if let Some(departed) = &disconnection.departed {
            broadcast_or_log(
                self.message_pusher.as_ref(),
                &departed.remaining,
                &ServerEvent::UserLeft {
                    user_id: departed.user_id,
                },
            )
            .await;
        }
        Some(disconnection)
    }
}
