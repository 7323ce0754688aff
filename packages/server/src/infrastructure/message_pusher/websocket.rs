//! `MessagePusher` backed by per-connection WebSocket channels.
//!
//! The UI layer creates the socket and its outbound `UnboundedSender`; this
//! type only keeps the senders and encodes `ServerEvent`s onto them. Users
//! are addressable through every connection bound to them.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel, ServerEvent, UserId},
    infrastructure::dto::websocket::OutboundMessage,
};

#[derive(Default)]
struct Channels {
    clients: HashMap<ConnectionId, PusherChannel>,
    users: HashMap<UserId, HashSet<ConnectionId>>,
    bound_user: HashMap<ConnectionId, UserId>,
}

/// WebSocket implementation of `MessagePusher`
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_client(connection_id, tx).await;
/// pusher.push_to(&connection_id, &ServerEvent::WaitingForMatch).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    channels: Mutex<Channels>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    fn encode(event: &ServerEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&OutboundMessage::from(event))
            .map_err(|e| MessagePushError::Encoding(e.to_string()))
    }

    /// Number of registered connections
    pub async fn client_count(&self) -> usize {
        self.channels.lock().await.clients.len()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut channels = self.channels.lock().await;
        channels.clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut guard = self.channels.lock().await;
        let channels = &mut *guard;
        channels.clients.remove(connection_id);
        if let Some(user_id) = channels.bound_user.remove(connection_id) {
            if let Some(connections) = channels.users.get_mut(&user_id) {
                connections.remove(connection_id);
                if connections.is_empty() {
                    channels.users.remove(&user_id);
                }
            }
        }
        tracing::debug!("Connection '{}' unregistered from MessagePusher", connection_id);
    }

    async fn bind_user(&self, connection_id: &ConnectionId, user_id: UserId) {
        let mut channels = self.channels.lock().await;
        channels.bound_user.insert(*connection_id, user_id);
        channels
            .users
            .entry(user_id)
            .or_default()
            .insert(*connection_id);
        tracing::debug!("Connection '{}' bound to user {}", connection_id, user_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let channels = self.channels.lock().await;

        let sender = channels
            .clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;
        sender
            .send(frame)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed '{}' to connection '{}'", event.name(), connection_id);
        Ok(())
    }

    async fn push_to_user(
        &self,
        user_id: UserId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let channels = self.channels.lock().await;

        let connections = channels
            .users
            .get(&user_id)
            .filter(|connections| !connections.is_empty())
            .ok_or_else(|| MessagePushError::ClientNotFound(format!("user {user_id}")))?;
        for connection_id in connections {
            match channels.clients.get(connection_id) {
                Some(sender) => {
                    if let Err(e) = sender.send(frame.clone()) {
                        tracing::warn!(
                            "Failed to push '{}' to connection '{}' of user {}: {}",
                            event.name(),
                            connection_id,
                            user_id,
                            e
                        );
                    }
                }
                None => tracing::warn!(
                    "Connection '{}' of user {} has no channel, skipping",
                    connection_id,
                    user_id
                ),
            }
        }
        tracing::debug!("Pushed '{}' to user {}", event.name(), user_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let channels = self.channels.lock().await;

        for target in targets {
            if let Some(sender) = channels.clients.get(target) {
                if let Err(e) = sender.send(frame.clone()) {
                    tracing::warn!(
                        "Failed to push '{}' to connection '{}': {}",
                        event.name(),
                        target,
                        e
                    );
                } else {
                    tracing::debug!("Broadcasted '{}' to connection '{}'", event.name(), target);
                }
            } else {
                tracing::warn!("Connection '{}' not found during broadcast, skipping", target);
            }
        }

        Ok(())
    }
}
