//! Transport delivery interface.
//!
//! The use cases decide *who* receives an event; a `MessagePusher`
//! implementation decides *how* it reaches them.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, ServerEvent, UserId};

/// Outbound channel of a single connection (encoded frames)
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register the outbound channel of a new connection
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Drop the channel and any user binding of a connection
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// Make the connection reachable through the user-addressed channel of `user_id`
    async fn bind_user(&self, connection_id: &ConnectionId, user_id: UserId);

    /// Push an event to one connection
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// Push an event to every connection bound to `user_id`
    async fn push_to_user(&self, user_id: UserId, event: &ServerEvent)
    -> Result<(), MessagePushError>;

    /// Push an event to every target; unreachable targets are skipped
    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;
}
