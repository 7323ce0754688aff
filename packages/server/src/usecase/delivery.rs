//! Fire-and-forget delivery helpers.
//!
//! Delivery failures never propagate to the caller; they are logged here.

use crate::domain::{ConnectionId, MessagePusher, ServerEvent, UserId};

pub async fn push_or_log(
    pusher: &dyn MessagePusher,
    connection_id: &ConnectionId,
    event: &ServerEvent,
) {
    if let Err(e) = pusher.push_to(connection_id, event).await {
        tracing::warn!(
            connection_id = %connection_id,
            event = event.name(),
            "failed to deliver event: {}",
            e
        );
    }
}

pub async fn push_to_user_or_log(
    pusher: &dyn MessagePusher,
    user_id: UserId,
    event: &ServerEvent,
) {
    if let Err(e) = pusher.push_to_user(user_id, event).await {
        tracing::warn!(
            user_id = %user_id,
            event = event.name(),
            "failed to deliver event: {}",
            e
        );
    }
}

pub async fn broadcast_or_log(
    pusher: &dyn MessagePusher,
    targets: &[ConnectionId],
    event: &ServerEvent,
) {
    if targets.is_empty() {
        return;
    }
    if let Err(e) = pusher.broadcast(targets, event).await {
        tracing::warn!(event = event.name(), "failed to broadcast event: {}", e);
    } else {
        tracing::debug!(event = event.name(), recipients = targets.len(), "broadcast");
    }
}
