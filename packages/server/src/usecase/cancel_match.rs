//! UseCase: leave the match queue.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, ServerEvent, SharedState};

use super::{delivery::push_or_log, error::CoordinatorError};

pub struct CancelMatchUseCase {
    state: SharedState,
    message_pusher: Arc<dyn MessagePusher>,
}

impl CancelMatchUseCase {
    pub fn new(state: SharedState, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            state,
            message_pusher,
        }
    }

    /// Remove the caller from its queue and acknowledge with `matchCancelled`.
    ///
    /// Returns whether the caller was waiting. The ack is sent either way.
    pub async fn execute(&self, connection_id: ConnectionId) -> Result<bool, CoordinatorError> {
        let (user_id, was_waiting) = self.state.lock().await.cancel_match(&connection_id)?;

        tracing::info!(user_id = %user_id, was_waiting, "match search cancelled");
        push_or_log(
            self.message_pusher.as_ref(),
            &connection_id,
            &ServerEvent::MatchCancelled,
        )
        .await;
        Ok(was_waiting)
    }
}
