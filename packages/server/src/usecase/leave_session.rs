//! UseCase: leave the current session room.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomDeparture, ServerEvent, SharedState};

use super::{delivery::broadcast_or_log, error::CoordinatorError};

pub struct LeaveSessionUseCase {
    state: SharedState,
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveSessionUseCase {
    pub fn new(state: SharedState, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            state,
            message_pusher,
        }
    }

    /// Leave the room and notify the remaining members.
    ///
    /// Fails with `NotInSession` when the connection is not in a room.
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
    ) -> Result<RoomDeparture, CoordinatorError> {
        let departure = self
            .state
            .lock()
            .await
            .leave_room(&connection_id)?
            .ok_or(CoordinatorError::NotInSession)?;

        tracing::info!(
            session_id = %departure.session_id,
            user_id = %departure.user_id,
            "user left session"
        );
        broadcast_or_log(
            self.message_pusher.as_ref(),
            &departure.remaining,
            &ServerEvent::UserLeft {
                user_id: departure.user_id,
            },
        )
        .await;
        Ok(departure)
    }
}
