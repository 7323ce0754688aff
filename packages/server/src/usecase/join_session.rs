//! UseCase: join a session room.
//!
//! The durable participant row is written first; a user who already
//! participates (for example after `matchFound` or `createSession`) still
//! enters the room. Switching rooms leaves the previous one in the same
//! critical section as the join.

use std::{sync::Arc, time::Duration};

use tandem_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessagePusher, RoomArrival, ServerEvent, SessionId, SessionStore, SharedState,
    StoreError, Timestamp,
};

use super::{delivery::broadcast_or_log, error::CoordinatorError, persistence::store_call};

pub struct JoinSessionUseCase {
    state: SharedState,
    store: Arc<dyn SessionStore>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl JoinSessionUseCase {
    pub fn new(
        state: SharedState,
        store: Arc<dyn SessionStore>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        timeout: Duration,
    ) -> Self {
        Self {
            state,
            store,
            message_pusher,
            clock,
            timeout,
        }
    }

    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        session_id: SessionId,
    ) -> Result<RoomArrival, CoordinatorError> {
        let identity = self.state.lock().await.require_identity(&connection_id)?;
        let now = Timestamp::new(self.clock.now_millis());

        match store_call(
            self.timeout,
            self.store.add_participant(session_id, identity.user_id, now),
        )
        .await
        {
            Ok(_) => {}
            Err(StoreError::DuplicateParticipant { .. }) => {
                tracing::debug!(
                    session_id = %session_id,
                    user_id = %identity.user_id,
                    "user already participates in session"
                );
            }
            Err(e) => return Err(e.into()),
        }

        let arrival = self
            .state
            .lock()
            .await
            .enter_room(&connection_id, session_id)?;

        if arrival.dequeued {
            tracing::info!(
                user_id = %identity.user_id,
                "user left the match queue to join a session"
            );
        }

        if let Some(departed) = &arrival.departed {
            tracing::info!(
                session_id = %departed.session_id,
                user_id = %departed.user_id,
                "user left session to switch rooms"
            );
            broadcast_or_log(
                self.message_pusher.as_ref(),
                &departed.remaining,
                &ServerEvent::UserLeft {
                    user_id: departed.user_id,
                },
            )
            .await;
        }

        if !arrival.already_member {
            tracing::info!(
                session_id = %session_id,
                user_id = %identity.user_id,
                members = arrival.others.len() + 1,
                "user joined session"
            );
            broadcast_or_log(
                self.message_pusher.as_ref(),
                &arrival.others,
                &ServerEvent::UserJoined {
                    user_id: arrival.identity.user_id,
                    gender: arrival.identity.gender,
                },
            )
            .await;
        }

        Ok(arrival)
    }
}
