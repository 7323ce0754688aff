//! UseCase: matchmaking.
//!
//! Pairing happens under the state lock; the session for a pair is
//! persisted after the lock is released. If persistence fails the pairing is
//! undone: the partner goes back to the front of its queue and nobody is told
//! about a match.
//!
//! Once a partner has been popped, persisting the pair and notifying both
//! users runs on its own task. Dropping the caller's future (for example when
//! its connection closes) does not cancel that task.

use std::{sync::Arc, time::Duration};

use tandem_shared::time::Clock;

use crate::domain::{
    ConnectionId, Identity, MatchAttempt, MessagePusher, ServerEvent, SessionId, SessionStore,
    SharedState, StoreError, Timestamp, UserId,
};

use super::{
    delivery::{push_or_log, push_to_user_or_log},
    error::CoordinatorError,
    persistence::store_call,
};

/// What `findMatch` did for the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindMatchOutcome {
    Matched {
        session_id: SessionId,
        partner: UserId,
    },
    Waiting,
    AlreadyWaiting,
    InSession,
}

#[derive(Clone)]
pub struct FindMatchUseCase {
    state: SharedState,
    store: Arc<dyn SessionStore>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl FindMatchUseCase {
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
    ) -> Result<FindMatchOutcome, CoordinatorError> {
        let attempt = self.state.lock().await.pair_or_enqueue(&connection_id)?;

        match attempt {
            MatchAttempt::Paired { caller, partner } => {
                let usecase = self.clone();
                let settle =
                    tokio::spawn(async move { usecase.settle_pair(caller, partner).await });
                let session_id = settle.await.map_err(|e| {
                    CoordinatorError::Persistence(StoreError::Unavailable(format!(
                        "match task failed: {e}"
                    )))
                })??;
                Ok(FindMatchOutcome::Matched {
                    session_id,
                    partner,
                })
            }
            MatchAttempt::Waiting => {
                tracing::info!(connection_id = %connection_id, "user waiting for match");
                push_or_log(
                    self.message_pusher.as_ref(),
                    &connection_id,
                    &ServerEvent::WaitingForMatch,
                )
                .await;
                Ok(FindMatchOutcome::Waiting)
            }
            MatchAttempt::AlreadyWaiting => {
                tracing::debug!(connection_id = %connection_id, "user already waiting");
                Ok(FindMatchOutcome::AlreadyWaiting)
            }
            MatchAttempt::InSession => {
                tracing::debug!(
                    connection_id = %connection_id,
                    "findMatch ignored inside a session"
                );
                Ok(FindMatchOutcome::InSession)
            }
        }
    }

    /// Persist the pair and tell both users
    async fn settle_pair(
        &self,
        caller: Identity,
        partner: UserId,
    ) -> Result<SessionId, CoordinatorError> {
        let session_id = self.create_match_session(caller, partner).await?;
        let event = ServerEvent::MatchFound { session_id };
        push_to_user_or_log(self.message_pusher.as_ref(), caller.user_id, &event).await;
        push_to_user_or_log(self.message_pusher.as_ref(), partner, &event).await;
        Ok(session_id)
    }

    async fn create_match_session(
        &self,
        caller: Identity,
        partner: UserId,
    ) -> Result<SessionId, CoordinatorError> {
        let now = Timestamp::new(self.clock.now_millis());
        match self.persist_match(caller.user_id, partner, now).await {
            Ok(session_id) => {
                tracing::info!(
                    session_id = %session_id,
                    caller = %caller.user_id,
                    partner = %partner,
                    "match created"
                );
                Ok(session_id)
            }
            Err(e) => {
                let restored = self
                    .state
                    .lock()
                    .await
                    .restore_partner(partner, caller.gender.opposite());
                tracing::warn!(
                    caller = %caller.user_id,
                    partner = %partner,
                    restored,
                    "failed to persist match: {}",
                    e
                );
                Err(CoordinatorError::Persistence(e))
            }
        }
    }

    async fn persist_match(
        &self,
        caller: UserId,
        partner: UserId,
        now: Timestamp,
    ) -> Result<SessionId, StoreError> {
        let session = store_call(self.timeout, self.store.create_session(caller, now)).await?;
        store_call(
            self.timeout,
            self.store
                .add_participants(session.id, vec![caller, partner], now),
        )
        .await?;
        Ok(session.id)
    }
}
