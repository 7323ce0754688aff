//! UseCase: create a session explicitly.
//!
//! The creator becomes a durable participant but does not enter the room;
//! that happens on a subsequent `joinSession`.

use std::{sync::Arc, time::Duration};

use tandem_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessagePusher, ServerEvent, Session, SessionStore, SharedState, Timestamp,
};

use super::{delivery::push_or_log, error::CoordinatorError, persistence::store_call};

pub struct CreateSessionUseCase {
    state: SharedState,
    store: Arc<dyn SessionStore>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl CreateSessionUseCase {
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

    pub async fn execute(&self, connection_id: ConnectionId) -> Result<Session, CoordinatorError> {
        let identity = self.state.lock().await.require_identity(&connection_id)?;
        let now = Timestamp::new(self.clock.now_millis());

        let session = store_call(
            self.timeout,
            self.store.create_session(identity.user_id, now),
        )
        .await?;
        store_call(
            self.timeout,
            self.store.add_participant(session.id, identity.user_id, now),
        )
        .await?;

        tracing::info!(
            session_id = %session.id,
            creator_id = %identity.user_id,
            "session created"
        );
        push_or_log(
            self.message_pusher.as_ref(),
            &connection_id,
            &ServerEvent::SessionCreated {
                session_id: session.id,
            },
        )
        .await;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use tandem_shared::time::FixedClock;

    use super::*;
    use crate::{
        domain::{GenderTag, Participant, StoreError, UserId, repository::MockSessionStore},
        infrastructure::repository::InMemorySessionStore,
        usecase::test_support::{
            RecordingPusher, TEST_NOW, TEST_TIMEOUT, connect, connect_as, new_state,
        },
    };

    #[tokio::test]
    async fn test_create_session_persists_creator_as_participant() {
        // テスト項目: 作成者は参加者として保存される
        // given (前提条件):
        let state = new_state();
        let pusher = RecordingPusher::new();
        let store = Arc::new(InMemorySessionStore::new());
        let usecase = CreateSessionUseCase::new(
            state.clone(),
            store.clone(),
            pusher.clone(),
            Arc::new(FixedClock::new(TEST_NOW)),
            TEST_TIMEOUT,
        );
        let connection_id = connect_as(&state, &pusher, 5, GenderTag::A).await;

        // when (操作):
        let session = usecase.execute(connection_id).await.unwrap();

        // then (期待する結果):
        assert_eq!(session.creator_id, UserId::new(5));
        assert_eq!(
            store.get_participants(session.id).await,
            vec![Participant {
                session_id: session.id,
                user_id: UserId::new(5),
                joined_at: Timestamp::new(TEST_NOW),
            }]
        );
        assert_eq!(
            pusher.events_for(&connection_id),
            vec![ServerEvent::SessionCreated {
                session_id: session.id
            }]
        );
        // creating does not enter the room
        assert!(state.lock().await.rooms().members(session.id).is_empty());
    }

    #[tokio::test]
    async fn test_create_session_requires_authentication() {
        // テスト項目: セッション作成には認証が必要
        // given (前提条件): 呼ばれてはいけないストア
        let state = new_state();
        let pusher = RecordingPusher::new();
        let usecase = CreateSessionUseCase::new(
            state.clone(),
            Arc::new(MockSessionStore::new()),
            pusher.clone(),
            Arc::new(FixedClock::new(TEST_NOW)),
            TEST_TIMEOUT,
        );
        let connection_id = connect(&state, &pusher).await;

        // when (操作):
        let result = usecase.execute(connection_id).await;

        // then (期待する結果):
        assert_eq!(result, Err(CoordinatorError::NotAuthenticated));
        assert_eq!(pusher.delivered_count(), 0);
    }

    #[tokio::test]
    async fn test_create_session_store_failure_is_reported() {
        // テスト項目: ストアの失敗はエラーとして返る
        // given (前提条件):
        let state = new_state();
        let pusher = RecordingPusher::new();
        let mut store = MockSessionStore::new();
        store
            .expect_create_session()
            .returning(|_, _| Err(StoreError::Unavailable("down".to_string())));
        let usecase = CreateSessionUseCase::new(
            state.clone(),
            Arc::new(store),
            pusher.clone(),
            Arc::new(FixedClock::new(TEST_NOW)),
            TEST_TIMEOUT,
        );
        let connection_id = connect_as(&state, &pusher, 5, GenderTag::A).await;

        // when (操作):
        let result = usecase.execute(connection_id).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(CoordinatorError::Persistence(StoreError::Unavailable(
                "down".to_string()
            )))
        );
        assert_eq!(pusher.delivered_count(), 0);
    }
}
