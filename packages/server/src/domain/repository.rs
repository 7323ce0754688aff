//! Durable store interface.
//!
//! The coordinator only issues writes; schema and querying belong to the
//! store. Concrete implementations live in the infrastructure layer
//! (dependency inversion: the domain owns the interface it needs).

use async_trait::async_trait;

use super::{ChatMessage, Participant, Session, SessionId, StoreError, Timestamp, UserId};

/// Session / participant / chat-log store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a new session owned by `creator_id`; the store assigns the id
    async fn create_session(
        &self,
        creator_id: UserId,
        created_at: Timestamp,
    ) -> Result<Session, StoreError>;

    /// Insert a single participant row.
    ///
    /// Fails with [`StoreError::DuplicateParticipant`] when the row exists and
    /// with [`StoreError::SessionNotFound`] for an unknown session.
    async fn add_participant(
        &self,
        session_id: SessionId,
        user_id: UserId,
        joined_at: Timestamp,
    ) -> Result<Participant, StoreError>;

    /// Insert several participant rows at once; all or nothing
    async fn add_participants(
        &self,
        session_id: SessionId,
        user_ids: Vec<UserId>,
        joined_at: Timestamp,
    ) -> Result<Vec<Participant>, StoreError>;

    /// Append a chat message to the session log
    async fn add_message(&self, message: ChatMessage) -> Result<(), StoreError>;
}
