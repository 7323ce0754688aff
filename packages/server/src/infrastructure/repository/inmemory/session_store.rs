//! In-memory implementation of the `SessionStore` trait.
//!
//! Mirrors the constraints of the relational schema it stands in for:
//! auto-incrementing session ids, one participant row per (session, user),
//! and an append-only message log.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, Participant, Session, SessionId, SessionStore, StoreError, Timestamp, UserId,
};

#[derive(Default)]
struct Tables {
    last_session_id: u64,
    sessions: BTreeMap<SessionId, Session>,
    participants: HashMap<(SessionId, UserId), Participant>,
    messages: Vec<ChatMessage>,
}

impl Tables {
    fn ensure_session(&self, session_id: SessionId) -> Result<(), StoreError> {
        if self.sessions.contains_key(&session_id) {
            Ok(())
        } else {
            Err(StoreError::SessionNotFound(session_id))
        }
    }

    fn ensure_new_participant(
        &self,
        session_id: SessionId,
        user_id: UserId,
    ) -> Result<(), StoreError> {
        if self.participants.contains_key(&(session_id, user_id)) {
            Err(StoreError::DuplicateParticipant {
                session_id,
                user_id,
            })
        } else {
            Ok(())
        }
    }
}

/// In-memory session store
#[derive(Default)]
pub struct InMemorySessionStore {
    tables: Mutex<Tables>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_session(&self, session_id: SessionId) -> Option<Session> {
        self.tables.lock().await.sessions.get(&session_id).cloned()
    }

    /// Participants of a session, ordered by user id
    pub async fn get_participants(&self, session_id: SessionId) -> Vec<Participant> {
        let tables = self.tables.lock().await;
        let mut participants: Vec<Participant> = tables
            .participants
            .values()
            .filter(|participant| participant.session_id == session_id)
            .cloned()
            .collect();
        participants.sort_by_key(|participant| participant.user_id);
        participants
    }

    /// Message log of a session in insertion order
    pub async fn get_messages(&self, session_id: SessionId) -> Vec<ChatMessage> {
        let tables = self.tables.lock().await;
        tables
            .messages
            .iter()
            .filter(|message| message.session_id == session_id)
            .cloned()
            .collect()
    }

    pub async fn count_sessions(&self) -> usize {
        self.tables.lock().await.sessions.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(
        &self,
        creator_id: UserId,
        created_at: Timestamp,
    ) -> Result<Session, StoreError> {
        let mut tables = self.tables.lock().await;
        tables.last_session_id += 1;
        let session = Session {
            id: SessionId::new(tables.last_session_id),
            creator_id,
            created_at,
        };
        tables.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn add_participant(
        &self,
        session_id: SessionId,
        user_id: UserId,
        joined_at: Timestamp,
    ) -> Result<Participant, StoreError> {
        let mut tables = self.tables.lock().await;
        tables.ensure_session(session_id)?;
        tables.ensure_new_participant(session_id, user_id)?;

        let participant = Participant {
            session_id,
            user_id,
            joined_at,
        };
        tables
            .participants
            .insert((session_id, user_id), participant.clone());
        Ok(participant)
    }

    async fn add_participants(
        &self,
        session_id: SessionId,
        user_ids: Vec<UserId>,
        joined_at: Timestamp,
    ) -> Result<Vec<Participant>, StoreError> {
        let mut tables = self.tables.lock().await;
        tables.ensure_session(session_id)?;
        for (index, user_id) in user_ids.iter().enumerate() {
            tables.ensure_new_participant(session_id, *user_id)?;
            if user_ids[..index].contains(user_id) {
                return Err(StoreError::DuplicateParticipant {
                    session_id,
                    user_id: *user_id,
                });
            }
        }

        let participants: Vec<Participant> = user_ids
            .into_iter()
            .map(|user_id| Participant {
                session_id,
                user_id,
                joined_at,
            })
            .collect();
        for participant in &participants {
            tables
                .participants
                .insert((session_id, participant.user_id), participant.clone());
        }
        Ok(participants)
    }

    async fn add_message(&self, message: ChatMessage) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        tables.ensure_session(message.session_id)?;
        tables.messages.push(message);
        Ok(())
    }
}
