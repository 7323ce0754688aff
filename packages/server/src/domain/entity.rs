//! Domain entities.

use serde_json::{Map, Value};

use super::value_object::{ConnectionId, GenderTag, MessageContent, SessionId, Timestamp, UserId};

/// Identity returned by the identity service for a verified credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub gender: GenderTag,
}

impl Identity {
    pub fn new(user_id: UserId, gender: GenderTag) -> Self {
        Self { user_id, gender }
    }
}

/// A live transport connection.
///
/// `identity` is set at most once; `session_id` tracks the room the
/// connection currently belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub identity: Option<Identity>,
    pub session_id: Option<SessionId>,
}

impl Connection {
    pub fn new(id: ConnectionId) -> Self {
        Self {
            id,
            identity: None,
            session_id: None,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.identity.map(|identity| identity.user_id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Durable session record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub creator_id: UserId,
    pub created_at: Timestamp,
}

/// Durable (session, user) membership record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub joined_at: Timestamp,
}

/// Append-only chat log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub session_id: SessionId,
    pub sender_id: UserId,
    pub content: MessageContent,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(
        session_id: SessionId,
        sender_id: UserId,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            session_id,
            sender_id,
            content,
            timestamp,
        }
    }
}

/// Phase of a freehand stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeEventType {
    Start,
    Move,
    End,
}

/// A single freehand drawing sample, relayed without geometry validation
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub size: f64,
    pub event_type: StrokeEventType,
    /// Any other client fields, relayed untouched
    pub extra: Map<String, Value>,
}

/// Opaque playback-control payload (play, pause, seek, ...)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MusicControlEvent(pub Map<String, Value>);

impl MusicControlEvent {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}
