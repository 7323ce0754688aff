//! Domain error types.

use std::time::Duration;

use thiserror::Error;

use super::value_object::{ConnectionId, SessionId, UserId};

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("message content must not be empty")]
    EmptyMessageContent,

    #[error("message content exceeds {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },

    #[error("unrecognized gender tag '{0}'")]
    InvalidGender(String),
}

/// Violations of the per-connection state machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),

    #[error("connection is already authenticated")]
    AlreadyAuthenticated,

    #[error("connection is not authenticated")]
    NotAuthenticated,

    #[error("connection has not joined a session")]
    NotInSession,
}

/// Durable store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    #[error("user {user_id} already participates in session {session_id}")]
    DuplicateParticipant {
        session_id: SessionId,
        user_id: UserId,
    },

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Identity service errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("credential is invalid: {0}")]
    InvalidCredential(String),

    #[error("credential has expired")]
    Expired,

    #[error("credential claims are invalid: {0}")]
    InvalidClaims(String),

    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

/// Transport delivery errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode event: {0}")]
    Encoding(String),
}
