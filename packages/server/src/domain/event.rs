//! Inbound and outbound coordinator events.
//!
//! Both directions are closed enums so every handler match is exhaustive.
//! The wire representation lives in `infrastructure::dto::websocket`.

use super::{
    entity::{MusicControlEvent, Stroke},
    value_object::{GenderTag, MessageContent, SessionId, Timestamp, UserId},
};

/// Event delivered by the transport for a single connection
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Authenticate { credential: String },
    CreateSession,
    JoinSession { session_id: SessionId },
    LeaveSession,
    ChatMessage { content: String },
    Draw(Stroke),
    MusicControl(MusicControlEvent),
    FindMatch,
    CancelMatch,
    /// Raised by the transport when the connection ends; never read off the wire
    Disconnect,
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Authenticate { .. } => "authenticate",
            ClientEvent::CreateSession => "createSession",
            ClientEvent::JoinSession { .. } => "joinSession",
            ClientEvent::LeaveSession => "leaveSession",
            ClientEvent::ChatMessage { .. } => "chatMessage",
            ClientEvent::Draw(_) => "draw",
            ClientEvent::MusicControl(_) => "musicControl",
            ClientEvent::FindMatch => "findMatch",
            ClientEvent::CancelMatch => "cancelMatch",
            ClientEvent::Disconnect => "disconnect",
        }
    }
}

/// Event pushed to one or more connections
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    Authenticated {
        user_id: UserId,
        gender: GenderTag,
    },
    SessionCreated {
        session_id: SessionId,
    },
    UserJoined {
        user_id: UserId,
        gender: GenderTag,
    },
    UserLeft {
        user_id: UserId,
    },
    ChatMessage {
        user_id: UserId,
        content: MessageContent,
        timestamp: Timestamp,
    },
    Draw(Stroke),
    MusicControl {
        user_id: UserId,
        event: MusicControlEvent,
    },
    WaitingForMatch,
    MatchFound {
        session_id: SessionId,
    },
    MatchCancelled,
    Error {
        kind: ErrorKind,
        message: String,
    },
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Authenticated { .. } => "authenticated",
            ServerEvent::SessionCreated { .. } => "sessionCreated",
            ServerEvent::UserJoined { .. } => "userJoined",
            ServerEvent::UserLeft { .. } => "userLeft",
            ServerEvent::ChatMessage { .. } => "chatMessage",
            ServerEvent::Draw(_) => "draw",
            ServerEvent::MusicControl { .. } => "musicControl",
            ServerEvent::WaitingForMatch => "waitingForMatch",
            ServerEvent::MatchFound { .. } => "matchFound",
            ServerEvent::MatchCancelled => "matchCancelled",
            ServerEvent::Error { .. } => "error",
        }
    }
}

/// Category of an error reported back to the initiating connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    AlreadyAuthenticated,
    NotAuthenticated,
    NotInSession,
    Validation,
    SessionNotFound,
    Persistence,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Authentication => "authentication",
            ErrorKind::AlreadyAuthenticated => "alreadyAuthenticated",
            ErrorKind::NotAuthenticated => "notAuthenticated",
            ErrorKind::NotInSession => "notInSession",
            ErrorKind::Validation => "validation",
            ErrorKind::SessionNotFound => "sessionNotFound",
            ErrorKind::Persistence => "persistence",
        }
    }
}
