//! Coordinator error taxonomy.

use thiserror::Error;

use crate::domain::{
    ConnectionId, ErrorKind, IdentityError, SessionId, StateError, StoreError, ValueObjectError,
};

/// Errors raised by coordinator operations.
///
/// Every variant except `UnknownConnection` is reported back to the
/// initiating connection as an `error` event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    #[error("authentication failed: {0}")]
    Authentication(IdentityError),

    #[error("connection is already authenticated")]
    AlreadyAuthenticated,

    #[error("connection is not authenticated")]
    NotAuthenticated,

    #[error("connection has not joined a session")]
    NotInSession,

    #[error("invalid payload: {0}")]
    Validation(String),

    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    #[error("persistence failed: {0}")]
    Persistence(StoreError),

    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),
}

impl CoordinatorError {
    /// Wire category, `None` when there is nobody to report to
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            CoordinatorError::Authentication(_) => Some(ErrorKind::Authentication),
            CoordinatorError::AlreadyAuthenticated => Some(ErrorKind::AlreadyAuthenticated),
            CoordinatorError::NotAuthenticated => Some(ErrorKind::NotAuthenticated),
            CoordinatorError::NotInSession => Some(ErrorKind::NotInSession),
            CoordinatorError::Validation(_) => Some(ErrorKind::Validation),
            CoordinatorError::SessionNotFound(_) => Some(ErrorKind::SessionNotFound),
            CoordinatorError::Persistence(_) => Some(ErrorKind::Persistence),
            CoordinatorError::UnknownConnection(_) => None,
        }
    }

    /// Out-of-order actions, silently ignored unless strict ordering is on
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            CoordinatorError::NotAuthenticated | CoordinatorError::NotInSession
        )
    }
}

impl From<StateError> for CoordinatorError {
    fn from(error: StateError) -> Self {
        match error {
            StateError::UnknownConnection(id) => CoordinatorError::UnknownConnection(id),
            StateError::AlreadyAuthenticated => CoordinatorError::AlreadyAuthenticated,
            StateError::NotAuthenticated => CoordinatorError::NotAuthenticated,
            StateError::NotInSession => CoordinatorError::NotInSession,
        }
    }
}

impl From<ValueObjectError> for CoordinatorError {
    fn from(error: ValueObjectError) -> Self {
        CoordinatorError::Validation(error.to_string())
    }
}

impl From<IdentityError> for CoordinatorError {
    fn from(error: IdentityError) -> Self {
        CoordinatorError::Authentication(error)
    }
}

impl From<StoreError> for CoordinatorError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::SessionNotFound(session_id) => {
                CoordinatorError::SessionNotFound(session_id)
            }
            other => CoordinatorError::Persistence(other),
        }
    }
}
