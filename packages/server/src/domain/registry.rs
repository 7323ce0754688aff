//! Connection registry: live connection → identity and current room.

use std::collections::HashMap;

use super::{Connection, ConnectionId, Identity, SessionId, StateError, UserId};

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty entry; an existing entry is left untouched
    pub fn register(&mut self, connection_id: ConnectionId) {
        self.connections
            .entry(connection_id)
            .or_insert_with(|| Connection::new(connection_id));
    }

    pub fn get(&self, connection_id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(connection_id)
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains_key(connection_id)
    }

    pub fn identity(&self, connection_id: &ConnectionId) -> Option<Identity> {
        self.connections
            .get(connection_id)
            .and_then(|connection| connection.identity)
    }

    /// Store the verified identity of a connection. Identity is write-once.
    pub fn set_identity(
        &mut self,
        connection_id: &ConnectionId,
        identity: Identity,
    ) -> Result<(), StateError> {
        let connection = self
            .connections
            .get_mut(connection_id)
            .ok_or(StateError::UnknownConnection(*connection_id))?;
        if connection.identity.is_some() {
            return Err(StateError::AlreadyAuthenticated);
        }
        connection.identity = Some(identity);
        Ok(())
    }

    /// Record the room a connection belongs to (`None` clears it)
    pub fn set_session(
        &mut self,
        connection_id: &ConnectionId,
        session_id: Option<SessionId>,
    ) -> Result<(), StateError> {
        let connection = self
            .connections
            .get_mut(connection_id)
            .ok_or(StateError::UnknownConnection(*connection_id))?;
        if !connection.is_authenticated() {
            return Err(StateError::NotAuthenticated);
        }
        connection.session_id = session_id;
        Ok(())
    }

    /// Delete the entry and return its last-known state. Idempotent.
    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<Connection> {
        self.connections.remove(connection_id)
    }

    /// Whether any live connection is authenticated as `user_id`
    pub fn is_user_connected(&self, user_id: UserId) -> bool {
        self.connections
            .values()
            .any(|connection| connection.user_id() == Some(user_id))
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn authenticated_count(&self) -> usize {
        self.connections
            .values()
            .filter(|connection| connection.is_authenticated())
            .count()
    }
}
