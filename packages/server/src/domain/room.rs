//! Session rooms: in-memory membership used for broadcast targeting.

use std::collections::{HashMap, HashSet};

use super::{ConnectionId, SessionId};

#[derive(Debug, Default)]
pub struct SessionRooms {
    rooms: HashMap<SessionId, HashSet<ConnectionId>>,
}

impl SessionRooms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member. Returns `false` if it was already present.
    pub fn join(&mut self, session_id: SessionId, connection_id: ConnectionId) -> bool {
        self.rooms
            .entry(session_id)
            .or_default()
            .insert(connection_id)
    }

    /// Remove a member; empty rooms are dropped. Returns whether it was present.
    pub fn leave(&mut self, session_id: SessionId, connection_id: &ConnectionId) -> bool {
        let Some(members) = self.rooms.get_mut(&session_id) else {
            return false;
        };
        let removed = members.remove(connection_id);
        if members.is_empty() {
            self.rooms.remove(&session_id);
        }
        removed
    }

    pub fn members(&self, session_id: SessionId) -> Vec<ConnectionId> {
        self.rooms
            .get(&session_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn members_except(
        &self,
        session_id: SessionId,
        exclude: &ConnectionId,
    ) -> Vec<ConnectionId> {
        self.rooms
            .get(&session_id)
            .map(|members| members.iter().filter(|id| *id != exclude).copied().collect())
            .unwrap_or_default()
    }

    pub fn member_count(&self, session_id: SessionId) -> usize {
        self.rooms.get(&session_id).map_or(0, HashSet::len)
    }

    /// (session, member count) for every non-empty room, ordered by session id
    pub fn summary(&self) -> Vec<(SessionId, usize)> {
        let mut summary: Vec<(SessionId, usize)> = self
            .rooms
            .iter()
            .map(|(session_id, members)| (*session_id, members.len()))
            .collect();
        summary.sort_by_key(|(session_id, _)| *session_id);
        summary
    }
}
