//! Coordinator state: registry, match queue and rooms behind one lock.
//!
//! Every compound transition (pair-or-enqueue, switch rooms, disconnect
//! cleanup) is a single `&mut self` method, so holding the lock for one call
//! makes the whole transition atomic. Callers must release the lock before any
//! store or identity I/O.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::{
    Connection, ConnectionId, ConnectionRegistry, GenderTag, Identity, MatchOutcome, MatchQueue,
    SessionId, SessionRooms, StateError, UserId,
};

/// Coordinator state shared between connection tasks
pub type SharedState = Arc<Mutex<CoordinatorState>>;

/// Outcome of a `findMatch` transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAttempt {
    /// Caller was paired with `partner`, who has been removed from its queue
    Paired { caller: Identity, partner: UserId },
    /// Caller now waits in its own queue
    Waiting,
    /// Caller was already waiting
    AlreadyWaiting,
    /// Caller is already in a room
    InSession,
}

/// Remaining members of a room someone just left
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDeparture {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub remaining: Vec<ConnectionId>,
}

/// Result of entering a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomArrival {
    pub session_id: SessionId,
    pub identity: Identity,
    /// Members present before the arrival (joiner excluded)
    pub others: Vec<ConnectionId>,
    /// Room left implicitly because the connection switched rooms
    pub departed: Option<RoomDeparture>,
    /// The user was waiting for a match and has been taken out of the queue
    pub dequeued: bool,
    /// The connection was already in this room; nobody needs notifying
    pub already_member: bool,
}

/// Who a relayed event comes from and who receives it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomAccess {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub targets: Vec<ConnectionId>,
}

/// Everything removed by a disconnect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disconnection {
    pub connection: Connection,
    pub dequeued: bool,
    pub departed: Option<RoomDeparture>,
}

/// Counters exposed on the debug endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub connections: usize,
    pub authenticated: usize,
    pub waiting_a: Vec<UserId>,
    pub waiting_b: Vec<UserId>,
    pub rooms: Vec<(SessionId, usize)>,
}

#[derive(Debug, Default)]
pub struct CoordinatorState {
    registry: ConnectionRegistry,
    queue: MatchQueue,
    rooms: SessionRooms,
}

impl CoordinatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedState {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn queue(&self) -> &MatchQueue {
        &self.queue
    }

    pub fn rooms(&self) -> &SessionRooms {
        &self.rooms
    }

    pub fn connect(&mut self, connection_id: ConnectionId) {
        self.registry.register(connection_id);
    }

    /// Identity of an authenticated connection
    pub fn require_identity(&self, connection_id: &ConnectionId) -> Result<Identity, StateError> {
        let connection = self
            .registry
            .get(connection_id)
            .ok_or(StateError::UnknownConnection(*connection_id))?;
        connection.identity.ok_or(StateError::NotAuthenticated)
    }

    /// Fails if the connection is unknown or already authenticated
    pub fn ensure_unauthenticated(&self, connection_id: &ConnectionId) -> Result<(), StateError> {
        match self.registry.get(connection_id) {
            None => Err(StateError::UnknownConnection(*connection_id)),
            Some(connection) if connection.is_authenticated() => {
                Err(StateError::AlreadyAuthenticated)
            }
            Some(_) => Ok(()),
        }
    }

    pub fn authenticate(
        &mut self,
        connection_id: &ConnectionId,
        identity: Identity,
    ) -> Result<(), StateError> {
        self.registry.set_identity(connection_id, identity)
    }

    /// Pair the caller with the head of the opposite queue, or enqueue it
    pub fn pair_or_enqueue(
        &mut self,
        connection_id: &ConnectionId,
    ) -> Result<MatchAttempt, StateError> {
        let identity = self.require_identity(connection_id)?;
        let in_session = self
            .registry
            .get(connection_id)
            .is_some_and(|connection| connection.session_id.is_some());
        if in_session {
            return Ok(MatchAttempt::InSession);
        }

        let attempt = match self.queue.find_or_enqueue(identity.user_id, identity.gender) {
            MatchOutcome::Matched(partner) => MatchAttempt::Paired {
                caller: identity,
                partner,
            },
            MatchOutcome::Enqueued => MatchAttempt::Waiting,
            MatchOutcome::AlreadyWaiting => MatchAttempt::AlreadyWaiting,
        };
        Ok(attempt)
    }

    /// Undo a pairing whose session could not be persisted.
    ///
    /// The partner goes back to the front of its queue unless it has
    /// disconnected in the meantime. Returns whether it was restored.
    pub fn restore_partner(&mut self, partner: UserId, gender: GenderTag) -> bool {
        if !self.registry.is_user_connected(partner) {
            return false;
        }
        self.queue.restore_front(partner, gender);
        true
    }

    /// Remove the caller from the match queue. Returns its user id and
    /// whether it was actually waiting.
    pub fn cancel_match(
        &mut self,
        connection_id: &ConnectionId,
    ) -> Result<(UserId, bool), StateError> {
        let identity = self.require_identity(connection_id)?;
        let removed = self.queue.remove(identity.user_id);
        Ok((identity.user_id, removed))
    }

    /// Move the connection into `session_id`, leaving its previous room first
    pub fn enter_room(
        &mut self,
        connection_id: &ConnectionId,
        session_id: SessionId,
    ) -> Result<RoomArrival, StateError> {
        let identity = self.require_identity(connection_id)?;
        let current = self
            .registry
            .get(connection_id)
            .and_then(|connection| connection.session_id);

        if current == Some(session_id) {
            return Ok(RoomArrival {
                session_id,
                identity,
                others: self.rooms.members_except(session_id, connection_id),
                departed: None,
                dequeued: false,
                already_member: true,
            });
        }

        let departed = match current {
            Some(_) => self.leave_room(connection_id)?,
            None => None,
        };
        // A member of a room never waits for a match
        let dequeued = self.queue.remove(identity.user_id);
        let others = self.rooms.members(session_id);
        self.rooms.join(session_id, *connection_id);
        self.registry.set_session(connection_id, Some(session_id))?;

        Ok(RoomArrival {
            session_id,
            identity,
            others,
            departed,
            dequeued,
            already_member: false,
        })
    }

    /// Leave the current room, if any
    pub fn leave_room(
        &mut self,
        connection_id: &ConnectionId,
    ) -> Result<Option<RoomDeparture>, StateError> {
        let identity = self.require_identity(connection_id)?;
        let Some(session_id) = self
            .registry
            .get(connection_id)
            .and_then(|connection| connection.session_id)
        else {
            return Ok(None);
        };

        self.registry.set_session(connection_id, None)?;
        self.rooms.leave(session_id, connection_id);
        Ok(Some(RoomDeparture {
            session_id,
            user_id: identity.user_id,
            remaining: self.rooms.members(session_id),
        }))
    }

    /// Sender identity, room and broadcast targets for a relayed event
    pub fn room_access(
        &self,
        connection_id: &ConnectionId,
        include_sender: bool,
    ) -> Result<RoomAccess, StateError> {
        let identity = self.require_identity(connection_id)?;
        let session_id = self
            .registry
            .get(connection_id)
            .and_then(|connection| connection.session_id)
            .ok_or(StateError::NotInSession)?;
        let targets = if include_sender {
            self.rooms.members(session_id)
        } else {
            self.rooms.members_except(session_id, connection_id)
        };
        Ok(RoomAccess {
            user_id: identity.user_id,
            session_id,
            targets,
        })
    }

    pub fn session_members(&self, session_id: SessionId) -> Vec<ConnectionId> {
        self.rooms.members(session_id)
    }

    /// Remove every trace of a connection. Unknown connections yield `None`.
    pub fn disconnect(&mut self, connection_id: &ConnectionId) -> Option<Disconnection> {
        let connection = self.registry.get(connection_id)?.clone();

        let dequeued = connection
            .user_id()
            .is_some_and(|user_id| self.queue.remove(user_id));
        let departed = match (connection.user_id(), connection.session_id) {
            (Some(user_id), Some(session_id)) => {
                self.rooms.leave(session_id, connection_id);
                Some(RoomDeparture {
                    session_id,
                    user_id,
                    remaining: self.rooms.members(session_id),
                })
            }
            _ => None,
        };
        let connection = self.registry.remove(connection_id)?;

        Some(Disconnection {
            connection,
            dequeued,
            departed,
        })
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            connections: self.registry.len(),
            authenticated: self.registry.authenticated_count(),
            waiting_a: self.queue.waiting(GenderTag::A),
            waiting_b: self.queue.waiting(GenderTag::B),
            rooms: self.rooms.summary(),
        }
    }
}
