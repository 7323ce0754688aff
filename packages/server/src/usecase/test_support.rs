//! Test doubles shared by the use case tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{
    ConnectionId, CoordinatorState, GenderTag, Identity, MessagePushError, MessagePusher,
    PusherChannel, ServerEvent, SessionId, SharedState, UserId,
};

pub const TEST_TIMEOUT: Duration = Duration::from_millis(200);
pub const TEST_NOW: i64 = 1_672_531_200_000;

#[derive(Default)]
struct Recorded {
    registered: HashSet<ConnectionId>,
    users: HashMap<UserId, HashSet<ConnectionId>>,
    delivered: Vec<(ConnectionId, ServerEvent)>,
}

/// `MessagePusher` that records every delivery instead of writing to a socket
#[derive(Default)]
pub struct RecordingPusher {
    recorded: Mutex<Recorded>,
}

impl RecordingPusher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Events delivered to one connection, in order
    pub fn events_for(&self, connection_id: &ConnectionId) -> Vec<ServerEvent> {
        self.recorded
            .lock()
            .unwrap()
            .delivered
            .iter()
            .filter(|(target, _)| target == connection_id)
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub fn delivered_count(&self) -> usize {
        self.recorded.lock().unwrap().delivered.len()
    }

    pub fn is_registered(&self, connection_id: &ConnectionId) -> bool {
        self.recorded
            .lock()
            .unwrap()
            .registered
            .contains(connection_id)
    }

    pub fn clear(&self) {
        self.recorded.lock().unwrap().delivered.clear();
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, connection_id: ConnectionId, _sender: PusherChannel) {
        self.recorded.lock().unwrap().registered.insert(connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.registered.remove(connection_id);
        for connections in recorded.users.values_mut() {
            connections.remove(connection_id);
        }
    }

    async fn bind_user(&self, connection_id: &ConnectionId, user_id: UserId) {
        self.recorded
            .lock()
            .unwrap()
            .users
            .entry(user_id)
            .or_default()
            .insert(*connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let mut recorded = self.recorded.lock().unwrap();
        if !recorded.registered.contains(connection_id) {
            return Err(MessagePushError::ClientNotFound(connection_id.to_string()));
        }
        recorded.delivered.push((*connection_id, event.clone()));
        Ok(())
    }

    async fn push_to_user(
        &self,
        user_id: UserId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let mut recorded = self.recorded.lock().unwrap();
        let targets: Vec<ConnectionId> = recorded
            .users
            .get(&user_id)
            .map(|connections| connections.iter().copied().collect())
            .unwrap_or_default();
        if targets.is_empty() {
            return Err(MessagePushError::ClientNotFound(user_id.to_string()));
        }
        for target in targets {
            recorded.delivered.push((target, event.clone()));
        }
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let mut recorded = self.recorded.lock().unwrap();
        for target in targets {
            if recorded.registered.contains(target) {
                recorded.delivered.push((*target, event.clone()));
            }
        }
        Ok(())
    }
}

pub fn new_state() -> SharedState {
    CoordinatorState::shared()
}

/// Register an unauthenticated connection with the state and the pusher
pub async fn connect(state: &SharedState, pusher: &RecordingPusher) -> ConnectionId {
    let connection_id = ConnectionId::generate();
    state.lock().await.connect(connection_id);
    let (sender, _receiver) = mpsc::unbounded_channel();
    pusher.register_client(connection_id, sender).await;
    connection_id
}

/// Register a connection already authenticated as `user`
pub async fn connect_as(
    state: &SharedState,
    pusher: &RecordingPusher,
    user: u64,
    gender: GenderTag,
) -> ConnectionId {
    let connection_id = connect(state, pusher).await;
    let user_id = UserId::new(user);
    state
        .lock()
        .await
        .authenticate(&connection_id, Identity::new(user_id, gender))
        .unwrap();
    pusher.bind_user(&connection_id, user_id).await;
    connection_id
}

/// Register an authenticated connection that has joined `session`
pub async fn connect_in_room(
    state: &SharedState,
    pusher: &RecordingPusher,
    user: u64,
    gender: GenderTag,
    session: u64,
) -> ConnectionId {
    let connection_id = connect_as(state, pusher, user, gender).await;
    state
        .lock()
        .await
        .enter_room(&connection_id, SessionId::new(session))
        .unwrap();
    connection_id
}
