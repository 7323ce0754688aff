//! Coordinator facade: the single entry point the transport drives.

use std::{sync::Arc, time::Duration};

use tandem_shared::time::Clock;

use crate::domain::{
    ClientEvent, ConnectionId, CoordinatorState, IdentityVerifier, MessagePusher, PusherChannel,
    ServerEvent, SessionStore, SharedState, StateSnapshot,
};

use super::{
    authenticate::AuthenticateUseCase, cancel_match::CancelMatchUseCase,
    connect_client::ConnectClientUseCase, create_session::CreateSessionUseCase,
    delivery::push_or_log, disconnect_client::DisconnectClientUseCase, error::CoordinatorError,
    find_match::FindMatchUseCase, join_session::JoinSessionUseCase,
    leave_session::LeaveSessionUseCase, relay_event::RelayEventUseCase,
};

/// Default bound on a single durable-store call
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    pub store_timeout: Duration,
    /// Report `notAuthenticated` / `notInSession` instead of ignoring the action
    pub strict_ordering: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            store_timeout: DEFAULT_STORE_TIMEOUT,
            strict_ordering: false,
        }
    }
}

pub struct Coordinator {
    state: SharedState,
    message_pusher: Arc<dyn MessagePusher>,
    config: CoordinatorConfig,
    connect_client: ConnectClientUseCase,
    authenticate: AuthenticateUseCase,
    create_session: CreateSessionUseCase,
    join_session: JoinSessionUseCase,
    leave_session: LeaveSessionUseCase,
    find_match: FindMatchUseCase,
    cancel_match: CancelMatchUseCase,
    relay_event: RelayEventUseCase,
    disconnect_client: DisconnectClientUseCase,
}

impl Coordinator {
    pub fn new(
        store: Arc<dyn SessionStore>,
        message_pusher: Arc<dyn MessagePusher>,
        identity_verifier: Arc<dyn IdentityVerifier>,
        clock: Arc<dyn Clock>,
        config: CoordinatorConfig,
    ) -> Self {
        let state = CoordinatorState::shared();
        let timeout = config.store_timeout;

        Self {
            connect_client: ConnectClientUseCase::new(state.clone(), message_pusher.clone()),
            authenticate: AuthenticateUseCase::new(
                state.clone(),
                identity_verifier,
                message_pusher.clone(),
                timeout,
            ),
            create_session: CreateSessionUseCase::new(
                state.clone(),
                store.clone(),
                message_pusher.clone(),
                clock.clone(),
                timeout,
            ),
            join_session: JoinSessionUseCase::new(
                state.clone(),
                store.clone(),
                message_pusher.clone(),
                clock.clone(),
                timeout,
            ),
            leave_session: LeaveSessionUseCase::new(state.clone(), message_pusher.clone()),
            find_match: FindMatchUseCase::new(
                state.clone(),
                store.clone(),
                message_pusher.clone(),
                clock.clone(),
                timeout,
            ),
            cancel_match: CancelMatchUseCase::new(state.clone(), message_pusher.clone()),
            relay_event: RelayEventUseCase::new(
                state.clone(),
                store,
                message_pusher.clone(),
                clock,
                timeout,
            ),
            disconnect_client: DisconnectClientUseCase::new(state.clone(), message_pusher.clone()),
            state,
            message_pusher,
            config,
        }
    }

    pub fn config(&self) -> CoordinatorConfig {
        self.config
    }

    /// Register a new transport connection and its outbound channel
    pub async fn connect(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.connect_client.execute(connection_id, sender).await;
    }

    /// Run one inbound event, surfacing its error
    pub async fn handle(
        &self,
        connection_id: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), CoordinatorError> {
        match event {
            ClientEvent::Authenticate { credential } => {
                self.authenticate.execute(connection_id, &credential).await?;
            }
            ClientEvent::CreateSession => {
                self.create_session.execute(connection_id).await?;
            }
            ClientEvent::JoinSession { session_id } => {
                self.join_session.execute(connection_id, session_id).await?;
            }
            ClientEvent::LeaveSession => {
                self.leave_session.execute(connection_id).await?;
            }
            ClientEvent::ChatMessage { content } => {
                self.relay_event.chat(connection_id, content).await?;
            }
            ClientEvent::Draw(stroke) => {
                self.relay_event.draw(connection_id, stroke).await?;
            }
            ClientEvent::MusicControl(event) => {
                self.relay_event.music_control(connection_id, event).await?;
            }
            ClientEvent::FindMatch => {
                self.find_match.execute(connection_id).await?;
            }
            ClientEvent::CancelMatch => {
                self.cancel_match.execute(connection_id).await?;
            }
            ClientEvent::Disconnect => {
                self.disconnect_client.execute(connection_id).await;
            }
        }
        Ok(())
    }

    /// Run one inbound event, reporting any error to the initiating connection
    pub async fn dispatch(&self, connection_id: ConnectionId, event: ClientEvent) {
        let name = event.name();
        tracing::debug!(connection_id = %connection_id, event = name, "dispatching event");
        if let Err(error) = self.handle(connection_id, event).await {
            self.report(connection_id, name, error).await;
        }
    }

    /// Report an error (for example an unparseable frame) to one connection.
    ///
    /// Out-of-order actions are only reported when strict ordering is on.
    pub async fn report(&self, connection_id: ConnectionId, event: &str, error: CoordinatorError) {
        let Some(kind) = error.kind() else {
            tracing::debug!(connection_id = %connection_id, event, "{}", error);
            return;
        };
        if error.is_ordering() && !self.config.strict_ordering {
            tracing::debug!(
                connection_id = %connection_id,
                event,
                "ignoring out-of-order action: {}",
                error
            );
            return;
        }

        tracing::warn!(connection_id = %connection_id, event, "rejected: {}", error);
        push_or_log(
            self.message_pusher.as_ref(),
            &connection_id,
            &ServerEvent::Error {
                kind,
                message: error.to_string(),
            },
        )
        .await;
    }

    /// Tear down a connection; always completes
    pub async fn disconnect(&self, connection_id: ConnectionId) {
        self.disconnect_client.execute(connection_id).await;
    }

    pub async fn snapshot(&self) -> StateSnapshot {
        self.state.lock().await.snapshot()
    }
}
