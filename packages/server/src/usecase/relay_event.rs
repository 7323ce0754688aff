//! UseCase: relay room events (chat, draw, playback control).
//!
//! Delivery policy per event kind:
//! - chat: persisted first, then sent to every member including the sender
//! - draw: not persisted, sent to every member except the sender
//! - musicControl: not persisted, sent to every member including the sender

use std::{sync::Arc, time::Duration};

use tandem_shared::time::Clock;

use crate::domain::{
    ChatMessage, ConnectionId, MessageContent, MessagePusher, MusicControlEvent, ServerEvent,
    SessionStore, SharedState, Stroke, Timestamp,
};

use super::{delivery::broadcast_or_log, error::CoordinatorError, persistence::store_call};

pub struct RelayEventUseCase {
    state: SharedState,
    store: Arc<dyn SessionStore>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl RelayEventUseCase {
    pub fn new(
        state: SharedState,
        store: Arc<dyn SessionStore>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        timeout: Duration,
    ) -> Self {
        Self {
            state,
            store,
            message_pusher,
            clock,
            timeout,
        }
    }

    /// Persist a chat message and broadcast it to the whole room.
    ///
    /// Returns the connections the message was sent to. Nothing is sent if
    /// persistence fails.
    pub async fn chat(
        &self,
        connection_id: ConnectionId,
        content: String,
    ) -> Result<Vec<ConnectionId>, CoordinatorError> {
        let access = self.state.lock().await.room_access(&connection_id, true)?;
        let content = MessageContent::new(content)?;
        let timestamp = Timestamp::new(self.clock.now_millis());

        let message = ChatMessage::new(
            access.session_id,
            access.user_id,
            content.clone(),
            timestamp,
        );
        store_call(self.timeout, self.store.add_message(message)).await?;

        // membership may have changed while the message was being stored
        let targets = self.state.lock().await.session_members(access.session_id);
        broadcast_or_log(
            self.message_pusher.as_ref(),
            &targets,
            &ServerEvent::ChatMessage {
                user_id: access.user_id,
                content,
                timestamp,
            },
        )
        .await;
        Ok(targets)
    }

    /// Relay a stroke to every other member of the room
    pub async fn draw(
        &self,
        connection_id: ConnectionId,
        stroke: Stroke,
    ) -> Result<Vec<ConnectionId>, CoordinatorError> {
        let access = self.state.lock().await.room_access(&connection_id, false)?;
        broadcast_or_log(
            self.message_pusher.as_ref(),
            &access.targets,
            &ServerEvent::Draw(stroke),
        )
        .await;
        Ok(access.targets)
    }

    /// Relay a playback control event to the whole room, tagged with the sender
    pub async fn music_control(
        &self,
        connection_id: ConnectionId,
        event: MusicControlEvent,
    ) -> Result<Vec<ConnectionId>, CoordinatorError> {
        let access = self.state.lock().await.room_access(&connection_id, true)?;
        broadcast_or_log(
            self.message_pusher.as_ref(),
            &access.targets,
            &ServerEvent::MusicControl {
                user_id: access.user_id,
                event,
            },
        )
        .await;
        Ok(access.targets)
    }
}
