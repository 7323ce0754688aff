//! Conversion logic between DTOs and domain types.

use tandem_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    ClientEvent, MusicControlEvent, ServerEvent, SessionId, StateSnapshot, Stroke,
    StrokeEventType,
};
use crate::infrastructure::dto::{
    http::{RoomSummaryDto, StateSnapshotDto, WaitingDto},
    websocket as dto,
};

// ========================================
// DTO → Domain
// ========================================

impl From<dto::InboundMessage> for ClientEvent {
    fn from(message: dto::InboundMessage) -> Self {
        match message {
            dto::InboundMessage::Authenticate(credential) => {
                ClientEvent::Authenticate { credential }
            }
            dto::InboundMessage::CreateSession => ClientEvent::CreateSession,
            dto::InboundMessage::JoinSession(payload) => ClientEvent::JoinSession {
                session_id: SessionId::new(payload.session_id),
            },
            dto::InboundMessage::LeaveSession => ClientEvent::LeaveSession,
            dto::InboundMessage::ChatMessage(content) => ClientEvent::ChatMessage { content },
            dto::InboundMessage::Draw(stroke) => ClientEvent::Draw(stroke.into()),
            dto::InboundMessage::MusicControl(fields) => {
                ClientEvent::MusicControl(MusicControlEvent::new(fields))
            }
            dto::InboundMessage::FindMatch => ClientEvent::FindMatch,
            dto::InboundMessage::CancelMatch => ClientEvent::CancelMatch,
        }
    }
}

impl From<dto::StrokeDto> for Stroke {
    fn from(dto: dto::StrokeDto) -> Self {
        Self {
            x: dto.x,
            y: dto.y,
            color: dto.color,
            size: dto.size,
            event_type: match dto.event_type {
                dto::StrokeEventTypeDto::Start => StrokeEventType::Start,
                dto::StrokeEventTypeDto::Move => StrokeEventType::Move,
                dto::StrokeEventTypeDto::End => StrokeEventType::End,
            },
            extra: dto.extra,
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&Stroke> for dto::StrokeDto {
    fn from(stroke: &Stroke) -> Self {
        Self {
            x: stroke.x,
            y: stroke.y,
            color: stroke.color.clone(),
            size: stroke.size,
            event_type: match stroke.event_type {
                StrokeEventType::Start => dto::StrokeEventTypeDto::Start,
                StrokeEventType::Move => dto::StrokeEventTypeDto::Move,
                StrokeEventType::End => dto::StrokeEventTypeDto::End,
            },
            extra: stroke.extra.clone(),
        }
    }
}

impl From<&ServerEvent> for dto::OutboundMessage {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::Authenticated { user_id, gender } => {
                dto::OutboundMessage::Authenticated(dto::UserPayload {
                    user_id: user_id.value(),
                    gender: gender.as_str().to_string(),
                })
            }
            ServerEvent::SessionCreated { session_id } => {
                dto::OutboundMessage::SessionCreated(dto::SessionPayload {
                    session_id: session_id.value(),
                })
            }
            ServerEvent::UserJoined { user_id, gender } => {
                dto::OutboundMessage::UserJoined(dto::UserPayload {
                    user_id: user_id.value(),
                    gender: gender.as_str().to_string(),
                })
            }
            ServerEvent::UserLeft { user_id } => {
                dto::OutboundMessage::UserLeft(dto::UserLeftPayload {
                    user_id: user_id.value(),
                })
            }
            ServerEvent::ChatMessage {
                user_id,
                content,
                timestamp,
            } => dto::OutboundMessage::ChatMessage(dto::ChatMessagePayload {
                user_id: user_id.value(),
                content: content.as_str().to_string(),
                timestamp: timestamp_to_rfc3339(timestamp.value()),
            }),
            ServerEvent::Draw(stroke) => dto::OutboundMessage::Draw(stroke.into()),
            ServerEvent::MusicControl { user_id, event } => {
                // The server's userId replaces any userId the client put in the
                // payload. A plain `{userId, ...event}` spread would let the
                // client's field win, so it is dropped before flattening.
                let mut fields = event.fields().clone();
                fields.remove("userId");
                dto::OutboundMessage::MusicControl(dto::MusicControlPayload {
                    user_id: user_id.value(),
                    event: fields,
                })
            }
            ServerEvent::WaitingForMatch => dto::OutboundMessage::WaitingForMatch,
            ServerEvent::MatchFound { session_id } => {
                dto::OutboundMessage::MatchFound(dto::SessionPayload {
                    session_id: session_id.value(),
                })
            }
            ServerEvent::MatchCancelled => dto::OutboundMessage::MatchCancelled,
            ServerEvent::Error { kind, message } => dto::OutboundMessage::Error(dto::ErrorPayload {
                kind: kind.as_str().to_string(),
                message: message.clone(),
            }),
        }
    }
}

impl From<StateSnapshot> for StateSnapshotDto {
    fn from(snapshot: StateSnapshot) -> Self {
        Self {
            connections: snapshot.connections,
            authenticated: snapshot.authenticated,
            waiting: WaitingDto {
                a: snapshot.waiting_a.iter().map(|id| id.value()).collect(),
                b: snapshot.waiting_b.iter().map(|id| id.value()).collect(),
            },
            rooms: snapshot
                .rooms
                .into_iter()
                .map(|(session_id, members)| RoomSummaryDto {
                    session_id: session_id.value(),
                    members,
                })
                .collect(),
        }
    }
}
