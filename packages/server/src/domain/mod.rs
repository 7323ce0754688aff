//! Domain layer: value objects, entities, coordinator state and the
//! interfaces (store, identity, transport) the use cases depend on.

pub mod entity;
pub mod error;
pub mod event;
pub mod identity;
pub mod match_queue;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod room;
pub mod state;
pub mod value_object;

pub use entity::{
    ChatMessage, Connection, Identity, MusicControlEvent, Participant, Session, Stroke,
    StrokeEventType,
};
pub use error::{IdentityError, MessagePushError, StateError, StoreError, ValueObjectError};
pub use event::{ClientEvent, ErrorKind, ServerEvent};
pub use identity::IdentityVerifier;
pub use match_queue::{MatchOutcome, MatchQueue};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use registry::ConnectionRegistry;
pub use repository::SessionStore;
pub use room::SessionRooms;
pub use state::{
    CoordinatorState, Disconnection, MatchAttempt, RoomAccess, RoomArrival, RoomDeparture,
    SharedState, StateSnapshot,
};
pub use value_object::{ConnectionId, GenderTag, MessageContent, SessionId, Timestamp, UserId};
