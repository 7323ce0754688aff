//! Infrastructure layer: wire formats and concrete implementations of the
//! domain interfaces.

pub mod dto;
pub mod identity;
pub mod message_pusher;
pub mod repository;
