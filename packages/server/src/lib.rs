//! Real-time session coordinator for Tandem.
//!
//! Pairs strangers through a two-sided matchmaking queue, tracks session
//! rooms, and relays chat, drawing and playback-control events to every
//! member of a room over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
