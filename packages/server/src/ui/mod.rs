//! HTTP / WebSocket surface of the coordinator.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
