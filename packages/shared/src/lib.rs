//! Utilities shared between Tandem binaries and libraries.

pub mod logger;
pub mod time;
