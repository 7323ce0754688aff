//! Shared application state.

use std::sync::Arc;

use crate::usecase::Coordinator;

/// State handed to every axum handler
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
}
