//! UseCase layer: one use case per coordinator operation, composed by the
//! `Coordinator` facade.

pub mod authenticate;
pub mod cancel_match;
pub mod connect_client;
pub mod coordinator;
pub mod create_session;
mod delivery;
pub mod disconnect_client;
pub mod error;
pub mod find_match;
pub mod join_session;
pub mod leave_session;
mod persistence;
pub mod relay_event;
#[cfg(test)]
pub(crate) mod test_support;

pub use authenticate::AuthenticateUseCase;
pub use cancel_match::CancelMatchUseCase;
pub use connect_client::ConnectClientUseCase;
pub use coordinator::{Coordinator, CoordinatorConfig, DEFAULT_STORE_TIMEOUT};
pub use create_session::CreateSessionUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::CoordinatorError;
pub use find_match::{FindMatchOutcome, FindMatchUseCase};
pub use join_session::JoinSessionUseCase;
pub use leave_session::LeaveSessionUseCase;
pub use relay_event::RelayEventUseCase;
