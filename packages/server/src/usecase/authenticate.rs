//! UseCase: authenticate a connection.
//!
//! The credential is verified outside the state lock. Identity is write-once:
//! if two authentications race, the second one to reach the state loses with
//! `AlreadyAuthenticated`.

use std::{sync::Arc, time::Duration};

use crate::domain::{
    ConnectionId, Identity, IdentityError, IdentityVerifier, MessagePusher, ServerEvent,
    SharedState,
};

use super::{delivery::push_or_log, error::CoordinatorError};

pub struct AuthenticateUseCase {
    state: SharedState,
    identity_verifier: Arc<dyn IdentityVerifier>,
    message_pusher: Arc<dyn MessagePusher>,
    timeout: Duration,
}

impl AuthenticateUseCase {
    pub fn new(
        state: SharedState,
        identity_verifier: Arc<dyn IdentityVerifier>,
        message_pusher: Arc<dyn MessagePusher>,
        timeout: Duration,
    ) -> Self {
        Self {
            state,
            identity_verifier,
            message_pusher,
            timeout,
        }
    }

    /// Verify `credential` and attach the resulting identity to the connection.
    ///
    /// On success the connection also becomes reachable on the
    /// user-addressed channel and receives an `authenticated` ack.
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        credential: &str,
    ) -> Result<Identity, CoordinatorError> {
        self.state
            .lock()
            .await
            .ensure_unauthenticated(&connection_id)?;

        let identity =
            match tokio::time::timeout(self.timeout, self.identity_verifier.verify(credential))
                .await
            {
                Ok(result) => result?,
                Err(_) => {
                    return Err(IdentityError::Unavailable(format!(
                        "verification timed out after {:?}",
                        self.timeout
                    ))
                    .into());
                }
            };

        self.state
            .lock()
            .await
            .authenticate(&connection_id, identity)?;
        self.message_pusher
            .bind_user(&connection_id, identity.user_id)
            .await;

        tracing::info!(
            connection_id = %connection_id,
            user_id = %identity.user_id,
            gender = %identity.gender,
            "connection authenticated"
        );

        push_or_log(
            self.message_pusher.as_ref(),
            &connection_id,
            &ServerEvent::Authenticated {
                user_id: identity.user_id,
                gender: identity.gender,
            },
        )
        .await;
        Ok(identity)
    }
}
