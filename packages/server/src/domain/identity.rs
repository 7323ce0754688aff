//! Identity service interface.

use async_trait::async_trait;

use super::{Identity, IdentityError};

/// Verifies a bearer credential and returns who it belongs to
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<Identity, IdentityError>;
}
