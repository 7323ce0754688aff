//! Bounded calls to the durable store.

use std::{future::Future, time::Duration};

use crate::domain::StoreError;

/// Await a store call, giving up after `timeout`
pub async fn store_call<T, F>(timeout: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(?timeout, "store call timed out");
            Err(StoreError::Timeout(timeout))
        }
    }
}
