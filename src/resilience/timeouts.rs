//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound a plain future by a deadline
//! - Bound an operation by a deadline and cancel it when the deadline wins
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors (`OpError::Timeout`)
//! - `wait_for` is the only timeout that cancels; compare `shield`

use std::future::Future;
use std::time::Duration;

use crate::ops::handle::Operation;
use crate::ops::types::{OpError, OpResult};

/// Run `fut` with an upper bound of `limit`.
pub async fn with_timeout<F, T>(limit: Duration, fut: F) -> OpResult<T>
where
    F: Future<Output = OpResult<T>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| OpError::Timeout(limit))?
}

/// Wait up to `limit` for `op`; on timeout cancel it and wait for the unwind.
pub async fn wait_for<T>(op: &Operation<T>, limit: Duration) -> OpResult<T>
where
    T: Clone + Send + Sync + 'static,
{
    match tokio::time::timeout(limit, op.wait()).await {
        Ok(outcome) => outcome.into_result(),
        Err(_) => {
            tracing::debug!(
                operation_id = %op.id(),
                label = op.label(),
                timeout = ?limit,
                "Deadline elapsed, cancelling operation"
            );
            op.cancel();
            let outcome = op.wait().await;
            tracing::debug!(operation_id = %op.id(), outcome = outcome.kind(), "Operation unwound after timeout");
            Err(OpError::Timeout(limit))
        }
    }
}
