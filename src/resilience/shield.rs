//! Cancellation shielding.
//!
//! # Responsibilities
//! - Bound how long a caller waits on an operation
//! - Leave the operation itself running when the bound elapses
//!
//! # Design Decisions
//! - The boundary and the operation's completion are independent signals
//! - Only `Operation::cancel` can stop a shielded operation

use std::time::Duration;

use crate::ops::handle::Operation;
use crate::ops::types::{OpError, OpResult};

/// Wait up to `boundary` for `op` without ever cancelling it.
///
/// On timeout the caller gets `OpError::Timeout`; awaiting the same handle
/// later yields the operation's real outcome.
pub async fn shield<T>(op: &Operation<T>, boundary: Duration) -> OpResult<T>
where
    T: Clone + Send + Sync + 'static,
{
    match tokio::time::timeout(boundary, op.wait()).await {
        Ok(outcome) => outcome.into_result(),
        Err(_) => {
            tracing::info!(
                operation_id = %op.id(),
                label = op.label(),
                boundary = ?boundary,
                "Shield boundary elapsed, operation keeps running"
            );
            Err(OpError::Timeout(boundary))
        }
    }
}
