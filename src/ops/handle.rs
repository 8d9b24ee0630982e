//! Operation handles.
//!
//! # Responsibilities
//! - Drive one unit of async work on its own tokio task
//! - Publish exactly one terminal outcome
//! - Let any clone of the handle observe or cancel it
//!
//! # Design Decisions
//! - Cancellation is cooperative through a `CancellationToken`; the driver
//!   drops the work at its next suspension point
//! - Dropping every handle does not cancel the work
//! - Panics in the work are caught and reported as `Failed(Panicked)`

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::future::cell::ManualFuture;
use crate::observability::metrics;
use crate::ops::types::{OpError, OpResult, OperationId, Outcome};

/// Handle to a scheduled operation.
pub struct Operation<T> {
    id: OperationId,
    label: Arc<str>,
    token: CancellationToken,
    outcome: ManualFuture<Outcome<T>>,
}

impl<T> Operation<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Spawn `fut` under `token` and return its handle.
    pub(crate) fn spawn<F>(label: &str, token: CancellationToken, fut: F) -> Self
    where
        F: Future<Output = OpResult<T>> + Send + 'static,
    {
        let id = OperationId::new();
        let label: Arc<str> = Arc::from(label);
        let (outcome, resolver) = ManualFuture::new();

        let driver_token = token.clone();
        let driver_label = label.clone();
        metrics::record_in_flight(&label, 1.0);
        tracing::debug!(operation_id = %id, label = %label, "Operation scheduled");

        tokio::spawn(async move {
            let body = AssertUnwindSafe(fut).catch_unwind();
            let outcome = tokio::select! {
                biased;
                _ = driver_token.cancelled() => Outcome::Cancelled,
                result = body => match result {
                    Ok(result) => Outcome::from_result(result),
                    Err(panic) => Outcome::Failed(OpError::Panicked(panic_message(panic.as_ref()))),
                },
            };

            tracing::debug!(
                operation_id = %id,
                label = %driver_label,
                outcome = outcome.kind(),
                "Operation finished"
            );
            metrics::record_in_flight(&driver_label, -1.0);
            metrics::record_operation_outcome(&driver_label, outcome.kind());

            if let Err(e) = resolver.resolve(outcome) {
                tracing::error!(operation_id = %id, error = %e, "Operation outcome published twice");
            }
        });

        Self {
            id,
            label,
            token,
            outcome,
        }
    }

    /// Terminal outcome if already reached.
    pub fn outcome(&self) -> Option<Outcome<T>> {
        self.outcome.peek()
    }

    /// Suspend until the operation is terminal.
    pub async fn wait(&self) -> Outcome<T> {
        match self.outcome.wait().await {
            Ok(outcome) => outcome,
            // Only reachable when the runtime dropped the driver task.
            Err(e) => Outcome::Failed(e),
        }
    }

    /// Suspend until terminal and convert the outcome to a `Result`.
    pub async fn result(&self) -> OpResult<T> {
        self.wait().await.into_result()
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.outcome(), Some(Outcome::Cancelled))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome(), Some(Outcome::Failed(_)))
    }
}

impl<T> Operation<T> {
    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// True once the operation reached a terminal state.
    pub fn is_done(&self) -> bool {
        self.outcome.is_resolved()
    }

    /// True once cancellation was requested, terminal or not.
    pub fn cancel_requested(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Request cancellation.
    ///
    /// Returns `false` when the operation is already terminal. A request that
    /// loses the race against normal completion leaves the real outcome.
    pub fn cancel(&self) -> bool {
        if self.is_done() {
            return false;
        }
        tracing::debug!(operation_id = %self.id, label = %self.label, "Cancelling operation");
        self.token.cancel();
        true
    }
}

impl<T> Clone for Operation<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            label: self.label.clone(),
            token: self.token.clone(),
            outcome: self.outcome.clone(),
        }
    }
}

impl<T> fmt::Debug for Operation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("done", &self.is_done())
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
