//! Completion-order iteration under an overall deadline.
//!
//! # Responsibilities
//! - Yield operations in the order they become terminal
//! - Bound the whole iteration by one timeout
//! - Keep unfinished operations reachable after the deadline
//!
//! # Design Decisions
//! - After the deadline every remaining operation yields one
//!   `Err(OpError::Timeout)`, then the sequence ends
//! - The deadline stops observation only; nothing is cancelled

use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::time::Instant;

use crate::ops::handle::Operation;
use crate::ops::types::{OpError, OpResult};

/// Pull-based sequence of terminal operations, fastest first.
pub struct AsCompleted<T> {
    ops: Vec<Operation<T>>,
    yielded: Vec<bool>,
    watchers: FuturesUnordered<BoxFuture<'static, usize>>,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
    /// Set once the deadline passed: timeouts still owed to the caller.
    timeouts_owed: Option<usize>,
}

/// Iterate `ops` in completion order, bounded overall by `timeout`.
pub fn as_completed<T, I>(ops: I, timeout: Option<Duration>) -> AsCompleted<T>
where
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = Operation<T>>,
{
    let ops: Vec<Operation<T>> = ops.into_iter().collect();
    let watchers = ops
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, op)| {
            async move {
                op.wait().await;
                index
            }
            .boxed()
        })
        .collect();

    AsCompleted {
        yielded: vec![false; ops.len()],
        ops,
        watchers,
        timeout,
        deadline: timeout.map(|limit| Instant::now() + limit),
        timeouts_owed: None,
    }
}

impl<T> AsCompleted<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Next terminal operation.
    ///
    /// Returns `None` once every operation has been yielded, or once every
    /// post-deadline timeout has been reported.
    pub async fn next(&mut self) -> Option<OpResult<Operation<T>>> {
        if let Some(owed) = self.timeouts_owed.as_mut() {
            if *owed == 0 {
                return None;
            }
            *owed -= 1;
            return Some(Err(self.timeout_error()));
        }

        let next = match self.deadline {
            Some(deadline) => {
                let polled = tokio::time::timeout_at(deadline, self.watchers.next()).await;
                match polled {
                    Ok(next) => next,
                    Err(_) => return Some(Err(self.expire())),
                }
            }
            None => self.watchers.next().await,
        };

        let index = next?;
        self.yielded[index] = true;
        Some(Ok(self.ops[index].clone()))
    }

    /// Operations not yet yielded, finished or not.
    pub fn unfinished(&self) -> Vec<Operation<T>> {
        self.ops
            .iter()
            .zip(&self.yielded)
            .filter(|(_, yielded)| !**yielded)
            .map(|(op, _)| op.clone())
            .collect()
    }

    /// Number of operations not yet yielded.
    pub fn remaining(&self) -> usize {
        self.yielded.iter().filter(|yielded| !**yielded).count()
    }

    fn expire(&mut self) -> OpError {
        let remaining = self.remaining();
        tracing::warn!(
            unfinished = remaining,
            timeout = ?self.timeout,
            "Completion deadline elapsed"
        );
        self.watchers.clear();
        self.timeouts_owed = Some(remaining.saturating_sub(1));
        self.timeout_error()
    }

    fn timeout_error(&self) -> OpError {
        OpError::Timeout(self.timeout.unwrap_or_default())
    }
}

impl<T> std::fmt::Debug for AsCompleted<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsCompleted")
            .field("total", &self.ops.len())
            .field("watching", &self.watchers.len())
            .field("timeout", &self.timeout)
            .finish()
    }
}
