//! Group-wait policies.
//!
//! # Responsibilities
//! - Suspend until a set of operations meets a `ReturnWhen` condition
//! - Report the set as a done/pending `Partition`
//! - Collect outcomes in submission order (`gather`)
//!
//! # Design Decisions
//! - Waiting only observes; nothing here cancels an operation
//! - `done` is computed after the triggering event, so it holds every
//!   operation terminal at that instant, not just the first one
//! - A timeout returns the partition as it stands instead of failing

use std::time::Duration;

use futures_util::future::join_all;
use futures_util::stream::{FuturesUnordered, Stream, StreamExt};
use tokio::time::Instant;

use crate::ops::handle::Operation;
use crate::ops::types::Outcome;
use crate::wait::partition::Partition;

/// Condition that ends a [`wait`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnWhen {
    /// Every operation is terminal.
    #[default]
    AllCompleted,
    /// At least one operation is terminal.
    FirstCompleted,
    /// One operation failed, or every operation is terminal.
    FirstException,
}

/// Wait on `ops` until `return_when` holds or `timeout` elapses.
///
/// Pending operations are left running; cancel them through
/// [`Partition::cancel_pending`] when they are no longer wanted. Cancelled
/// outcomes do not count as exceptions.
pub async fn wait<T, I>(ops: I, return_when: ReturnWhen, timeout: Option<Duration>) -> Partition<T>
where
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = Operation<T>>,
{
    let ops: Vec<Operation<T>> = ops.into_iter().collect();
    let deadline = timeout.map(|limit| Instant::now() + limit);

    let mut watchers: FuturesUnordered<_> = ops
        .iter()
        .cloned()
        .map(|op| async move { op.wait().await.is_failed() })
        .collect();

    while let Some(failed) = next_before(&mut watchers, deadline).await {
        match return_when {
            ReturnWhen::FirstCompleted => break,
            ReturnWhen::FirstException if failed => break,
            _ => {}
        }
    }

    let partition = Partition::split(ops);
    tracing::debug!(
        policy = ?return_when,
        done = partition.done.len(),
        pending = partition.pending.len(),
        "Wait finished"
    );
    partition
}

/// Wait until every operation in `ops` is terminal.
pub async fn wait_all<T, I>(ops: I) -> Partition<T>
where
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = Operation<T>>,
{
    wait(ops, ReturnWhen::AllCompleted, None).await
}

/// Outcomes of every operation, in the order they were given.
pub async fn gather<T>(ops: &[Operation<T>]) -> Vec<Outcome<T>>
where
    T: Clone + Send + Sync + 'static,
{
    join_all(ops.iter().map(|op| op.wait())).await
}

/// Next stream item, or `None` once `deadline` passes.
pub(crate) async fn next_before<S>(stream: &mut S, deadline: Option<Instant>) -> Option<S::Item>
where
    S: Stream + Unpin,
{
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, stream.next()).await.ok().flatten(),
        None => stream.next().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::types::OpError;
    use crate::ops::Scope;
    use crate::wait::BatchSummary;

    fn failing(scope: &Scope, after: Duration) -> Operation<Duration> {
        scope.spawn("failing", async move {
            tokio::time::sleep(after).await;
            Err(OpError::Connection("unsupported scheme".into()))
        })
    }

    #[tokio::test]
    async fn test_wait_all_reports_every_outcome() {
        let scope = Scope::new();
        let ops = vec![
            scope.delay(Duration::from_millis(10)),
            scope.delay(Duration::from_millis(20)),
            failing(&scope, Duration::from_millis(5)),
        ];

        let partition = wait_all(ops).await;

        assert_eq!(partition.done.len(), 3);
        assert!(partition.pending.is_empty());
        assert_eq!(partition.failed().len(), 1);
        assert_eq!(partition.succeeded().len(), 2);

        let summary = partition.summary();
        assert_eq!(summary, BatchSummary { total: 3, completed: 2, failed: 1, cancelled: 0, pending: 0 });
    }

    #[tokio::test]
    async fn test_first_completed_returns_with_fastest() {
        let scope = Scope::new();
        let ops = vec![
            scope.delay(Duration::from_millis(500)),
            scope.delay(Duration::from_millis(10)),
            scope.delay(Duration::from_millis(500)),
        ];

        let start = Instant::now();
        let partition = wait(ops, ReturnWhen::FirstCompleted, None).await;

        assert!(start.elapsed() < Duration::from_millis(400));
        assert_eq!(partition.len(), 3);
        assert_eq!(partition.done.len(), 1);
        assert_eq!(partition.pending.len(), 2);
        assert_eq!(partition.succeeded(), vec![Duration::from_millis(10)]);
        assert!(partition.pending.iter().all(|op| !op.cancel_requested()));

        assert_eq!(partition.cancel_pending(), 2);
    }

    #[tokio::test]
    async fn test_first_completed_batches_already_terminal() {
        let scope = Scope::new();
        let quick_a = scope.delay(Duration::ZERO);
        let quick_b = scope.delay(Duration::ZERO);
        quick_a.wait().await;
        quick_b.wait().await;
        let slow = scope.delay(Duration::from_secs(5));

        let partition = wait(vec![quick_a, slow, quick_b], ReturnWhen::FirstCompleted, None).await;

        assert_eq!(partition.done.len(), 2);
        assert_eq!(partition.pending.len(), 1);
        partition.cancel_pending();
    }

    #[tokio::test]
    async fn test_first_exception_stops_at_failure() {
        let scope = Scope::new();
        let bad = failing(&scope, Duration::from_millis(10));
        let bad_id = bad.id();
        let ops = vec![
            bad,
            scope.delay(Duration::from_millis(500)),
            scope.delay(Duration::from_millis(500)),
        ];

        let start = Instant::now();
        let partition = wait(ops, ReturnWhen::FirstException, None).await;

        assert!(start.elapsed() < Duration::from_millis(400));
        assert!(partition.done.iter().any(|op| op.id() == bad_id));
        assert_eq!(partition.pending.len(), 2);
        // Leftovers keep running until the caller cancels them.
        assert!(partition.pending.iter().all(|op| !op.cancel_requested()));

        assert_eq!(partition.cancel_pending(), 2);
        for op in &partition.pending {
            assert_eq!(op.wait().await, Outcome::Cancelled);
        }
        assert!(partition.cancelled().is_empty());

        let leftovers: Vec<_> = partition.pending.iter().map(|op| op.id()).collect();
        let settled = wait_all(partition.pending.clone()).await;
        assert_eq!(settled.cancelled(), leftovers);
        assert!(settled.succeeded().is_empty());
        assert!(settled.failed().is_empty());
    }

    #[tokio::test]
    async fn test_first_exception_without_failures_waits_for_all() {
        let scope = Scope::new();
        let ops = vec![
            scope.delay(Duration::from_millis(10)),
            scope.delay(Duration::from_millis(30)),
        ];

        let partition = wait(ops, ReturnWhen::FirstException, None).await;
        assert_eq!(partition.done.len(), 2);
        assert!(partition.pending.is_empty());
    }

    #[tokio::test]
    async fn test_first_exception_ignores_cancellation() {
        let scope = Scope::new();
        let cancelled = scope.delay(Duration::from_secs(5));
        cancelled.cancel();
        let ops = vec![cancelled, scope.delay(Duration::from_millis(30))];

        let partition = wait(ops, ReturnWhen::FirstException, None).await;
        assert_eq!(partition.done.len(), 2);
        assert_eq!(partition.summary().cancelled, 1);
    }

    #[tokio::test]
    async fn test_timeout_returns_partition_without_cancelling() {
        let scope = Scope::new();
        let slow = scope.delay(Duration::from_millis(300));

        let partition = wait(vec![slow.clone()], ReturnWhen::AllCompleted, Some(Duration::from_millis(20))).await;

        assert!(partition.done.is_empty());
        assert_eq!(partition.pending.len(), 1);
        assert_eq!(slow.wait().await, Outcome::Completed(Duration::from_millis(300)));
    }

    #[tokio::test]
    async fn test_empty_set() {
        let partition = wait_all(Vec::<Operation<u8>>::new()).await;
        assert!(partition.is_empty());
    }

    #[tokio::test]
    async fn test_gather_keeps_submission_order() {
        let scope = Scope::new();
        let ops = vec![
            scope.delay(Duration::from_millis(50)),
            scope.delay(Duration::from_millis(10)),
        ];

        let outcomes = gather(&ops).await;
        assert_eq!(
            outcomes,
            vec![
                Outcome::Completed(Duration::from_millis(50)),
                Outcome::Completed(Duration::from_millis(10)),
            ]
        );
    }
}
