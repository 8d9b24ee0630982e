//! Sliding-window draining.
//!
//! # Responsibilities
//! - Run a backlog of jobs with at most `window` in flight
//! - Replenish the window as soon as any job is terminal
//! - Hand each finished operation to the caller as it lands
//!
//! # Design Decisions
//! - Jobs are plain futures; they do not start until a slot is free
//! - Each round is one `ReturnWhen::FirstCompleted` wait

use std::future::Future;

use crate::ops::handle::Operation;
use crate::ops::scope::Scope;
use crate::ops::types::OpResult;
use crate::wait::partition::BatchSummary;
use crate::wait::policy::{wait, ReturnWhen};

/// Result of draining a backlog.
#[derive(Debug)]
pub struct DrainReport<T> {
    /// Every operation, in the order its completion was observed.
    pub completed: Vec<Operation<T>>,
    /// Largest number of scheduled, unobserved operations at any time.
    pub peak_in_flight: usize,
    /// Number of wait rounds.
    pub rounds: usize,
}

impl<T> DrainReport<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn summary(&self) -> BatchSummary {
        let outcomes: Vec<_> = self.completed.iter().filter_map(|op| op.outcome()).collect();
        BatchSummary::from_outcomes(&outcomes)
    }
}

/// Run `jobs` on `scope`, keeping at most `window` of them in flight.
///
/// `on_done` sees every operation once, as soon as a round observes it
/// terminal. A `window` of zero is treated as one.
pub async fn drain_windowed<T, I, Fut, F>(
    scope: &Scope,
    label: &str,
    window: usize,
    jobs: I,
    mut on_done: F,
) -> DrainReport<T>
where
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = Fut>,
    Fut: Future<Output = OpResult<T>> + Send + 'static,
    F: FnMut(&Operation<T>),
{
    if window == 0 {
        tracing::warn!("Drain window of zero requested, using one");
    }
    let window = window.max(1);
    let mut backlog = jobs.into_iter();
    let mut pending: Vec<Operation<T>> = Vec::with_capacity(window);
    let mut report = DrainReport {
        completed: Vec::new(),
        peak_in_flight: 0,
        rounds: 0,
    };

    refill(scope, label, window, &mut pending, &mut backlog);

    while !pending.is_empty() {
        report.peak_in_flight = report.peak_in_flight.max(pending.len());

        let partition = wait(pending, ReturnWhen::FirstCompleted, None).await;
        report.rounds += 1;
        tracing::debug!(
            label,
            done = partition.done.len(),
            pending = partition.pending.len(),
            "Drain round finished"
        );

        let (done, still_pending) = partition.into_parts();
        pending = still_pending;
        for op in done {
            on_done(&op);
            report.completed.push(op);
        }

        refill(scope, label, window, &mut pending, &mut backlog);
    }

    tracing::info!(
        label,
        completed = report.completed.len(),
        rounds = report.rounds,
        "Drain finished"
    );
    report
}

fn refill<T, I, Fut>(scope: &Scope, label: &str, window: usize, pending: &mut Vec<Operation<T>>, backlog: &mut I)
where
    T: Clone + Send + Sync + 'static,
    I: Iterator<Item = Fut>,
    Fut: Future<Output = OpResult<T>> + Send + 'static,
{
    while pending.len() < window {
        match backlog.next() {
            Some(job) => pending.push(scope.spawn(label, job)),
            None => break,
        }
    }
}
