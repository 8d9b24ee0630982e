//! Done/pending split of an operation set.

use serde::Serialize;

use crate::ops::handle::Operation;
use crate::ops::types::{OpError, OperationId, Outcome};

/// Operations split by terminal state at one instant.
///
/// Every handle handed to a wait policy comes back in exactly one of the two
/// vectors.
#[derive(Debug)]
pub struct Partition<T> {
    pub done: Vec<Operation<T>>,
    pub pending: Vec<Operation<T>>,
}

impl<T> Partition<T> {
    /// Split by the state each handle reports right now.
    pub(crate) fn split(ops: Vec<Operation<T>>) -> Self {
        let (done, pending) = ops.into_iter().partition(|op| op.is_done());
        Self { done, pending }
    }

    pub fn len(&self) -> usize {
        self.done.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Request cancellation of every pending handle.
    ///
    /// Returns how many requests were issued.
    pub fn cancel_pending(&self) -> usize {
        self.pending.iter().filter(|op| op.cancel()).count()
    }

    pub fn into_parts(self) -> (Vec<Operation<T>>, Vec<Operation<T>>) {
        (self.done, self.pending)
    }
}

impl<T> Partition<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Values of the completed operations in `done`.
    pub fn succeeded(&self) -> Vec<T> {
        self.done
            .iter()
            .filter_map(|op| match op.outcome() {
                Some(Outcome::Completed(value)) => Some(value),
                _ => None,
            })
            .collect()
    }

    /// Errors of the failed operations in `done`.
    pub fn failed(&self) -> Vec<(OperationId, OpError)> {
        self.done
            .iter()
            .filter_map(|op| match op.outcome() {
                Some(Outcome::Failed(e)) => Some((op.id(), e)),
                _ => None,
            })
            .collect()
    }

    /// Ids of the cancelled operations in `done`.
    pub fn cancelled(&self) -> Vec<OperationId> {
        self.done.iter().filter(|op| op.is_cancelled()).map(|op| op.id()).collect()
    }

    pub fn summary(&self) -> BatchSummary {
        let outcomes: Vec<Outcome<T>> = self.done.iter().filter_map(|op| op.outcome()).collect();
        let mut summary = BatchSummary::from_outcomes(&outcomes);
        summary.total += self.pending.len();
        summary.pending = self.pending.len();
        summary
    }
}

/// Counts for partial-success reporting over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub pending: usize,
}

impl BatchSummary {
    pub fn from_outcomes<'a, T: 'a>(outcomes: impl IntoIterator<Item = &'a Outcome<T>>) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.total += 1;
            match outcome {
                Outcome::Completed(_) => summary.completed += 1,
                Outcome::Failed(_) => summary.failed += 1,
                Outcome::Cancelled => summary.cancelled += 1,
            }
        }
        summary
    }

    pub fn all_succeeded(&self) -> bool {
        self.completed == self.total
    }
}
