//! Explicit cancellation context for scheduled operations.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::ops::delay::delay_with;
use crate::ops::handle::Operation;
use crate::ops::timer::Timer;
use crate::ops::types::OpResult;

/// Owner of a group of operations.
///
/// Every operation gets a child token of the scope's token, so
/// [`Scope::cancel_all`] reaches all of them while [`Operation::cancel`]
/// reaches only one.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    token: CancellationToken,
    timer: Timer,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope whose operations report timings through `timer`.
    pub fn with_timer(timer: Timer) -> Self {
        Self {
            token: CancellationToken::new(),
            timer,
        }
    }

    /// Nested scope; cancelling the parent cancels it too.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            timer: self.timer.clone(),
        }
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Schedule `fut` as an operation labelled `label`.
    pub fn spawn<T, F>(&self, label: &str, fut: F) -> Operation<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Future<Output = OpResult<T>> + Send + 'static,
    {
        Operation::spawn(label, self.token.child_token(), fut)
    }

    /// Schedule a simulated unit of work that sleeps for `duration`.
    pub fn delay(&self, duration: Duration) -> Operation<Duration> {
        let timer = self.timer.clone();
        self.spawn("delay", async move { Ok(delay_with(&timer, duration).await) })
    }

    /// Cancel every operation spawned from this scope or its children.
    pub fn cancel_all(&self) {
        tracing::debug!("Cancelling scope");
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
