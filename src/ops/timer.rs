//! Wall-clock timing around async operations.
//!
//! # Responsibilities
//! - Emit a start event before the wrapped future is first polled
//! - Emit the elapsed duration on every exit path (success, error, drop)
//! - Forward errors to the sink without touching the output
//!
//! # Design Decisions
//! - The end event lives in `TimingGuard::drop`, so a cancelled (dropped)
//!   future still reports how long it ran
//! - Sinks are pluggable; the default one logs through `tracing` and records
//!   `metrics` histograms

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::observability::metrics;

/// Receiver of timing events.
pub trait TimingSink: Send + Sync {
    fn record_start(&self, label: &str);

    fn record_duration(&self, label: &str, elapsed: Duration);

    fn record_error(&self, label: &str, error: &dyn fmt::Display);
}

/// Default sink: structured logs plus metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TimingSink for TracingSink {
    fn record_start(&self, label: &str) {
        tracing::debug!(label, "Starting operation");
    }

    fn record_duration(&self, label: &str, elapsed: Duration) {
        tracing::info!(
            label,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "Finished operation"
        );
        metrics::record_operation_duration(label, elapsed);
    }

    fn record_error(&self, label: &str, error: &dyn fmt::Display) {
        tracing::warn!(label, error = %error, "Operation failed");
        metrics::record_operation_error(label);
    }
}

/// A timing event captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimingEvent {
    Started(String),
    Finished(String, Duration),
    Failed(String, String),
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<TimingEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TimingEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Elapsed durations recorded for `label`, in emission order.
    pub fn durations(&self, label: &str) -> Vec<Duration> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                TimingEvent::Finished(l, elapsed) if l == label => Some(elapsed),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: TimingEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }
}

impl TimingSink for MemorySink {
    fn record_start(&self, label: &str) {
        self.push(TimingEvent::Started(label.to_string()));
    }

    fn record_duration(&self, label: &str, elapsed: Duration) {
        self.push(TimingEvent::Finished(label.to_string(), elapsed));
    }

    fn record_error(&self, label: &str, error: &dyn fmt::Display) {
        self.push(TimingEvent::Failed(label.to_string(), error.to_string()));
    }
}

/// Times async operations and reports to a [`TimingSink`].
#[derive(Clone)]
pub struct Timer {
    sink: Arc<dyn TimingSink>,
}

impl Timer {
    pub fn new(sink: Arc<dyn TimingSink>) -> Self {
        Self { sink }
    }

    /// Begin a timing record; the end event fires when the guard drops.
    pub fn start(&self, label: &str) -> TimingGuard {
        self.sink.record_start(label);
        TimingGuard {
            label: label.to_string(),
            start: Instant::now(),
            sink: self.sink.clone(),
        }
    }

    /// Run `fut` inside a timing record.
    pub async fn time<F>(&self, label: &str, fut: F) -> F::Output
    where
        F: Future,
    {
        let _guard = self.start(label);
        fut.await
    }

    /// Like [`Timer::time`], and also reports `Err` outputs as error events.
    pub async fn time_fallible<F, T, E>(&self, label: &str, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let guard = self.start(label);
        let result = fut.await;
        if let Err(e) = &result {
            self.sink.record_error(label, e);
        }
        drop(guard);
        result
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer").finish_non_exhaustive()
    }
}

/// A running timing record.
pub struct TimingGuard {
    label: String,
    start: Instant,
    sink: Arc<dyn TimingSink>,
}

impl TimingGuard {
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        self.sink.record_duration(&self.label, self.elapsed());
    }
}

/// Time `fut` with the default tracing sink.
pub async fn timed<F>(label: &str, fut: F) -> F::Output
where
    F: Future,
{
    Timer::default().time(label, fut).await
}
