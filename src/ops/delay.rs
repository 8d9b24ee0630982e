//! Simulated asynchronous work.

use std::time::Duration;

use crate::ops::timer::Timer;

/// Suspend for `duration` and hand it back unchanged.
///
/// Cancelling is dropping: the sleep ends at once and no value is produced.
pub async fn delay(duration: Duration) -> Duration {
    delay_with(&Timer::default(), duration).await
}

/// [`delay`] reporting through a specific timer.
pub async fn delay_with(timer: &Timer, duration: Duration) -> Duration {
    timer
        .time("delay", async {
            tracing::debug!(duration = ?duration, "Sleeping");
            tokio::time::sleep(duration).await;
            tracing::debug!(duration = ?duration, "Finished sleeping");
            duration
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::timer::MemorySink;
    use crate::ops::{Outcome, Scope};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_delay_returns_duration() {
        let sink = Arc::new(MemorySink::new());
        let timer = Timer::new(sink.clone());

        for ms in [0u64, 5, 25] {
            let d = Duration::from_millis(ms);
            assert_eq!(delay_with(&timer, d).await, d);
        }

        let recorded = sink.durations("delay");
        assert_eq!(recorded.len(), 3);
        assert!(recorded[1] >= Duration::from_millis(5));
        assert!(recorded[2] >= Duration::from_millis(25));
    }

    #[tokio::test]
    async fn test_cancelled_delay_produces_no_value() {
        let scope = Scope::new();
        let op = scope.delay(Duration::from_secs(5));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(op.cancel());

        assert_eq!(op.wait().await, Outcome::Cancelled);
        assert!(op.is_cancelled());
        assert!(!op.cancel(), "a terminal operation cannot be cancelled again");
    }

    #[tokio::test]
    async fn test_scheduled_delay_completes() {
        let scope = Scope::new();
        let op = scope.delay(Duration::from_millis(10));
        assert_eq!(op.result().await, Ok(Duration::from_millis(10)));
    }
}
