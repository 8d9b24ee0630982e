//! Background producers that resolve a [`ManualFuture`] later.

use std::time::Duration;

use crate::future::cell::ManualFuture;
use crate::ops::delay::delay;

/// Hand out an empty cell and resolve it with `value` after `after` elapses.
///
/// The producer runs as its own task; the returned cell is the only link
/// between it and the caller.
pub fn resolve_after<T>(after: Duration, value: T) -> ManualFuture<T>
where
    T: Clone + Send + Sync + 'static,
{
    let (cell, resolver) = ManualFuture::new();

    tokio::spawn(async move {
        delay(after).await;
        if let Err(e) = resolver.resolve(value) {
            tracing::error!(error = %e, "Producer could not resolve future");
        }
    });

    cell
}
