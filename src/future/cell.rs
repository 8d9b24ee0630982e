//! Single-assignment result cell.
//!
//! # Responsibilities
//! - Hold one value produced by a concurrently running task
//! - Wake every consumer once the value lands
//! - Reject a second resolution instead of overwriting
//!
//! # Design Decisions
//! - Backed by a `tokio::sync::watch` channel holding `Option<T>`
//! - The single-assignment check runs under the channel's write lock
//! - Consumers receive clones; nobody can mutate the stored value

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::ops::types::{OpError, OpResult};

/// Consumer side of a manually resolved future.
pub struct ManualFuture<T> {
    rx: watch::Receiver<Option<T>>,
}

/// Producer side of a manually resolved future.
pub struct Resolver<T> {
    tx: Arc<watch::Sender<Option<T>>>,
}

impl<T: Clone> ManualFuture<T> {
    /// Create an empty cell and the resolver that fills it.
    pub fn new() -> (Self, Resolver<T>) {
        let (tx, rx) = watch::channel(None);
        (Self { rx }, Resolver { tx: Arc::new(tx) })
    }

    /// Create a cell that is already resolved.
    pub fn resolved(value: T) -> Self {
        let (tx, rx) = watch::channel(Some(value));
        drop(tx);
        Self { rx }
    }

    /// Current value without suspending.
    pub fn peek(&self) -> Option<T> {
        self.rx.borrow().clone()
    }

    /// Suspend until the cell is resolved and return its value.
    ///
    /// Returns immediately when the value is already present. Fails with
    /// [`OpError::Abandoned`] when every resolver was dropped first.
    pub async fn wait(&self) -> OpResult<T> {
        let mut rx = self.rx.clone();
        let result = rx.wait_for(Option::is_some).await.map(|slot| (*slot).clone());
        match result {
            Ok(Some(value)) => Ok(value),
            // Sender gone; the value may still have landed right before it dropped.
            _ => self.peek().ok_or(OpError::Abandoned),
        }
    }
}

impl<T> ManualFuture<T> {
    pub fn is_resolved(&self) -> bool {
        self.rx.borrow().is_some()
    }
}

impl<T> Resolver<T> {
    /// Store `value` and wake every waiter.
    ///
    /// Only the first call succeeds; later calls leave the stored value
    /// untouched and return [`OpError::DoubleResolution`].
    #[must_use = "a second resolution is a programming error and must be handled"]
    pub fn resolve(&self, value: T) -> OpResult<()> {
        let stored = self.tx.send_if_modified(move |slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(value);
            true
        });

        if stored {
            Ok(())
        } else {
            tracing::error!("Attempted to resolve an already resolved future");
            Err(OpError::DoubleResolution)
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.tx.borrow().is_some()
    }
}

impl<T> Clone for ManualFuture<T> {
    fn clone(&self) -> Self {
        Self { rx: self.rx.clone() }
    }
}

impl<T> Clone for Resolver<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T> fmt::Debug for ManualFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualFuture")
            .field("resolved", &self.rx.borrow().is_some())
            .finish()
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("resolved", &self.tx.borrow().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_resolve_wakes_waiter() {
        let (cell, resolver) = ManualFuture::new();
        assert!(!cell.is_resolved());

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            resolver.resolve(10).unwrap();
        });

        assert_eq!(cell.wait().await, Ok(10));
        assert!(cell.is_resolved());
        // Already resolved: returns immediately with the same value.
        assert_eq!(cell.wait().await, Ok(10));
    }

    #[tokio::test]
    async fn test_double_resolution_rejected() {
        let (cell, resolver) = ManualFuture::new();
        assert!(!resolver.is_resolved());
        resolver.resolve("first").unwrap();
        assert!(resolver.is_resolved());

        let second = resolver.clone().resolve("second");
        assert_eq!(second, Err(OpError::DoubleResolution));
        assert_eq!(cell.peek(), Some("first"));
    }

    #[tokio::test]
    async fn test_consumers_see_same_value() {
        let (cell, resolver) = ManualFuture::<String>::new();
        let a = cell.clone();
        let b = cell.clone();

        let first = tokio::spawn(async move { a.wait().await });
        let second = tokio::spawn(async move { b.wait().await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        resolver.resolve("shared".to_string()).unwrap();

        assert_eq!(first.await.unwrap(), Ok("shared".to_string()));
        assert_eq!(second.await.unwrap(), Ok("shared".to_string()));
    }

    #[tokio::test]
    async fn test_dropped_resolver_abandons() {
        let (cell, resolver) = ManualFuture::<u8>::new();
        drop(resolver);
        assert_eq!(cell.wait().await, Err(OpError::Abandoned));
    }

    #[tokio::test]
    async fn test_value_survives_resolver_drop() {
        let (cell, resolver) = ManualFuture::new();
        resolver.resolve(7u32).unwrap();
        drop(resolver);
        assert_eq!(cell.wait().await, Ok(7));

        let ready = ManualFuture::resolved(3u32);
        assert_eq!(ready.wait().await, Ok(3));
    }
}
