//! Status fetcher with artificial latency and per-request timeouts.
//!
//! # Responsibilities
//! - Reject malformed or non-HTTP URLs before any I/O
//! - Optionally sleep first to simulate network/server latency
//! - Bound the request itself by an optional timeout
//!
//! # Design Decisions
//! - The artificial delay is not counted against the request timeout
//! - Non-2xx statuses are returned, not treated as errors
//! - The timeout is enforced here as well as handed to the client, so an
//!   injected client without its own deadline is still bounded

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::http::client::HttpClient;
use crate::ops::handle::Operation;
use crate::ops::scope::Scope;
use crate::ops::timer::Timer;
use crate::ops::types::{OpError, OpResult};

/// Per-request knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Upper bound on the request itself.
    pub timeout: Option<Duration>,
    /// Sleep before issuing the request.
    pub delay: Duration,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Fetch `url` through `client` and return its status code.
pub async fn fetch_status<C>(client: &C, url: &str, options: FetchOptions) -> OpResult<u16>
where
    C: HttpClient,
{
    check_url(url)?;

    if !options.delay.is_zero() {
        tracing::debug!(url, delay = ?options.delay, "Delaying request");
        tokio::time::sleep(options.delay).await;
    }

    let request = client.get(url, options.timeout);
    let status = match options.timeout {
        Some(limit) => tokio::time::timeout(limit, request)
            .await
            .map_err(|_| OpError::Timeout(limit))??,
        None => request.await?,
    };

    tracing::debug!(url, status, "Request finished");
    Ok(status)
}

fn check_url(url: &str) -> OpResult<()> {
    let parsed = url::Url::parse(url)
        .map_err(|e| OpError::Connection(format!("invalid URL '{}': {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(OpError::Connection(format!("unsupported URL scheme '{}'", scheme))),
    }
}

/// Shared client plus timing, able to schedule fetches as operations.
pub struct Fetcher<C> {
    client: Arc<C>,
    timer: Timer,
}

impl<C> Fetcher<C>
where
    C: HttpClient + 'static,
{
    pub fn new(client: C) -> Self {
        Self::from_arc(Arc::new(client))
    }

    pub fn from_arc(client: Arc<C>) -> Self {
        Self {
            client,
            timer: Timer::default(),
        }
    }

    pub fn with_timer(mut self, timer: Timer) -> Self {
        self.timer = timer;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Timed [`fetch_status`].
    pub async fn fetch(&self, url: &str, options: FetchOptions) -> OpResult<u16> {
        self.timer
            .time_fallible("fetch", fetch_status(self.client.as_ref(), url, options))
            .await
    }

    /// Schedule a fetch on `scope`.
    pub fn spawn(&self, scope: &Scope, url: &str, options: FetchOptions) -> Operation<u16> {
        let fetcher = self.clone();
        let url = url.to_string();
        scope.spawn("fetch", async move { fetcher.fetch(&url, options).await })
    }
}

impl<C> Clone for Fetcher<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            timer: self.timer.clone(),
        }
    }
}

impl<C> fmt::Debug for Fetcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher").finish_non_exhaustive()
    }
}
