//! HTTP client capability consumed by the fetcher.
//!
//! # Responsibilities
//! - Issue a GET and report the numeric status
//! - Map transport failures onto `OpError::Timeout` / `OpError::Connection`
//!
//! # Design Decisions
//! - The transport is a trait so tests and callers can inject their own
//! - The reqwest implementation shares one connection pool; clones are cheap

use std::future::Future;
use std::time::Duration;

use crate::config::HttpClientConfig;
use crate::ops::types::{OpError, OpResult};

/// Minimal async HTTP capability.
pub trait HttpClient: Send + Sync {
    /// GET `url`, optionally bounded by `timeout`, returning the status code.
    fn get(&self, url: &str, timeout: Option<Duration>) -> impl Future<Output = OpResult<u16>> + Send;
}

/// [`HttpClient`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
    total_timeout: Duration,
    connect_timeout: Duration,
}

impl ReqwestClient {
    /// Build a client with the session-wide limits in `config`.
    pub fn from_config(config: &HttpClientConfig) -> OpResult<Self> {
        let total_timeout = Duration::from_secs(config.total_timeout_secs);
        let connect_timeout = Duration::from_secs(config.connect_timeout_secs);
        let inner = reqwest::Client::builder()
            .timeout(total_timeout)
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| OpError::Connection(format!("failed to build HTTP client: {}", e)))?;

        tracing::debug!(
            total_timeout_secs = config.total_timeout_secs,
            connect_timeout_secs = config.connect_timeout_secs,
            "HTTP client initialized"
        );

        Ok(Self {
            inner,
            total_timeout,
            connect_timeout,
        })
    }

    /// Wrap an existing reqwest client.
    ///
    /// Connect timeouts are reported against `total_timeout` until
    /// [`ReqwestClient::with_connect_timeout`] says otherwise.
    pub fn with_client(inner: reqwest::Client, total_timeout: Duration) -> Self {
        Self {
            inner,
            total_timeout,
            connect_timeout: total_timeout,
        }
    }

    /// Record the connect timeout `inner` was built with.
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// The limit that elapsed: the connect timeout while connecting,
    /// otherwise the per-request or session-wide bound.
    fn timeout_bound(&self, connecting: bool, requested: Option<Duration>) -> Duration {
        if connecting {
            self.connect_timeout
        } else {
            requested.unwrap_or(self.total_timeout)
        }
    }

    fn map_error(&self, error: reqwest::Error, timeout: Option<Duration>) -> OpError {
        if error.is_timeout() {
            OpError::Timeout(self.timeout_bound(error.is_connect(), timeout))
        } else {
            OpError::Connection(error.to_string())
        }
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, timeout: Option<Duration>) -> impl Future<Output = OpResult<u16>> + Send {
        let mut request = self.inner.get(url);
        if let Some(limit) = timeout {
            request = request.timeout(limit);
        }

        async move {
            let response = request.send().await.map_err(|e| self.map_error(e, timeout))?;
            Ok(response.status().as_u16())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_from_default_config() {
        assert!(ReqwestClient::from_config(&HttpClientConfig::default()).is_ok());
    }

    #[test]
    fn test_timeout_bound_names_the_elapsed_limit() {
        let client = ReqwestClient::from_config(&HttpClientConfig::default()).unwrap();

        assert_eq!(client.timeout_bound(true, Some(Duration::from_secs(5))), Duration::from_secs(1));
        assert_eq!(client.timeout_bound(false, Some(Duration::from_secs(5))), Duration::from_secs(5));
        assert_eq!(client.timeout_bound(false, None), Duration::from_secs(10));

        let wrapped = ReqwestClient::with_client(reqwest::Client::new(), Duration::from_secs(4));
        assert_eq!(wrapped.timeout_bound(true, None), Duration::from_secs(4));
        let wrapped = wrapped.with_connect_timeout(Duration::from_millis(250));
        assert_eq!(wrapped.timeout_bound(true, None), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_unsupported_scheme_is_connection_error() {
        let client = ReqwestClient::from_config(&HttpClientConfig::default()).unwrap();
        let result = client.get("python://bad", None).await;
        assert!(matches!(result, Err(OpError::Connection(_))));
    }

    #[tokio::test]
    async fn test_refused_connection() {
        let client = ReqwestClient::from_config(&HttpClientConfig::default()).unwrap();
        // Port 9 (discard) is not listening on test hosts.
        let result = client.get("http://127.0.0.1:9/", Some(Duration::from_secs(2))).await;
        assert!(result.is_err());
    }
}
