//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files, and
//! every section falls back to its defaults so a minimal file is valid.

use serde::{Deserialize, Serialize};

/// Root configuration for the toolkit and its demo runner.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Shared HTTP client settings.
    pub http: HttpClientConfig,

    /// Sliding-window draining settings.
    pub drain: DrainConfig,

    /// Demo scenario settings.
    pub demo: DemoConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Total time allowed for one request, in seconds.
    pub total_timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// User agent sent with every request.
    pub user_agent: String,

    /// Idle connections kept per host.
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            total_timeout_secs: 10,
            connect_timeout_secs: 1,
            user_agent: concat!("aio-labs/", env!("CARGO_PKG_VERSION")).to_string(),
            pool_max_idle_per_host: 32,
        }
    }
}

/// Sliding-window draining configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DrainConfig {
    /// Maximum operations in flight at once.
    pub window: usize,
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self { window: 3 }
    }
}

/// Demo scenario configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    /// URL fetched by the request scenarios.
    pub target_url: String,

    /// Number of requests issued by the gather scenario.
    pub request_count: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            target_url: "https://www.example.com".to_string(),
            request_count: 1000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of pretty output.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
