//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Honour `RUST_LOG` first, then the configured level
//!
//! # Design Decisions
//! - JSON output for machine parsing, pretty output for terminals
//! - `try_init` so tests and repeated setup do not panic

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install the global subscriber described by `config`.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_logging(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aio_labs={}", config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        let config = ObservabilityConfig::default();
        let _ = init_logging(&config);
        assert!(!init_logging(&config));
    }
}
