//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, window > 0)
//! - Validate addresses and URLs the runtime will use
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: ToolkitConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ToolkitConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("http.connect_timeout_secs ({connect}) exceeds http.total_timeout_secs ({total})")]
    ConnectExceedsTotal { connect: u64, total: u64 },

    #[error("demo.target_url '{0}' is not an http(s) URL")]
    InvalidUrl(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidAddress(String),
}

/// Check `config` and collect every problem found.
pub fn validate_config(config: &ToolkitConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.http.total_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "http.total_timeout_secs" });
    }
    if config.http.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "http.connect_timeout_secs" });
    }
    if config.http.connect_timeout_secs > config.http.total_timeout_secs {
        errors.push(ValidationError::ConnectExceedsTotal {
            connect: config.http.connect_timeout_secs,
            total: config.http.total_timeout_secs,
        });
    }
    if config.drain.window == 0 {
        errors.push(ValidationError::Zero { field: "drain.window" });
    }

    match url::Url::parse(&config.demo.target_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidUrl(config.demo.target_url.clone())),
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
