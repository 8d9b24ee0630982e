//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Operations, timers and wait policies produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (histograms, counters, gauges via metrics)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Operation IDs and labels ride along as log fields
//! - Metrics are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
