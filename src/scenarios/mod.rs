//! Demo scenarios driven by the CLI.
//!
//! # Data Flow
//! ```text
//! CLI subcommand
//!     → basics.rs (delays, cancellation, wait_for, shield, manual futures)
//!     → requests.rs (gather, first exception, drain, as_completed over HTTP)
//!     → report structs printed by the binary
//! ```

pub mod basics;
pub mod requests;
