//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Caller waiting on an operation:
//!     → timeouts.rs (wait_for: deadline, then cancel the operation)
//!     → shield.rs   (shield: deadline, operation keeps running)
//! ```
//!
//! # Design Decisions
//! - Every wait can carry a deadline
//! - Whether a deadline cancels is part of the function's contract, never implicit

pub mod shield;
pub mod timeouts;

pub use shield::shield;
pub use timeouts::{wait_for, with_timeout};
