//! Operations subsystem.
//!
//! # Data Flow
//! ```text
//! Scope::spawn(label, future)
//!     → handle.rs (driver task + CancellationToken)
//!     → future body runs (delay.rs, http::fetch, caller code)
//!     → timer.rs (start/end events around the body)
//!     → terminal Outcome published through a ManualFuture
//!     → observed by wait::*, resilience::*, or handle.wait()
//! ```
//!
//! # Design Decisions
//! - No implicit global loop: every operation is created from an explicit Scope
//! - Outcomes are tagged (`Completed` / `Failed` / `Cancelled`), never re-raised
//! - Observing an operation never cancels it; only `cancel()` does

pub mod delay;
pub mod handle;
pub mod scope;
pub mod timer;
pub mod types;

pub use delay::delay;
pub use handle::Operation;
pub use scope::Scope;
pub use timer::{timed, Timer, TimingSink};
pub use types::{OpError, OpResult, OperationId, Outcome};
