//! Wait-group subsystem.
//!
//! # Data Flow
//! ```text
//! Vec<Operation<T>>
//!     → policy.rs (wait: AllCompleted / FirstCompleted / FirstException)
//!     → partition.rs (done / pending split, BatchSummary)
//!
//! Vec<Operation<T>> + overall timeout
//!     → as_completed.rs (completion-order pulls, Timeout for stragglers)
//!
//! backlog of jobs + window K
//!     → window.rs (repeated FirstCompleted rounds, ≤ K in flight)
//! ```
//!
//! # Design Decisions
//! - Policies observe; cancelling leftovers is always the caller's call
//! - Simultaneous completions land in one `done` batch, unordered
//! - Failures are classified, never swallowed or re-raised

pub mod as_completed;
pub mod partition;
pub mod policy;
pub mod window;

pub use as_completed::{as_completed, AsCompleted};
pub use partition::{BatchSummary, Partition};
pub use policy::{gather, wait, wait_all, ReturnWhen};
pub use window::{drain_windowed, DrainReport};
