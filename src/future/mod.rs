//! Manually resolved futures.
//!
//! # Data Flow
//! ```text
//! ManualFuture::new()
//!     → (ManualFuture, Resolver)
//!     → Resolver moved into a producer task
//!     → producer calls resolve(value) exactly once
//!     → every ManualFuture clone waiting on wait() wakes with the value
//! ```
//!
//! # Design Decisions
//! - Consumers and producers share the slot; it is freed when both sides drop
//! - A second resolve is reported as `OpError::DoubleResolution`, never ignored
//! - Operation handles use the same cell to publish their terminal outcome

pub mod cell;
pub mod producer;

pub use cell::{ManualFuture, Resolver};
pub use producer::resolve_after;
