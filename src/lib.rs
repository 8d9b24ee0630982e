//! Async Concurrency Orchestration Toolkit

pub mod config;
pub mod future;
pub mod http;
pub mod observability;
pub mod ops;
pub mod resilience;
pub mod scenarios;
pub mod wait;

pub use config::schema::ToolkitConfig;
pub use ops::{OpError, OpResult, Operation, Outcome, Scope};
