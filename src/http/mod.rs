//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! Fetcher::spawn / fetch_status(url, options)
//!     → fetch.rs (URL check, artificial delay, request timeout)
//!     → client.rs (HttpClient trait; reqwest pool by default)
//!     → status code or OpError::{Timeout, Connection}
//! ```
//!
//! # Design Decisions
//! - The transport is consumed through a trait, never hard-wired
//! - Timeouts end the request, nothing else
//! - The caller decides whether a non-2xx status counts as a failure

pub mod client;
pub mod fetch;

pub use client::{HttpClient, ReqwestClient};
pub use fetch::{fetch_status, FetchOptions, Fetcher};
