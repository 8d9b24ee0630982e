//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ToolkitConfig (validated, immutable)
//!     → handed to the HTTP client, drain window and logging setup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{DemoConfig, DrainConfig, HttpClientConfig, ObservabilityConfig, ToolkitConfig};
pub use validation::ValidationError;
