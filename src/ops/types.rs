//! Operation identity, outcome and error definitions.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

/// Unique identity of a scheduled operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationId(pub Uuid);

impl OperationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur while running or observing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpError {
    /// A waiting or requesting bound elapsed.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Transport-level failure (refused connection, unsupported scheme, ...).
    #[error("connection error: {0}")]
    Connection(String),

    /// The operation unwound because it was explicitly cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// A future cell was resolved more than once.
    #[error("future already resolved")]
    DoubleResolution,

    /// Every resolver was dropped before a value was produced.
    #[error("future abandoned before resolution")]
    Abandoned,

    /// The operation body panicked.
    #[error("operation panicked: {0}")]
    Panicked(String),
}

impl OpError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, OpError::Timeout(_))
    }
}

/// Result type for operations.
pub type OpResult<T> = Result<T, OpError>;

/// Terminal state of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Completed(T),
    Failed(OpError),
    Cancelled,
}

impl<T> Outcome<T> {
    /// Classify the result of an operation body.
    pub fn from_result(result: OpResult<T>) -> Self {
        match result {
            Ok(value) => Outcome::Completed(value),
            Err(OpError::Cancelled) => Outcome::Cancelled,
            Err(e) => Outcome::Failed(e),
        }
    }

    pub fn into_result(self) -> OpResult<T> {
        match self {
            Outcome::Completed(value) => Ok(value),
            Outcome::Failed(e) => Err(e),
            Outcome::Cancelled => Err(OpError::Cancelled),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Completed(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&OpError> {
        match self {
            Outcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    /// Short tag used for log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Completed(_) => "completed",
            Outcome::Failed(_) => "failed",
            Outcome::Cancelled => "cancelled",
        }
    }
}
