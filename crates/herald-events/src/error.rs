//! Event bus error types.

use thiserror::Error;

/// Errors returned synchronously by bus operations.
///
/// The dispatcher never produces errors: a delivery dropped because a sink
/// is full is an expected outcome, not a failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// A caller-supplied argument was unusable (closed sink, blank id or blank pattern).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The pattern has neither a `*` wildcard nor a `.` separator.
    #[error("invalid pattern {pattern:?}: expected `source.type`, `source.*`, `*.type` or `*`")]
    InvalidPattern {
        /// The rejected pattern, as supplied.
        pattern: String,
    },

    /// The internal queue is at capacity (only returned by non-blocking publish).
    #[error("event queue is full")]
    QueueFull,

    /// The bus configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for event bus operations.
pub type BusResult<T> = Result<T, BusError>;
