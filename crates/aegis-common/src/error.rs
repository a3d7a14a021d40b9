//! Error types for the Aegis call layer
//!
//! Infrastructure failures are explicit errors that propagate to the caller;
//! domain-level rejections (unknown ship, bad payment) are not errors at all;
//! handlers recover them locally into an empty reply.

use thiserror::Error;

/// Result type alias using CallError
pub type CallResult<T> = std::result::Result<T, CallError>;

/// Failures of the call infrastructure itself.
///
/// Each variant is fatal to the call (or bind attempt) it occurred in,
/// never to the session that issued it.
#[derive(Debug, Error)]
pub enum CallError {
    /// Dispatch was attempted on a name with no registered handler.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// The decoded argument tuple did not match the handler's expectation.
    /// No partial decoding or best-effort coercion is attempted.
    #[error("malformed arguments: {0}")]
    MalformedArguments(String),

    /// Session construction failed (resource exhaustion). Propagated to the
    /// connection layer; fatal to the bind attempt only.
    #[error("bind failure: {0}")]
    BindFailure(String),

    /// The contract store reported an infrastructure failure.
    #[error("storage error: {0}")]
    Storage(String),
}
