//! Error type shared by every simulation entry point.
//!
//! All errors are raised before the first slice of a run is emitted, so a
//! failed run never leaves a partial trace behind.

use thiserror::Error;

/// Simulation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The caller supplied input the engine cannot schedule
    /// (negative burst, non-positive quantum, invalid queue level, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested policy is not known to the engine.
    #[error("Unsupported policy: {0}")]
    Unsupported(String),
}

impl SimError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SimError>;
