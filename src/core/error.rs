//! ClipForge Error Definitions
//!
//! Errors raised at the crate's request surface. Stage-scoped pipeline errors
//! live in [`crate::core::pipeline`].

use thiserror::Error;

/// Request-surface error types
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Requested duration {0}s outside allowed range [{1}s, {2}s]")]
    DurationOutOfRange(f64, f64, f64),

    #[error("Requested start must be non-negative, got {0}s")]
    NegativeStart(f64),
}

/// Request-surface result type
pub type CoreResult<T> = Result<T, CoreError>;
