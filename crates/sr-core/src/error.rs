//! Foundational error type.
//!
//! Sub-crates define their own error enums (`SpatialError`, `RiskError`,
//! `SessionError`) and wrap `CoreError` where they surface configuration
//! problems.

use thiserror::Error;

/// Errors produced by `sr-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `sr-core`.
pub type CoreResult<T> = Result<T, CoreError>;
