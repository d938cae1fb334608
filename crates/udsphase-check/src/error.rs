//! Error types for udsphase-check

use thiserror::Error;

/// Errors that can occur while configuring or reporting a check run
///
/// Arithmetic failures found during a sweep are not errors; they are
/// recorded as [`crate::Finding`]s.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Core arithmetic error outside a sweep
    #[error("arithmetic error: {0}")]
    Uds(#[from] udsphase_core::UdsError),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration or report (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for check operations
pub type CheckResult<T> = Result<T, CheckError>;
