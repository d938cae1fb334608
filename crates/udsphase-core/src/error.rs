//! Error types for udsphase-core
//!
//! The arithmetic functions never panic on out-of-domain input. Arguments
//! that would divide by zero or wrap an unsigned subtraction are rejected
//! with [`UdsError::InvalidArgument`], and products that do not fit the
//! modeled register width are reported as [`UdsError::Overflow`].

use thiserror::Error;

/// Errors that can occur in the scaler arithmetic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UdsError {
    /// Argument outside the domain of the formula
    #[error("invalid argument {name} = {value}: {reason}")]
    InvalidArgument {
        name: &'static str,
        value: u64,
        reason: &'static str,
    },

    /// Intermediate or result does not fit the modeled width
    #[error("arithmetic overflow in {operation}")]
    Overflow { operation: &'static str },
}

impl UdsError {
    pub(crate) fn invalid(name: &'static str, value: impl Into<u64>, reason: &'static str) -> Self {
        UdsError::InvalidArgument {
            name,
            value: value.into(),
            reason,
        }
    }

    pub(crate) fn overflow(operation: &'static str) -> Self {
        UdsError::Overflow { operation }
    }
}

/// Result type for scaler arithmetic
pub type UdsResult<T> = Result<T, UdsError>;

/// Narrow a 64-bit intermediate back to the 32-bit register width
pub(crate) fn narrow(value: u64, operation: &'static str) -> UdsResult<u32> {
    u32::try_from(value).map_err(|_| UdsError::overflow(operation))
}
