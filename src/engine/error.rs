//! Engine error types.
//!
//! The engine has a single failure mode: a settings update carrying a value
//! that is out of range. Every other operation is total.

use thiserror::Error;

/// Rejection of a settings update. The engine state is left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A duration was not a positive number of minutes.
    #[error("{field} must be a positive number of minutes (got {value})")]
    NonPositiveDuration {
        /// Name of the rejected field
        field: &'static str,
        /// Rejected value
        value: u32,
    },

    /// The number of focus sessions per long break was below 1.
    #[error("cycles must be at least 1 (got {0})")]
    InvalidCycles(u32),
}

impl ValidationError {
    /// Returns the name of the rejected field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::NonPositiveDuration { field, .. } => field,
            Self::InvalidCycles(_) => "cycles",
        }
    }
}
