use std::time::Duration;

use thiserror::Error;

/// A single field-level validation failure, shown inline next to its input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum FieldError {
    #[error("Amount must be a positive number with at most two decimals")]
    InvalidAmount,
    #[error("Amount plus fees exceeds the available balance")]
    InsufficientFunds,
    #[error("Amount exceeds the daily transfer limit")]
    LimitExceeded,
    #[error("A reference is required")]
    MissingReference,
    #[error("Reference is too long")]
    ReferenceTooLong,
    #[error("An execution date is required for scheduled transfers")]
    MissingDate,
    #[error("Execution date must use the YYYY-MM-DD format")]
    InvalidDate,
    #[error("Execution date lies in the past")]
    DateInPast,
    #[error("A frequency is required for recurring transfers")]
    MissingFrequency
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum SecurityError {
    #[error("Invalid security code")]
    InvalidSecurityCode,
    #[error("Security code entry is locked, retry in {retry_after:?}")]
    LockedOut {
        retry_after: Duration
    }
}
