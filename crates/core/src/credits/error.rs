//! Ledger error types.

use thiserror::Error;

/// Errors raised by ledger input validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CreditError {
    /// A grant must add a positive number of credits.
    #[error("grant amount must be positive, got {0}")]
    NonPositiveGrant(i64),

    /// A balance can only be set to a non-negative value.
    #[error("balance cannot be set to a negative value, got {0}")]
    NegativeBalance(i64),
}
