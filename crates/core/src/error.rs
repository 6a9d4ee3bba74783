//! Errors raised by the currency subsystem.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::CurrencyCode;

/// Errors that can occur when looking up, converting or loading currencies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// The code is not part of the supported currency set, or a table has
    /// no entry for it.
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    /// Two amounts in different currencies were combined without conversion.
    #[error("Currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// Currency of the left-hand amount.
        expected: CurrencyCode,
        /// Currency of the right-hand amount.
        found: CurrencyCode,
    },

    /// A rate table entry violates the rate invariants.
    #[error("Invalid rate for {code}: {rate}")]
    InvalidRate {
        /// Currency whose rate is invalid.
        code: CurrencyCode,
        /// Offending rate.
        rate: Decimal,
    },

    /// A currency catalog document is malformed or incomplete.
    #[error("Invalid currency catalog: {0}")]
    InvalidCatalog(String),

    /// An amount is too large for decimal arithmetic.
    #[error("Amount out of range in {0}")]
    Overflow(&'static str),
}
