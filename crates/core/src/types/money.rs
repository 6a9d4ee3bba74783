//! Type-safe monetary amounts using decimal arithmetic.
//!
//! A [`Money`] binds an amount to its currency. Amounts in different
//! currencies cannot be combined without an explicit conversion.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::CurrencyError;
use crate::format::format_with_locale;
use crate::rates::ExchangeRateTable;
use crate::types::CurrencyCode;

/// An amount of money in a specific currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., kronor, not öre).
    amount: Decimal,
    /// ISO 4217 currency code.
    currency: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Zero in the given currency.
    #[must_use]
    pub const fn zero(currency: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Create an amount from minor units (öre, cents).
    #[must_use]
    pub fn from_minor(minor: i64, currency: CurrencyCode) -> Self {
        Self::new(Decimal::new(minor, 2), currency)
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Convert into another currency using `rates`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurrency` if either currency has no rate, and
    /// `Overflow` if the result does not fit.
    pub fn convert_to(self, to: CurrencyCode, rates: &ExchangeRateTable) -> Result<Self, CurrencyError> {
        Ok(Self::new(rates.convert(self.amount, self.currency, to)?, to))
    }

    /// Add another amount in the same currency.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMismatch` if the currencies differ, and `Overflow`
    /// if the sum does not fit.
    pub fn checked_add(self, other: Self) -> Result<Self, CurrencyError> {
        self.ensure_same_currency(other)?;
        let sum = self
            .amount
            .checked_add(other.amount)
            .ok_or(CurrencyError::Overflow("addition"))?;
        Ok(Self::new(sum, self.currency))
    }

    /// Subtract another amount in the same currency.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMismatch` if the currencies differ, and `Overflow`
    /// if the difference does not fit.
    pub fn checked_sub(self, other: Self) -> Result<Self, CurrencyError> {
        self.ensure_same_currency(other)?;
        let difference = self
            .amount
            .checked_sub(other.amount)
            .ok_or(CurrencyError::Overflow("subtraction"))?;
        Ok(Self::new(difference, self.currency))
    }

    /// Multiply by a quantity.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the product does not fit.
    pub fn times(self, quantity: u32) -> Result<Self, CurrencyError> {
        let product = self
            .amount
            .checked_mul(Decimal::from(quantity))
            .ok_or(CurrencyError::Overflow("quantity multiplication"))?;
        Ok(Self::new(product, self.currency))
    }

    /// Reduce by a percentage (`20` means 20% off), rounded to two decimals.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the discounted amount does not fit.
    pub fn discounted(self, percentage: Decimal) -> Result<Self, CurrencyError> {
        let discounted = Decimal::ONE_HUNDRED
            .checked_sub(percentage)
            .and_then(|remaining| remaining.checked_div(Decimal::ONE_HUNDRED))
            .and_then(|factor| self.amount.checked_mul(factor))
            .ok_or(CurrencyError::Overflow("discount"))?;
        Ok(Self::new(
            discounted.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            self.currency,
        ))
    }

    fn ensure_same_currency(self, other: Self) -> Result<(), CurrencyError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(CurrencyError::CurrencyMismatch {
                expected: self.currency,
                found: other.currency,
            })
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_with_locale(self.amount, self.currency))
    }
}
