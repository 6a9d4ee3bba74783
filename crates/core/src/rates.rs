//! Exchange rate table and conversion math.
//!
//! Rates are expressed against [`CurrencyCode::BASE`]: the entry for a
//! currency is how many units of it one unit of the base currency buys
//! (`SEK = 1`, `USD = 0.095`). Conversion goes through the base currency.
//!
//! The built-in rates are static. They go stale and must be refreshed by
//! shipping a new catalog; nothing here fetches rates at call time.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CurrencyError;
use crate::types::CurrencyCode;

/// Fractional digits kept by a conversion.
pub const CONVERSION_SCALE: u32 = 2;

/// Built-in rate for each supported currency.
#[must_use]
pub fn builtin_rate(code: CurrencyCode) -> Decimal {
    match code {
        CurrencyCode::SEK => Decimal::ONE,
        // 1 SEK = 0.095 USD (approximately)
        CurrencyCode::USD => Decimal::new(95, 3),
    }
}

static BUILTIN: LazyLock<ExchangeRateTable> = LazyLock::new(ExchangeRateTable::builtin);

/// Mapping from currency to its rate against the base currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRateTable {
    rates: HashMap<CurrencyCode, Decimal>,
}

impl ExchangeRateTable {
    /// Table with the compiled-in rates.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            rates: CurrencyCode::ALL
                .into_iter()
                .map(|code| (code, builtin_rate(code)))
                .collect(),
        }
    }

    /// Build a table from untrusted rates.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRate` if any rate is not strictly positive or the
    /// base currency's rate is not exactly 1, and `InvalidCurrency` if a
    /// supported currency has no rate.
    pub fn from_rates(
        rates: impl IntoIterator<Item = (CurrencyCode, Decimal)>,
    ) -> Result<Self, CurrencyError> {
        let rates: HashMap<CurrencyCode, Decimal> = rates.into_iter().collect();

        for code in CurrencyCode::ALL {
            let rate = *rates
                .get(&code)
                .ok_or_else(|| CurrencyError::InvalidCurrency(code.to_string()))?;

            if rate <= Decimal::ZERO || (code.is_base() && rate != Decimal::ONE) {
                return Err(CurrencyError::InvalidRate { code, rate });
            }
        }

        Ok(Self { rates })
    }

    /// Look up the rate for a currency.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurrency` when the table has no entry for `code`.
    pub fn rate(&self, code: CurrencyCode) -> Result<Decimal, CurrencyError> {
        self.rates
            .get(&code)
            .copied()
            .ok_or_else(|| CurrencyError::InvalidCurrency(code.to_string()))
    }

    /// Convert `amount` from one currency to another.
    ///
    /// Same-currency conversion returns `amount` untouched. Otherwise the
    /// amount is divided by the source rate, multiplied by the target rate
    /// and rounded to two decimals, midpoint away from zero.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurrency` if either currency has no rate, and
    /// `Overflow` if the converted amount does not fit in a `Decimal`.
    pub fn convert(
        &self,
        amount: Decimal,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<Decimal, CurrencyError> {
        if from == to {
            return Ok(amount);
        }

        let (from_rate, to_rate) = (self.rate(from)?, self.rate(to)?);
        let converted = amount
            .checked_div(from_rate)
            .and_then(|in_base| in_base.checked_mul(to_rate))
            .ok_or(CurrencyError::Overflow("currency conversion"))?;

        Ok(converted.round_dp_with_strategy(CONVERSION_SCALE, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Iterate over `(currency, rate)` pairs in switcher order.
    pub fn iter(&self) -> impl Iterator<Item = (CurrencyCode, Decimal)> + '_ {
        CurrencyCode::ALL
            .into_iter()
            .filter_map(|code| self.rates.get(&code).map(|rate| (code, *rate)))
    }
}

impl Default for ExchangeRateTable {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

/// Convert `amount` using the built-in rate table.
///
/// # Errors
///
/// Returns `InvalidCurrency` if either currency has no rate, and `Overflow`
/// for amounts too large to convert.
pub fn convert(amount: Decimal, from: CurrencyCode, to: CurrencyCode) -> Result<Decimal, CurrencyError> {
    BUILTIN.convert(amount, from, to)
}

/// Convert an amount given as a string with currency codes given as strings.
///
/// Used at boundaries (CLI arguments, persisted values) where codes have not
/// been validated yet.
///
/// # Errors
///
/// Returns `InvalidCurrency` for an unknown code or an unparseable amount.
pub fn convert_str(amount: &str, from: &str, to: &str) -> Result<Decimal, CurrencyError> {
    let amount = Decimal::from_str(amount.trim())
        .map_err(|e| CurrencyError::InvalidCurrency(format!("{amount}: {e}")))?;
    convert(amount, from.parse()?, to.parse()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_same_currency_is_exact_passthrough() {
        for code in CurrencyCode::ALL {
            let amount = dec!(12.3456789);
            assert_eq!(convert(amount, code, code).unwrap(), amount);
        }
    }

    #[test]
    fn test_sek_to_usd() {
        assert_eq!(convert(dec!(100), CurrencyCode::SEK, CurrencyCode::USD).unwrap(), dec!(9.5));
    }

    #[test]
    fn test_usd_to_sek() {
        assert_eq!(convert(dec!(9.5), CurrencyCode::USD, CurrencyCode::SEK).unwrap(), dec!(100));
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        // 123.45 * 0.095 = 11.72775
        assert_eq!(
            convert(dec!(123.45), CurrencyCode::SEK, CurrencyCode::USD).unwrap(),
            dec!(11.73)
        );
    }

    #[test]
    fn test_overflow_is_an_error() {
        let err = convert(Decimal::MAX, CurrencyCode::USD, CurrencyCode::SEK).unwrap_err();
        assert_eq!(err, CurrencyError::Overflow("currency conversion"));

        let err = convert_str("79228162514264337593543950335", "USD", "SEK").unwrap_err();
        assert!(matches!(err, CurrencyError::Overflow(_)));

        // Shrinking conversions of the largest amount still succeed.
        assert!(convert(Decimal::MAX, CurrencyCode::SEK, CurrencyCode::USD).is_ok());
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        // 0.5 * 0.095 = 0.0475
        assert_eq!(convert(dec!(0.5), CurrencyCode::SEK, CurrencyCode::USD).unwrap(), dec!(0.05));
        let table = ExchangeRateTable::from_rates([
            (CurrencyCode::SEK, Decimal::ONE),
            (CurrencyCode::USD, dec!(0.1)),
        ])
        .unwrap();
        // 0.25 * 0.1 = 0.025 -> 0.03, -0.25 * 0.1 = -0.025 -> -0.03
        assert_eq!(table.convert(dec!(0.25), CurrencyCode::SEK, CurrencyCode::USD).unwrap(), dec!(0.03));
        assert_eq!(table.convert(dec!(-0.25), CurrencyCode::SEK, CurrencyCode::USD).unwrap(), dec!(-0.03));
    }

    #[test]
    fn test_round_trip_within_rounding_error() {
        for amount in [dec!(0), dec!(1), dec!(19.99), dec!(349), dec!(1234.56), dec!(99999.99)] {
            for (a, b) in [
                (CurrencyCode::SEK, CurrencyCode::USD),
                (CurrencyCode::USD, CurrencyCode::SEK),
            ] {
                let there = convert(amount, a, b).unwrap();
                let back = convert(there, b, a).unwrap();
                // One cent of error in the intermediate currency scales by the rate ratio.
                let tolerance = dec!(0.01) * (builtin_rate(a) / builtin_rate(b)).max(Decimal::ONE);
                assert!((back - amount).abs() <= tolerance, "{amount} {a}->{b}->{a} gave {back}");
            }
        }
    }

    #[test]
    fn test_from_rates_rejects_non_positive() {
        let err = ExchangeRateTable::from_rates([
            (CurrencyCode::SEK, Decimal::ONE),
            (CurrencyCode::USD, Decimal::ZERO),
        ])
        .unwrap_err();
        assert!(matches!(err, CurrencyError::InvalidRate { code: CurrencyCode::USD, .. }));
    }

    #[test]
    fn test_from_rates_requires_unit_base() {
        let err = ExchangeRateTable::from_rates([
            (CurrencyCode::SEK, dec!(2)),
            (CurrencyCode::USD, dec!(0.095)),
        ])
        .unwrap_err();
        assert!(matches!(err, CurrencyError::InvalidRate { code: CurrencyCode::SEK, .. }));
    }

    #[test]
    fn test_from_rates_requires_every_currency() {
        let err = ExchangeRateTable::from_rates([(CurrencyCode::SEK, Decimal::ONE)]).unwrap_err();
        assert_eq!(err, CurrencyError::InvalidCurrency("USD".to_string()));
    }

    #[test]
    fn test_convert_str_unknown_currency() {
        let err = convert_str("10", "SEK", "EUR").unwrap_err();
        assert_eq!(err, CurrencyError::InvalidCurrency("EUR".to_string()));
    }

    #[test]
    fn test_convert_str() {
        assert_eq!(convert_str(" 100 ", "SEK", "USD").unwrap(), dec!(9.5));
    }
}
