//! Locale-aware currency formatting.
//!
//! Each currency renders in its display locale (`SEK` in `sv-SE`, `USD` in
//! `en-US`) with two fraction digits, following the locale's grouping,
//! decimal separator, minus sign and symbol placement:
//!
//! | Locale  | Example          |
//! |---------|------------------|
//! | `en-US` | `$1,234.50`      |
//! | `sv-SE` | `1 234,50 kr`    |
//!
//! `sv-SE` separates groups and the trailing symbol with U+00A0 and uses
//! U+2212 for the minus sign.
//!
//! When the locale registry cannot format a locale/currency pair, output
//! falls back to `"<amount> <symbol>"` with `en-US` grouping. The fallback
//! is only reachable through a [`CurrencyCatalog`](crate::CurrencyCatalog)
//! that names a locale this module does not know.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::error::CurrencyError;
use crate::metadata::currency_symbol;
use crate::rates;
use crate::types::CurrencyCode;

/// Fraction digits used for display prices.
pub const DISPLAY_FRACTION_DIGITS: u32 = 2;

/// Locale used by the legacy whole-unit formatter.
pub const LEGACY_LOCALE: &str = "sv-SE";

const NBSP: &str = "\u{a0}";

/// The locale registry cannot format this locale/currency pair.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("formatting unavailable for {currency} in locale {locale}")]
pub struct FormattingUnavailable {
    /// Requested locale tag.
    pub locale: String,
    /// Requested currency.
    pub currency: CurrencyCode,
}

/// Number and symbol conventions for one locale.
#[derive(Debug, Clone, Copy)]
struct LocaleConventions {
    group: &'static str,
    decimal: &'static str,
    minus: &'static str,
    symbol_after: bool,
}

const EN_US: LocaleConventions = LocaleConventions {
    group: ",",
    decimal: ".",
    minus: "-",
    symbol_after: false,
};

const SV_SE: LocaleConventions = LocaleConventions {
    group: NBSP,
    decimal: ",",
    minus: "\u{2212}",
    symbol_after: true,
};

fn conventions(locale: &str) -> Option<LocaleConventions> {
    match locale {
        "en-US" => Some(EN_US),
        "sv-SE" => Some(SV_SE),
        _ => None,
    }
}

/// Symbol a locale uses for a currency.
fn locale_symbol(locale: &str, currency: CurrencyCode) -> Option<&'static str> {
    match (locale, currency) {
        ("en-US", CurrencyCode::USD) => Some("$"),
        ("en-US", CurrencyCode::SEK) => Some("SEK"),
        ("sv-SE", CurrencyCode::SEK) => Some("kr"),
        ("sv-SE", CurrencyCode::USD) => Some("US$"),
        _ => None,
    }
}

/// Display locale for a currency.
#[must_use]
pub const fn display_locale(currency: CurrencyCode) -> &'static str {
    match currency {
        CurrencyCode::SEK => "sv-SE",
        CurrencyCode::USD => "en-US",
    }
}

/// Format `amount` in `currency` using a specific locale's conventions.
///
/// # Errors
///
/// Returns [`FormattingUnavailable`] if the locale is unknown or has no
/// symbol for the currency.
pub fn format_in_locale(
    amount: Decimal,
    currency: CurrencyCode,
    locale: &str,
    fraction_digits: u32,
) -> Result<String, FormattingUnavailable> {
    let unavailable = || FormattingUnavailable {
        locale: locale.to_owned(),
        currency,
    };
    let conv = conventions(locale).ok_or_else(unavailable)?;
    let symbol = locale_symbol(locale, currency).ok_or_else(unavailable)?;

    let (negative, digits) = render_number(amount, fraction_digits, conv.group, conv.decimal);
    let sign = if negative { conv.minus } else { "" };

    Ok(if conv.symbol_after {
        format!("{sign}{digits}{NBSP}{symbol}")
    } else if symbol.chars().all(char::is_alphabetic) {
        format!("{sign}{symbol}{NBSP}{digits}")
    } else {
        format!("{sign}{symbol}{digits}")
    })
}

/// Format `amount` in a locale, falling back to `"<amount> <symbol>"`.
///
/// Never fails. The fallback keeps two fraction digits and `en-US` grouping.
#[must_use]
pub fn format_or_fallback(amount: Decimal, currency: CurrencyCode, locale: &str, symbol: &str) -> String {
    format_in_locale(amount, currency, locale, DISPLAY_FRACTION_DIGITS).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "locale formatting unavailable, using fallback");
        fallback_format(amount, symbol)
    })
}

/// Fallback rendering: grouped amount followed by the symbol.
#[must_use]
pub fn fallback_format(amount: Decimal, symbol: &str) -> String {
    let (negative, digits) = render_number(amount, DISPLAY_FRACTION_DIGITS, EN_US.group, EN_US.decimal);
    let sign = if negative { EN_US.minus } else { "" };
    format!("{sign}{digits} {symbol}")
}

/// Format `amount` in `currency` using the currency's display locale.
///
/// Always renders exactly two fraction digits.
#[must_use]
pub fn format_with_locale(amount: Decimal, currency: CurrencyCode) -> String {
    format_or_fallback(amount, currency, display_locale(currency), currency_symbol(currency))
}

/// Legacy formatter: `sv-SE` conventions with no fraction digits, whatever
/// the currency.
///
/// `9.5 USD` renders as `10 US$`, which disagrees with
/// [`format_with_locale`]'s `$9.50`.
#[deprecated(note = "rounds to whole units in sv-SE for every currency; use `format_with_locale`")]
#[must_use]
pub fn format_currency(amount: Decimal, currency: CurrencyCode) -> String {
    format_in_locale(amount, currency, LEGACY_LOCALE, 0)
        .unwrap_or_else(|_| fallback_format(amount, currency_symbol(currency)))
}

/// Convert a product price into the display currency and format it there.
///
/// This is the entry point price rendering should use.
///
/// # Errors
///
/// Returns `InvalidCurrency` if either currency has no rate, and
/// `Overflow` for amounts too large to convert.
pub fn format_price(
    price: Decimal,
    product_currency: CurrencyCode,
    display_currency: CurrencyCode,
) -> Result<String, CurrencyError> {
    let converted = rates::convert(price, product_currency, display_currency)?;
    Ok(format_with_locale(converted, display_currency))
}

/// Round and render the absolute value of `amount` with grouping.
///
/// Returns whether the rounded value is negative alongside the digits.
fn render_number(amount: Decimal, fraction_digits: u32, group: &str, decimal: &str) -> (bool, String) {
    let rounded = amount.round_dp_with_strategy(fraction_digits, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let text = format!("{:.prec$}", rounded.abs(), prec = fraction_digits as usize);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let grouped = group_thousands(int_part, group);
    let digits = if frac_part.is_empty() {
        grouped
    } else {
        format!("{grouped}{decimal}{frac_part}")
    };

    (negative, digits)
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + (len / 3) * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn fraction_digits(formatted: &str, decimal: char) -> usize {
        formatted
            .rsplit_once(decimal)
            .map(|(_, tail)| tail.chars().take_while(char::is_ascii_digit).count())
            .unwrap_or(0)
    }

    #[test]
    fn test_usd_in_en_us() {
        assert_eq!(format_with_locale(dec!(1234.5), CurrencyCode::USD), "$1,234.50");
        assert_eq!(format_with_locale(dec!(9.5), CurrencyCode::USD), "$9.50");
        assert_eq!(format_with_locale(dec!(0), CurrencyCode::USD), "$0.00");
    }

    #[test]
    fn test_sek_in_sv_se() {
        assert_eq!(format_with_locale(dec!(1234.5), CurrencyCode::SEK), "1\u{a0}234,50\u{a0}kr");
        assert_eq!(format_with_locale(dec!(100), CurrencyCode::SEK), "100,00\u{a0}kr");
    }

    #[test]
    fn test_large_amount_grouping() {
        assert_eq!(format_with_locale(dec!(1234567.891), CurrencyCode::USD), "$1,234,567.89");
        assert_eq!(
            format_with_locale(dec!(1234567), CurrencyCode::SEK),
            "1\u{a0}234\u{a0}567,00\u{a0}kr"
        );
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(format_with_locale(dec!(-5.5), CurrencyCode::USD), "-$5.50");
        assert_eq!(format_with_locale(dec!(-5.5), CurrencyCode::SEK), "\u{2212}5,50\u{a0}kr");
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(format_with_locale(dec!(2.345), CurrencyCode::USD), "$2.35");
        assert_eq!(format_with_locale(dec!(-2.345), CurrencyCode::USD), "-$2.35");
    }

    #[test]
    fn test_always_two_fraction_digits() {
        for amount in [dec!(0), dec!(1), dec!(1.5), dec!(19.999), dec!(349), dec!(1000000.1)] {
            let usd = format_with_locale(amount, CurrencyCode::USD);
            assert_eq!(fraction_digits(&usd, '.'), 2, "{usd}");
            let sek = format_with_locale(amount, CurrencyCode::SEK);
            assert_eq!(fraction_digits(&sek, ','), 2, "{sek}");
        }
    }

    #[test]
    fn test_sek_in_en_us_uses_code_prefix() {
        assert_eq!(
            format_in_locale(dec!(10), CurrencyCode::SEK, "en-US", 2).unwrap(),
            "SEK\u{a0}10.00"
        );
    }

    #[test]
    fn test_unknown_locale_is_unavailable() {
        let err = format_in_locale(dec!(1), CurrencyCode::SEK, "xx-XX", 2).unwrap_err();
        assert_eq!(err.locale, "xx-XX");
        assert_eq!(err.currency, CurrencyCode::SEK);
    }

    #[test]
    fn test_fallback_for_unknown_locale() {
        assert_eq!(format_or_fallback(dec!(1234.5), CurrencyCode::SEK, "fi-FI", "kr"), "1,234.50 kr");
    }

    #[test]
    #[allow(deprecated)]
    fn test_legacy_formatter_drops_fraction_digits() {
        assert_eq!(format_currency(dec!(1234.5), CurrencyCode::SEK), "1\u{a0}235\u{a0}kr");
        assert_eq!(format_currency(dec!(9.5), CurrencyCode::USD), "10\u{a0}US$");
    }

    #[test]
    fn test_format_price_converts_then_formats() {
        assert_eq!(format_price(dec!(100), CurrencyCode::SEK, CurrencyCode::USD).unwrap(), "$9.50");
        assert_eq!(
            format_price(dec!(9.5), CurrencyCode::USD, CurrencyCode::SEK).unwrap(),
            "100,00\u{a0}kr"
        );
        assert_eq!(
            format_price(dec!(349), CurrencyCode::SEK, CurrencyCode::SEK).unwrap(),
            "349,00\u{a0}kr"
        );
    }
}
