//! Currency commands.
//!
//! # Usage
//!
//! ```bash
//! krona convert 100 --from SEK --to USD      # 9.50
//! krona format 1234.5 --currency SEK         # 1 234,50 kr
//! krona format 1234.5 --currency SEK --legacy
//! krona price 249 --currency SEK --display USD
//! krona currencies --lang sv
//! krona currency set USD
//! ```
//!
//! Conversion and formatting use the configured catalog
//! (`KRONA_CATALOG_PATH`) or the built-in tables.

use krona_core::{CurrencyCode, CurrencyError, Language};
use krona_storefront::{SelectionError, Storefront};
use rust_decimal::Decimal;

/// Print `amount` converted from one currency to another.
///
/// # Errors
///
/// Returns `InvalidCurrency` if either currency has no rate.
#[allow(clippy::print_stdout)]
pub fn convert(
    storefront: &Storefront,
    amount: Decimal,
    from: CurrencyCode,
    to: CurrencyCode,
) -> Result<(), CurrencyError> {
    let converted = storefront.catalog().convert(amount, from, to)?;
    println!("{converted}");
    Ok(())
}

/// Print `amount` formatted for its currency.
#[allow(clippy::print_stdout)]
pub fn format(storefront: &Storefront, amount: Decimal, currency: CurrencyCode, legacy: bool) {
    let text = if legacy {
        #[allow(deprecated)]
        krona_core::format_currency(amount, currency)
    } else {
        storefront.catalog().format_with_locale(amount, currency)
    };
    println!("{text}");
}

/// Print a product price in the display currency.
///
/// # Errors
///
/// Returns `InvalidCurrency` if either currency has no rate.
#[allow(clippy::print_stdout)]
pub fn price(
    storefront: &Storefront,
    amount: Decimal,
    currency: CurrencyCode,
    display: Option<CurrencyCode>,
) -> Result<(), CurrencyError> {
    let text = match display {
        Some(display) => storefront.catalog().format_price(amount, currency, display)?,
        None => storefront.format_price(amount, currency)?,
    };
    println!("{text}");
    Ok(())
}

/// Print the switcher entries as JSON.
///
/// # Errors
///
/// Returns an error if the entries cannot be serialized.
#[allow(clippy::print_stdout)]
pub fn list(storefront: &Storefront, lang: &str) -> Result<(), serde_json::Error> {
    let options = storefront.currency_options(Language::from_tag(lang));
    println!("{}", serde_json::to_string_pretty(&options)?);
    Ok(())
}

/// Print the selected currency.
#[allow(clippy::print_stdout)]
pub fn get(storefront: &Storefront) {
    println!("{}", storefront.currency().get());
}

/// Persist a new currency selection.
///
/// # Errors
///
/// Returns `Storage` if the preference cannot be written.
#[allow(clippy::print_stdout)]
pub fn set(storefront: &Storefront, code: CurrencyCode) -> Result<(), SelectionError> {
    storefront.currency().set(code)?;
    println!("{code}");
    Ok(())
}
