//! Currency catalog: rates and display tables behind one lookup interface.
//!
//! The built-in catalog mirrors the compiled-in tables in [`rates`](crate::rates)
//! and [`metadata`](crate::metadata). A versioned JSON document can replace
//! it so rates are updated without a new release:
//!
//! ```json
//! {
//!   "version": "2026-10-01",
//!   "base": "SEK",
//!   "currencies": {
//!     "SEK": { "rate": "1", "symbol": "kr", "locale": "sv-SE", "flag": "🇸🇪",
//!              "names": { "en": "Swedish Krona", "ar": "كرونة سويدية", "sv": "Svensk krona" } },
//!     "USD": { "rate": "0.095", "symbol": "$", "locale": "en-US", "flag": "🇺🇸",
//!              "names": { "en": "US Dollar", "ar": "دولار أمريكي", "sv": "Amerikansk dollar" } }
//!   }
//! }
//! ```
//!
//! Loading is all-or-nothing: every supported currency must be present with
//! a positive rate and non-empty names, and the base rate must be 1.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::CurrencyError;
use crate::format::{self, display_locale};
use crate::metadata::{CurrencyOption, currency_flag, currency_name, currency_symbol};
use crate::rates::{ExchangeRateTable, builtin_rate};
use crate::types::{CurrencyCode, Language, Money};

/// Version string of the compiled-in catalog.
pub const BUILTIN_VERSION: &str = "builtin";

/// Display data for one currency.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrencyEntry {
    pub rate: Decimal,
    pub symbol: String,
    pub locale: String,
    #[serde(default)]
    pub flag: String,
    pub names: LocalizedNames,
}

/// Currency name in each supported UI language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocalizedNames {
    pub en: String,
    pub ar: String,
    pub sv: String,
}

impl LocalizedNames {
    /// Name for a language.
    #[must_use]
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::En => &self.en,
            Language::Ar => &self.ar,
            Language::Sv => &self.sv,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    version: String,
    base: String,
    currencies: HashMap<String, CurrencyEntry>,
}

/// Rates, symbols, names and locales for every supported currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyCatalog {
    version: String,
    rates: ExchangeRateTable,
    entries: HashMap<CurrencyCode, CurrencyEntry>,
}

impl CurrencyCatalog {
    /// Catalog built from the compiled-in tables.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = CurrencyCode::ALL
            .into_iter()
            .map(|code| {
                let entry = CurrencyEntry {
                    rate: builtin_rate(code),
                    symbol: currency_symbol(code).to_owned(),
                    locale: display_locale(code).to_owned(),
                    flag: currency_flag(code).to_owned(),
                    names: LocalizedNames {
                        en: currency_name(code, Language::En).to_owned(),
                        ar: currency_name(code, Language::Ar).to_owned(),
                        sv: currency_name(code, Language::Sv).to_owned(),
                    },
                };
                (code, entry)
            })
            .collect();

        Self {
            version: BUILTIN_VERSION.to_owned(),
            rates: ExchangeRateTable::builtin(),
            entries,
        }
    }

    /// Parse and validate a catalog document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCatalog` for malformed JSON, a base other than
    /// [`CurrencyCode::BASE`] or empty names; `InvalidCurrency` for unknown
    /// or missing codes; `InvalidRate` for rates that break the rate table
    /// invariants.
    pub fn from_json(json: &str) -> Result<Self, CurrencyError> {
        let doc: CatalogDocument =
            serde_json::from_str(json).map_err(|e| CurrencyError::InvalidCatalog(e.to_string()))?;

        if doc.base != CurrencyCode::BASE.code() {
            return Err(CurrencyError::InvalidCatalog(format!(
                "base currency must be {}, got {}",
                CurrencyCode::BASE,
                doc.base
            )));
        }

        let mut entries = HashMap::with_capacity(doc.currencies.len());
        for (code, entry) in doc.currencies {
            let code: CurrencyCode = code.parse()?;
            for language in Language::ALL {
                if entry.names.get(language).trim().is_empty() {
                    return Err(CurrencyError::InvalidCatalog(format!(
                        "{code} has no {language} name"
                    )));
                }
            }
            if entry.symbol.trim().is_empty() {
                return Err(CurrencyError::InvalidCatalog(format!("{code} has no symbol")));
            }
            entries.insert(code, entry);
        }

        let rates = ExchangeRateTable::from_rates(entries.iter().map(|(code, e)| (*code, e.rate)))?;

        tracing::debug!(version = %doc.version, "loaded currency catalog");

        Ok(Self {
            version: doc.version,
            rates,
            entries,
        })
    }

    /// Catalog version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The catalog's rate table.
    #[must_use]
    pub const fn rates(&self) -> &ExchangeRateTable {
        &self.rates
    }

    /// Look up the entry for a currency.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurrency` when the catalog has no entry for `code`.
    pub fn entry(&self, code: CurrencyCode) -> Result<&CurrencyEntry, CurrencyError> {
        self.entries
            .get(&code)
            .ok_or_else(|| CurrencyError::InvalidCurrency(code.to_string()))
    }

    /// Display symbol for a currency.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurrency` when the catalog has no entry for `code`.
    pub fn symbol(&self, code: CurrencyCode) -> Result<&str, CurrencyError> {
        Ok(&self.entry(code)?.symbol)
    }

    /// Localized name for a currency.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurrency` when the catalog has no entry for `code`.
    pub fn name(&self, code: CurrencyCode, language: Language) -> Result<&str, CurrencyError> {
        Ok(self.entry(code)?.names.get(language))
    }

    /// Convert an amount between currencies with this catalog's rates.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurrency` if either currency has no rate, and
    /// `Overflow` for amounts too large to convert.
    pub fn convert(
        &self,
        amount: Decimal,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<Decimal, CurrencyError> {
        self.rates.convert(amount, from, to)
    }

    /// Format an amount in the currency's catalog locale.
    ///
    /// Falls back to `"<amount> <symbol>"` when the locale is not supported.
    #[must_use]
    pub fn format_with_locale(&self, amount: Decimal, code: CurrencyCode) -> String {
        match self.entry(code) {
            Ok(entry) => format::format_or_fallback(amount, code, &entry.locale, &entry.symbol),
            Err(_) => format::fallback_format(amount, currency_symbol(code)),
        }
    }

    /// Format a money value in its own currency.
    #[must_use]
    pub fn format_money(&self, money: Money) -> String {
        self.format_with_locale(money.amount(), money.currency())
    }

    /// Convert a product price into the display currency and format it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurrency` if either currency has no rate, and
    /// `Overflow` for amounts too large to convert.
    pub fn format_price(
        &self,
        price: Decimal,
        product_currency: CurrencyCode,
        display_currency: CurrencyCode,
    ) -> Result<String, CurrencyError> {
        let converted = self.convert(price, product_currency, display_currency)?;
        Ok(self.format_with_locale(converted, display_currency))
    }

    /// Switcher entries using this catalog's symbols, names and flags.
    #[must_use]
    pub fn options(&self, language: Language, selected: CurrencyCode) -> Vec<CurrencyOption> {
        CurrencyCode::ALL
            .into_iter()
            .filter_map(|code| {
                self.entries.get(&code).map(|entry| CurrencyOption {
                    code,
                    symbol: entry.symbol.clone(),
                    name: entry.names.get(language).to_owned(),
                    flag: entry.flag.clone(),
                    selected: code == selected,
                })
            })
            .collect()
    }
}

impl Default for CurrencyCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
