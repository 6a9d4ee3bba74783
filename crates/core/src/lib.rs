//! Krona Core - Currency types and pure pricing logic.
//!
//! This crate provides the currency subsystem shared by every Krona component:
//! - `storefront` - Checkout client and currency selection store
//! - `cli` - Command-line tools for conversion, formatting and checkout calls
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no persistence. Rates and display tables are static data unless
//! a [`CurrencyCatalog`] is loaded from a versioned JSON document.
//!
//! # Modules
//!
//! - [`types`] - `CurrencyCode`, `Language`, `Money` and string ID newtypes
//! - [`rates`] - Exchange rate table and conversion math
//! - [`format`] - Locale-aware currency formatting with fallback
//! - [`metadata`] - Symbols, localized names and switcher options
//! - [`catalog`] - Configurable currency catalog behind the same lookups
//! - [`error`] - `CurrencyError`

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod error;
pub mod format;
pub mod metadata;
pub mod rates;
pub mod types;

pub use catalog::CurrencyCatalog;
pub use error::CurrencyError;
pub use format::{format_price, format_with_locale};
#[allow(deprecated)]
pub use format::format_currency;
pub use metadata::{CurrencyOption, currency_flag, currency_name, currency_options, currency_symbol};
pub use rates::{ExchangeRateTable, convert};
pub use types::*;
