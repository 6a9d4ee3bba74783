//! Krona Storefront library.
//!
//! The I/O side of the currency subsystem: environment configuration, the
//! checkout backend client, the persisted currency selection store and the
//! payment provider handle. Pure currency logic lives in `krona-core`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod payment;
pub mod selection;
pub mod state;

pub use checkout::{CheckoutClient, CheckoutError};
pub use config::{ConfigError, StorefrontConfig};
pub use payment::PaymentProvider;
pub use selection::{CurrencyStore, FileStorage, MemoryStorage, PreferenceStorage, SelectionError};
pub use state::{StateError, Storefront};
