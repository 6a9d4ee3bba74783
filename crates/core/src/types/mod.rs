//! Core types for Krona.
//!
//! This module provides type-safe wrappers for currency and checkout concepts.

pub mod currency;
pub mod id;
pub mod money;

pub use currency::{CurrencyCode, Language};
pub use id::*;
pub use money::Money;
