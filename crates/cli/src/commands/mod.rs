//! Command implementations.

pub mod checkout;
pub mod currency;

use krona_storefront::{Storefront, StorefrontConfig};

/// Build the storefront context from the environment.
///
/// # Errors
///
/// Returns an error if configuration or the currency catalog is invalid.
pub fn storefront() -> Result<Storefront, Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    Ok(Storefront::from_config(config)?)
}
