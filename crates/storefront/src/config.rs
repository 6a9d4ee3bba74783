//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CHECKOUT_API_URL` - Checkout backend base URL (default: `http://localhost:3001`)
//! - `STRIPE_PUBLISHABLE_KEY` - Payment provider publishable key; unset,
//!   empty or unrecognized disables the payment provider
//! - `KRONA_STATE_DIR` - Directory for persisted preferences (default: `.krona`)
//! - `KRONA_CATALOG_PATH` - Versioned currency catalog JSON overriding the
//!   built-in rates and display tables

use std::path::PathBuf;

use krona_core::{CurrencyCatalog, CurrencyError};
use thiserror::Error;
use url::Url;

/// Default checkout backend URL.
pub const DEFAULT_CHECKOUT_API_URL: &str = "http://localhost:3001";

/// Default directory for persisted preferences.
pub const DEFAULT_STATE_DIR: &str = ".krona";

/// Publishable keys are safe to ship to clients; secret and restricted keys are not.
const PUBLISHABLE_KEY_PREFIX: &str = "pk_";
const FORBIDDEN_KEY_PREFIXES: &[&str] = &["sk_", "rk_"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Failed to read currency catalog {0}: {1}")]
    CatalogRead(PathBuf, std::io::Error),
    #[error("Invalid currency catalog: {0}")]
    Catalog(#[from] CurrencyError),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Checkout backend configuration
    pub checkout: CheckoutConfig,
    /// Payment provider configuration
    pub payment: PaymentConfig,
    /// Directory holding persisted preferences
    pub state_dir: PathBuf,
    /// Optional currency catalog document
    pub catalog_path: Option<PathBuf>,
}

/// Checkout backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Base URL every checkout path is appended to
    pub api_url: Url,
}

/// Payment provider configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentConfig {
    /// Publishable key; `None` disables the payment provider
    pub publishable_key: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Configuration with every variable unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` only if a built-in default fails to parse.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_lookup(|_| None)
    }

    /// Build configuration from a variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = parse_api_url(&get_env_or_default(&lookup, "CHECKOUT_API_URL", DEFAULT_CHECKOUT_API_URL))
            .map_err(|reason| ConfigError::InvalidEnvVar("CHECKOUT_API_URL".to_string(), reason))?;

        let publishable_key = parse_publishable_key(lookup("STRIPE_PUBLISHABLE_KEY"))
            .map_err(|reason| ConfigError::InvalidEnvVar("STRIPE_PUBLISHABLE_KEY".to_string(), reason))?;

        let state_dir = PathBuf::from(get_env_or_default(&lookup, "KRONA_STATE_DIR", DEFAULT_STATE_DIR));
        let catalog_path = lookup("KRONA_CATALOG_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            checkout: CheckoutConfig { api_url },
            payment: PaymentConfig { publishable_key },
            state_dir,
            catalog_path,
        })
    }

    /// Load the configured currency catalog, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the catalog file cannot be read or fails
    /// validation.
    pub fn load_catalog(&self) -> Result<CurrencyCatalog, ConfigError> {
        let Some(path) = &self.catalog_path else {
            return Ok(CurrencyCatalog::builtin());
        };

        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::CatalogRead(path.clone(), e))?;
        let catalog = CurrencyCatalog::from_json(&json)?;
        tracing::info!(path = %path.display(), version = catalog.version(), "Currency catalog loaded");
        Ok(catalog)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_env_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Parse the checkout backend base URL. Only `http` and `https` are accepted.
fn parse_api_url(value: &str) -> Result<Url, String> {
    let url = Url::parse(value.trim()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{other}'")),
    }
    if url.host_str().is_none() {
        return Err("URL must have a host".to_string());
    }
    Ok(url)
}

/// Validate an optional publishable key.
///
/// Secret and restricted keys are refused outright. Empty values and keys
/// without the publishable prefix disable the provider.
fn parse_publishable_key(value: Option<String>) -> Result<Option<String>, String> {
    let Some(key) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if let Some(prefix) = FORBIDDEN_KEY_PREFIXES.iter().find(|p| key.starts_with(**p)) {
        return Err(format!("'{prefix}' keys must never be shipped to clients"));
    }
    if !key.starts_with(PUBLISHABLE_KEY_PREFIX) {
        tracing::warn!(
            "STRIPE_PUBLISHABLE_KEY does not start with '{PUBLISHABLE_KEY_PREFIX}', payment provider disabled"
        );
        return Ok(None);
    }

    Ok(Some(key))
}
