//! Storefront context shared by every price-rendering and checkout caller.

use std::sync::Arc;

use krona_core::{CurrencyCatalog, CurrencyCode, CurrencyError, Language, Money};
use krona_core::metadata::CurrencyOption;
use rust_decimal::Decimal;

use crate::checkout::{CheckoutClient, CheckoutError};
use crate::config::{ConfigError, StorefrontConfig};
use crate::payment::PaymentProvider;
use crate::selection::{CurrencyStore, FileStorage, PreferenceStorage};

/// Error assembling the storefront context.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

/// Storefront context.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// currency catalog, the selection store and the checkout client.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    catalog: CurrencyCatalog,
    checkout: CheckoutClient,
    currency: CurrencyStore,
    payment: Option<PaymentProvider>,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("catalog", &self.inner.catalog.version())
            .field("checkout", &self.inner.checkout)
            .field("currency", &self.inner.currency)
            .field("payment", &self.inner.payment)
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Create the context, persisting preferences under `config.state_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or the HTTP client
    /// fails to build.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let storage = Arc::new(FileStorage::new(config.state_dir.clone()));
        Self::with_storage(config, storage)
    }

    /// Create the context with caller-supplied preference storage.
    ///
    /// # Errors
    ///
    /// See [`from_config`](Self::from_config).
    pub fn with_storage(
        config: StorefrontConfig,
        storage: Arc<dyn PreferenceStorage>,
    ) -> Result<Self, StateError> {
        let catalog = config.load_catalog()?;
        let checkout = CheckoutClient::new(&config.checkout)?;
        let currency = CurrencyStore::load(storage);
        let payment = PaymentProvider::from_config(&config.payment);

        tracing::debug!(
            catalog = catalog.version(),
            currency = %currency.get(),
            checkout_api = %checkout.base_url(),
            "Storefront initialized"
        );

        Ok(Self {
            inner: Arc::new(StorefrontInner {
                config,
                catalog,
                checkout,
                currency,
                payment,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &CurrencyCatalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn checkout(&self) -> &CheckoutClient {
        &self.inner.checkout
    }

    /// The currency selection store.
    #[must_use]
    pub fn currency(&self) -> &CurrencyStore {
        &self.inner.currency
    }

    /// The payment provider, if a publishable key is configured.
    #[must_use]
    pub fn payment(&self) -> Option<&PaymentProvider> {
        self.inner.payment.as_ref()
    }

    /// Render a product price in the selected currency.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurrency` if either currency has no rate, and
    /// `Overflow` for amounts too large to convert.
    pub fn format_price(&self, price: Decimal, product_currency: CurrencyCode) -> Result<String, CurrencyError> {
        self.inner
            .catalog
            .format_price(price, product_currency, self.inner.currency.get())
    }

    /// Convert a money value into the selected currency.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurrency` if either currency has no rate, and
    /// `Overflow` for amounts too large to convert.
    pub fn to_selected(&self, money: Money) -> Result<Money, CurrencyError> {
        money.convert_to(self.inner.currency.get(), self.inner.catalog.rates())
    }

    /// Switcher entries with the current selection marked.
    #[must_use]
    pub fn currency_options(&self, language: Language) -> Vec<CurrencyOption> {
        self.inner.catalog.options(language, self.inner.currency.get())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::selection::MemoryStorage;

    fn storefront() -> Storefront {
        Storefront::with_storage(StorefrontConfig::defaults().unwrap(), Arc::new(MemoryStorage::new())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let store = storefront();
        assert_eq!(store.currency().get(), CurrencyCode::SEK);
        assert!(store.payment().is_none());
        assert_eq!(store.checkout().base_url().as_str(), "http://localhost:3001/");
    }

    #[test]
    fn test_format_price_follows_selection() {
        let store = storefront();
        assert_eq!(
            store.format_price(dec!(100), CurrencyCode::SEK).unwrap(),
            "100,00\u{a0}kr"
        );

        store.currency().set(CurrencyCode::USD).unwrap();
        assert_eq!(store.format_price(dec!(100), CurrencyCode::SEK).unwrap(), "$9.50");
    }

    #[test]
    fn test_to_selected() {
        let store = storefront();
        store.currency().set(CurrencyCode::USD).unwrap();
        let converted = store.to_selected(Money::new(dec!(200), CurrencyCode::SEK)).unwrap();
        assert_eq!(converted, Money::new(dec!(19), CurrencyCode::USD));
    }

    #[test]
    fn test_currency_options_mark_selection() {
        let store = storefront();
        store.currency().set(CurrencyCode::USD).unwrap();
        let selected: Vec<_> = store
            .currency_options(Language::En)
            .into_iter()
            .filter(|o| o.selected)
            .map(|o| o.code)
            .collect();
        assert_eq!(selected, vec![CurrencyCode::USD]);
    }

    #[test]
    fn test_clones_share_selection() {
        let store = storefront();
        let clone = store.clone();
        clone.currency().set(CurrencyCode::USD).unwrap();
        assert_eq!(store.currency().get(), CurrencyCode::USD);
    }
}
