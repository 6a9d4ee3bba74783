//! Payment provider handle.
//!
//! Only the publishable key is held; card collection and confirmation are
//! delegated to the provider's hosted checkout.

use crate::config::PaymentConfig;

/// Publishable-key handle for the payment provider.
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentProvider {
    publishable_key: String,
}

impl std::fmt::Debug for PaymentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentProvider")
            .field("live_mode", &self.is_live_mode())
            .finish_non_exhaustive()
    }
}

impl PaymentProvider {
    /// Build the provider from configuration; `None` when no key is set.
    #[must_use]
    pub fn from_config(config: &PaymentConfig) -> Option<Self> {
        let Some(key) = config.publishable_key.as_ref() else {
            tracing::debug!("No publishable key configured, payment provider disabled");
            return None;
        };

        let provider = Self {
            publishable_key: key.clone(),
        };
        tracing::info!(live_mode = provider.is_live_mode(), "Payment provider initialized");
        Some(provider)
    }

    /// Key handed to the client-side payment SDK.
    #[must_use]
    pub fn publishable_key(&self) -> &str {
        &self.publishable_key
    }

    /// Whether the key charges real cards.
    #[must_use]
    pub fn is_live_mode(&self) -> bool {
        self.publishable_key.starts_with("pk_live_")
    }
}
