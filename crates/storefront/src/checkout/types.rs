//! Request and response types for the checkout backend.
//!
//! Field names follow the backend's JSON contract: request envelopes are
//! camelCase while product snapshots keep `discount_percentage`. Amounts are
//! sent as JSON numbers.

use krona_core::{CurrencyCode, CurrencyError, ExchangeRateTable, Language, Money, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Request Types
// =============================================================================

/// Product title in each UI language; English is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedTitle {
    pub en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sv: Option<String>,
}

impl LocalizedTitle {
    /// Title in `language`, English when that translation is missing.
    #[must_use]
    pub fn get(&self, language: Language) -> &str {
        let translated = match language {
            Language::En => None,
            Language::Ar => self.ar.as_deref(),
            Language::Sv => self.sv.as_deref(),
        };
        translated.filter(|t| !t.is_empty()).unwrap_or(&self.en)
    }
}

/// Product as it looked when added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub title: LocalizedTitle,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub currency: CurrencyCode,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub discount_percentage: Option<Decimal>,
}

/// Promotion active when the item was added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePromotion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub discount_percentage: Option<Decimal>,
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub product: ProductSnapshot,
    pub quantity: u32,
    #[serde(rename = "activeEvent", default, skip_serializing_if = "Option::is_none")]
    pub active_promotion: Option<ActivePromotion>,
}

impl CheckoutItem {
    /// Discount applied to this line: the active promotion's when it has
    /// one, otherwise the product's own.
    #[must_use]
    pub fn effective_discount(&self) -> Option<Decimal> {
        self.active_promotion
            .as_ref()
            .and_then(|p| p.discount_percentage)
            .or(self.product.discount_percentage)
            .filter(|d| *d > Decimal::ZERO)
    }

    /// Unit price after discount, in the product's currency.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the discounted price does not fit.
    pub fn unit_price(&self) -> Result<Money, CurrencyError> {
        let price = Money::new(self.product.price, self.product.currency);
        self.effective_discount()
            .map_or(Ok(price), |discount| price.discounted(discount))
    }

    /// Unit price times quantity, in the product's currency.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the line total does not fit.
    pub fn line_total(&self) -> Result<Money, CurrencyError> {
        self.unit_price()?.times(self.quantity)
    }
}

/// Where the order ships. Everything except `phone` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Body of a create-session request.
///
/// `subtotal`, `shipping` and `total` are sent as given; keeping them
/// consistent with the items is the caller's job.
/// [`computed_subtotal`](Self::computed_subtotal) is available to derive them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionRequest {
    pub items: Vec<CheckoutItem>,
    pub shipping_info: ShippingInfo,
    pub currency: CurrencyCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub discount_amount: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl CheckoutSessionRequest {
    /// Sum of discounted line totals, each converted into the request currency.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurrency` if a line's currency has no rate, and
    /// `Overflow` if a line or the sum is too large.
    pub fn computed_subtotal(&self, rates: &ExchangeRateTable) -> Result<Money, CurrencyError> {
        self.items
            .iter()
            .try_fold(Money::zero(self.currency), |acc, item| {
                acc.checked_add(item.line_total()?.convert_to(self.currency, rates)?)
            })
    }
}

/// Body of a create-order request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateOrderRequest<'a> {
    pub session_id: &'a str,
}

/// Body of a confirmation email request. Absent identifiers are omitted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfirmationEmailRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<&'a str>,
}

// =============================================================================
// Response Types
// =============================================================================

/// Macro to define an opaque backend payload.
///
/// The payload is kept as raw JSON; only an `id` accessor is offered because
/// the backend owns the rest of the structure.
macro_rules! opaque_payload {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(serde_json::Value);

        impl $name {
            /// The payload's top-level `id` field, if it is a string.
            #[must_use]
            pub fn id(&self) -> Option<&str> {
                self.0.get("id").and_then(serde_json::Value::as_str)
            }

            /// Borrow the raw JSON.
            #[must_use]
            pub const fn as_json(&self) -> &serde_json::Value {
                &self.0
            }

            /// Consume the wrapper and return the raw JSON.
            #[must_use]
            pub fn into_json(self) -> serde_json::Value {
                self.0
            }
        }

        impl From<serde_json::Value> for $name {
            fn from(value: serde_json::Value) -> Self {
                Self(value)
            }
        }
    };
}

opaque_payload!(
    /// Checkout session as returned by the backend.
    CheckoutSession
);
opaque_payload!(
    /// Result of converting a session into an order.
    OrderResult
);
opaque_payload!(
    /// Acknowledgement of a confirmation email request.
    EmailAck
);

/// Error payload returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    fn item(price: Decimal, currency: CurrencyCode, quantity: u32) -> CheckoutItem {
        CheckoutItem {
            product: ProductSnapshot {
                id: ProductId::new("prod_1"),
                title: LocalizedTitle {
                    en: "Linen Towel".to_string(),
                    ar: None,
                    sv: Some("Linnehandduk".to_string()),
                },
                price,
                currency,
                images: vec!["https://cdn.example.se/towel.jpg".to_string()],
                discount_percentage: None,
            },
            quantity,
            active_promotion: None,
        }
    }

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            full_name: "Astrid Lind".to_string(),
            email: "astrid@example.se".to_string(),
            phone: None,
            address: "Storgatan 1".to_string(),
            city: "Uppsala".to_string(),
            postal_code: "753 20".to_string(),
            country: "SE".to_string(),
        }
    }

    #[test]
    fn test_request_serializes_to_backend_contract() {
        let request = CheckoutSessionRequest {
            items: vec![item(dec!(249), CurrencyCode::SEK, 2)],
            shipping_info: shipping(),
            currency: CurrencyCode::SEK,
            discount_code: None,
            discount_amount: None,
            subtotal: dec!(498),
            shipping: dec!(49),
            total: dec!(547),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["currency"], json!("SEK"));
        assert_eq!(value["subtotal"], json!(498.0));
        assert_eq!(value["total"], json!(547.0));
        assert_eq!(value["shippingInfo"]["fullName"], json!("Astrid Lind"));
        assert_eq!(value["shippingInfo"]["postalCode"], json!("753 20"));
        assert!(value["shippingInfo"].get("phone").is_none());
        assert!(value.get("discountCode").is_none());
        assert_eq!(value["items"][0]["product"]["price"], json!(249.0));
        assert_eq!(value["items"][0]["product"]["title"]["sv"], json!("Linnehandduk"));
        assert!(value["items"][0].get("activeEvent").is_none());
    }

    #[test]
    fn test_active_promotion_serializes_as_active_event() {
        let mut line = item(dec!(100), CurrencyCode::SEK, 1);
        line.active_promotion = Some(ActivePromotion {
            id: Some("summer".to_string()),
            discount_percentage: Some(dec!(15)),
        });

        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["activeEvent"]["id"], json!("summer"));
        assert_eq!(value["activeEvent"]["discount_percentage"], json!(15.0));
    }

    #[test]
    fn test_promotion_discount_takes_precedence() {
        let mut line = item(dec!(200), CurrencyCode::SEK, 1);
        line.product.discount_percentage = Some(dec!(10));
        assert_eq!(line.unit_price().unwrap().amount(), dec!(180));

        line.active_promotion = Some(ActivePromotion {
            id: None,
            discount_percentage: Some(dec!(25)),
        });
        assert_eq!(line.unit_price().unwrap().amount(), dec!(150));
    }

    #[test]
    fn test_computed_subtotal_converts_lines() {
        let request = CheckoutSessionRequest {
            items: vec![
                item(dec!(100), CurrencyCode::SEK, 2),
                item(dec!(9.5), CurrencyCode::USD, 1),
            ],
            shipping_info: shipping(),
            currency: CurrencyCode::SEK,
            discount_code: Some("WELCOME".to_string()),
            discount_amount: Some(dec!(10)),
            subtotal: dec!(300),
            shipping: dec!(0),
            total: dec!(290),
        };

        let subtotal = request.computed_subtotal(&ExchangeRateTable::default()).unwrap();
        assert_eq!(subtotal, Money::new(dec!(300), CurrencyCode::SEK));
    }

    #[test]
    fn test_computed_subtotal_overflow_is_an_error() {
        let request = CheckoutSessionRequest {
            items: vec![item(Decimal::MAX, CurrencyCode::SEK, 2)],
            shipping_info: shipping(),
            currency: CurrencyCode::SEK,
            discount_code: None,
            discount_amount: None,
            subtotal: Decimal::MAX,
            shipping: dec!(0),
            total: Decimal::MAX,
        };

        let err = request.computed_subtotal(&ExchangeRateTable::default()).unwrap_err();
        assert!(matches!(err, CurrencyError::Overflow(_)));
    }

    #[test]
    fn test_localized_title_falls_back_to_english() {
        let title = LocalizedTitle {
            en: "Candle".to_string(),
            ar: None,
            sv: Some("Ljus".to_string()),
        };
        assert_eq!(title.get(Language::Sv), "Ljus");
        assert_eq!(title.get(Language::Ar), "Candle");
    }

    #[test]
    fn test_opaque_payload_id() {
        let session = CheckoutSession::from(json!({"id": "sess_1", "url": "https://pay"}));
        assert_eq!(session.id(), Some("sess_1"));
        assert_eq!(OrderResult::from(json!({"ok": true})).id(), None);
    }
}
