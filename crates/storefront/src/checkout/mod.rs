//! Checkout backend client.
//!
//! # Architecture
//!
//! - One HTTP round trip per operation, no retries, no timeouts
//! - Non-success statuses map to [`CheckoutError::Api`] carrying the
//!   backend's `{ "error": "..." }` message, or a per-operation default
//! - Session, order and acknowledgement payloads are passed through as JSON
//!
//! # Endpoints
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | Create session | POST | `/api/checkout/create-session` |
//! | Retrieve session | GET | `/api/checkout/retrieve-session?session_id=<id>` |
//! | Create order | POST | `/api/checkout/create-order-from-session` |
//! | Send confirmation email | POST | `/api/checkout/send-confirmation-email` |
//!
//! # Example
//!
//! ```rust,ignore
//! use krona_storefront::CheckoutClient;
//!
//! let client = CheckoutClient::new(&config.checkout)?;
//! let session = client.create_session(&request).await?;
//! let order = client
//!     .create_order_from_session(&session_id, &IdempotencyKey::generate())
//!     .await?;
//! ```

mod types;

pub use types::*;

use std::sync::Arc;

use krona_core::{IdempotencyKey, OrderId, SessionId};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::CheckoutConfig;

/// Header carrying the caller-supplied idempotency key on order creation.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Errors that can occur when calling the checkout backend.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Backend answered with a non-success status.
    ///
    /// Displays as the message alone so it can be shown to the shopper as-is.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// No response was received.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Success response body was not valid JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    /// HTTP client could not be constructed or an endpoint URL is invalid.
    #[error("Client error: {0}")]
    Client(String),
}

impl CheckoutError {
    /// HTTP status of a backend error, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A checkout backend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    CreateSession,
    RetrieveSession,
    CreateOrder,
    SendConfirmationEmail,
}

impl Operation {
    const fn path(self) -> &'static str {
        match self {
            Self::CreateSession => "/api/checkout/create-session",
            Self::RetrieveSession => "/api/checkout/retrieve-session",
            Self::CreateOrder => "/api/checkout/create-order-from-session",
            Self::SendConfirmationEmail => "/api/checkout/send-confirmation-email",
        }
    }

    /// Message used when the backend gives no error message of its own.
    const fn default_message(self) -> &'static str {
        match self {
            Self::CreateSession => "Failed to create checkout session",
            Self::RetrieveSession => "Failed to retrieve checkout session",
            Self::CreateOrder => "Failed to create order",
            Self::SendConfirmationEmail => "Failed to send confirmation email",
        }
    }
}

// =============================================================================
// CheckoutClient
// =============================================================================

/// Client for the checkout backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct CheckoutClient {
    inner: Arc<CheckoutClientInner>,
}

struct CheckoutClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for CheckoutClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl CheckoutClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `Client` if the HTTP client fails to build.
    pub fn new(config: &CheckoutConfig) -> Result<Self, CheckoutError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| CheckoutError::Client(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(CheckoutClientInner {
                client,
                base_url: config.api_url.clone(),
            }),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Create a checkout session for the cart.
    ///
    /// # Errors
    ///
    /// Returns `Api` with the backend's message for non-success statuses,
    /// `Network` if no response arrives, `Parse` for a non-JSON body.
    #[instrument(skip_all, fields(currency = %request.currency, items = request.items.len()))]
    pub async fn create_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, CheckoutError> {
        let operation = Operation::CreateSession;
        let builder = self.inner.client.post(self.endpoint(operation)?).json(request);
        self.execute(operation, builder).await
    }

    /// Look up a checkout session by ID.
    ///
    /// # Errors
    ///
    /// See [`create_session`](Self::create_session).
    #[instrument(skip_all, fields(session_id = %session_id))]
    pub async fn retrieve_session(&self, session_id: &SessionId) -> Result<CheckoutSession, CheckoutError> {
        let operation = Operation::RetrieveSession;
        let mut url = self.endpoint(operation)?;
        url.query_pairs_mut().append_pair("session_id", session_id.as_str());
        let builder = self.inner.client.get(url);
        self.execute(operation, builder).await
    }

    /// Turn a completed session into an order.
    ///
    /// The idempotency key is forwarded in the `Idempotency-Key` header; the
    /// backend deduplicates on it. Retries of the same attempt must reuse the
    /// same key. Nothing is deduplicated locally.
    ///
    /// # Errors
    ///
    /// See [`create_session`](Self::create_session).
    #[instrument(skip_all, fields(session_id = %session_id, idempotency_key = %idempotency_key))]
    pub async fn create_order_from_session(
        &self,
        session_id: &SessionId,
        idempotency_key: &IdempotencyKey,
    ) -> Result<OrderResult, CheckoutError> {
        let operation = Operation::CreateOrder;
        let builder = self
            .inner
            .client
            .post(self.endpoint(operation)?)
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key.as_str())
            .json(&CreateOrderRequest {
                session_id: session_id.as_str(),
            });
        self.execute(operation, builder).await
    }

    /// Ask the backend to send the order confirmation email.
    ///
    /// Identifiers are not checked locally: with both absent an empty object
    /// is sent and the backend decides.
    ///
    /// # Errors
    ///
    /// See [`create_session`](Self::create_session).
    #[instrument(skip_all, fields(session_id = ?session_id, order_id = ?order_id))]
    pub async fn send_confirmation_email(
        &self,
        session_id: Option<&SessionId>,
        order_id: Option<&OrderId>,
    ) -> Result<EmailAck, CheckoutError> {
        if session_id.is_none() && order_id.is_none() {
            warn!("confirmation email requested without session or order id");
        }

        let operation = Operation::SendConfirmationEmail;
        let builder = self
            .inner
            .client
            .post(self.endpoint(operation)?)
            .json(&ConfirmationEmailRequest {
                session_id: session_id.map(SessionId::as_str),
                order_id: order_id.map(OrderId::as_str),
            });
        self.execute(operation, builder).await
    }

    /// Absolute URL for an operation, keeping any path prefix on the base URL.
    fn endpoint(&self, operation: Operation) -> Result<Url, CheckoutError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{}", operation.path()))
            .map_err(|e| CheckoutError::Client(format!("invalid endpoint URL: {e}")))
    }

    /// Send a request and decode the response.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: Operation,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, CheckoutError> {
        let response = builder.send().await.inspect_err(|e| {
            warn!(error = %e, path = operation.path(), "checkout backend unreachable");
        })?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, path = operation.path(), "checkout backend responded");

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| operation.default_message().to_string());
            warn!(status = %status, message = %message, path = operation.path(), "checkout backend returned error");
            return Err(CheckoutError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(
                error = %e,
                body = %body.chars().take(200).collect::<String>(),
                "failed to parse checkout response"
            );
            CheckoutError::Parse(e.to_string())
        })
    }
}

/// Extract the `error` field from a backend error body.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}
