//! Integration tests for Krona.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p krona-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_client` - Checkout client against an in-process backend
//! - `currency_selection` - Persisted selection across store reloads
//! - `storefront_context` - Configuration, catalog loading and price rendering
//!
//! No external services are needed: [`MockBackend`] serves the checkout
//! paths on an ephemeral local port, answers with canned responses and
//! records every request it receives.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use krona_storefront::CheckoutClient;
use krona_storefront::config::CheckoutConfig;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// A request received by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub idempotency_key: Option<String>,
    /// Parsed JSON body; `None` for empty or non-JSON bodies
    pub body: Option<serde_json::Value>,
}

#[derive(Clone, Default)]
struct MockState {
    responses: Arc<Mutex<HashMap<String, (StatusCode, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// In-process checkout backend.
///
/// Unconfigured paths answer `200 {}`. The server is aborted on drop.
pub struct MockBackend {
    addr: SocketAddr,
    state: MockState,
    handle: JoinHandle<()>,
}

impl MockBackend {
    /// Bind to an ephemeral port on 127.0.0.1 and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = MockState::default();

        let app = Router::new().fallback(record).with_state(state.clone());
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, state, handle })
    }

    /// Base URL of the backend.
    ///
    /// # Panics
    ///
    /// Never in practice: the address is a bound socket.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("socket address forms a valid URL")
    }

    /// Answer requests to `path` with `status` and a raw body.
    pub fn respond(&self, path: &str, status: u16, body: &str) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.state
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_owned(), (status, body.to_owned()));
    }

    /// Requests received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A checkout client pointed at this backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn client(&self) -> Result<CheckoutClient, krona_storefront::CheckoutError> {
        CheckoutClient::new(&CheckoutConfig { api_url: self.url() })
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };

    let request = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_owned(),
        query: uri.query().map(str::to_owned),
        content_type: header_str(header::CONTENT_TYPE.as_str()),
        idempotency_key: header_str("idempotency-key"),
        body: serde_json::from_slice(&body).ok(),
    };

    let response = state
        .responses
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&request.path)
        .cloned()
        .unwrap_or_else(|| (StatusCode::OK, "{}".to_owned()));

    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(request);

    let (status, body) = response;
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// A URL nothing is listening on.
///
/// # Errors
///
/// Returns an error if a temporary listener cannot be bound.
pub async fn unreachable_url() -> std::io::Result<Url> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Url::parse(&format!("http://{addr}")).map_err(std::io::Error::other)
}

/// A fresh directory path under the system temp dir; not created.
#[must_use]
pub fn temp_state_dir(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{prefix}-{}", uuid::Uuid::new_v4()))
}
