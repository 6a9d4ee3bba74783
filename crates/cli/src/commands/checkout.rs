//! Checkout backend commands.
//!
//! # Usage
//!
//! ```bash
//! krona checkout create-session --file cart.json
//! krona checkout retrieve cs_test_123
//! krona checkout create-order cs_test_123 --idempotency-key 3f0c...
//! krona checkout send-email --session-id cs_test_123
//! ```
//!
//! # Environment Variables
//!
//! - `CHECKOUT_API_URL` - Checkout backend base URL

use std::path::Path;

use krona_core::{IdempotencyKey, OrderId, SessionId};
use krona_storefront::Storefront;
use krona_storefront::checkout::CheckoutSessionRequest;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while running a checkout command.
#[derive(Debug, Error)]
pub enum CheckoutCommandError {
    #[error("Failed to read {0}: {1}")]
    ReadFile(String, std::io::Error),

    #[error("Invalid checkout request: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error(transparent)]
    Checkout(#[from] krona_storefront::CheckoutError),
}

/// Create a checkout session from a JSON request file and print the session.
///
/// # Errors
///
/// Returns an error if the file is unreadable or invalid, or the backend
/// call fails.
pub async fn create_session(storefront: &Storefront, file: &Path) -> Result<(), CheckoutCommandError> {
    let json = std::fs::read_to_string(file)
        .map_err(|e| CheckoutCommandError::ReadFile(file.display().to_string(), e))?;
    let request: CheckoutSessionRequest = serde_json::from_str(&json)?;

    match request.computed_subtotal(storefront.catalog().rates()) {
        Ok(computed) if computed.amount() != request.subtotal => {
            tracing::warn!(
                given = %request.subtotal,
                computed = %computed.amount(),
                "Request subtotal does not match its items"
            );
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Could not verify request subtotal"),
    }

    let session = storefront.checkout().create_session(&request).await?;
    print_json(&session)
}

/// Retrieve a checkout session and print it.
///
/// # Errors
///
/// Returns an error if the backend call fails.
pub async fn retrieve(storefront: &Storefront, session_id: String) -> Result<(), CheckoutCommandError> {
    let session = storefront
        .checkout()
        .retrieve_session(&SessionId::new(session_id))
        .await?;
    print_json(&session)
}

/// Create an order from a session and print the result.
///
/// A fresh idempotency key is generated and logged when none is given, so a
/// failed attempt can be retried with the same key.
///
/// # Errors
///
/// Returns an error if the backend call fails.
pub async fn create_order(
    storefront: &Storefront,
    session_id: String,
    idempotency_key: Option<String>,
) -> Result<(), CheckoutCommandError> {
    let key = idempotency_key.map_or_else(IdempotencyKey::generate, IdempotencyKey::new);
    tracing::info!(idempotency_key = %key, "Creating order");

    let order = storefront
        .checkout()
        .create_order_from_session(&SessionId::new(session_id), &key)
        .await?;
    print_json(&order)
}

/// Request the confirmation email and print the acknowledgement.
///
/// # Errors
///
/// Returns an error if the backend call fails.
pub async fn send_email(
    storefront: &Storefront,
    session_id: Option<String>,
    order_id: Option<String>,
) -> Result<(), CheckoutCommandError> {
    let session_id = session_id.map(SessionId::new);
    let order_id = order_id.map(OrderId::new);

    let ack = storefront
        .checkout()
        .send_confirmation_email(session_id.as_ref(), order_id.as_ref())
        .await?;
    print_json(&ack)
}

/// Print the effective configuration. The publishable key is not shown.
#[allow(clippy::print_stdout)]
pub fn show_config(storefront: &Storefront) {
    let config = storefront.config();
    println!("checkout_api_url: {}", config.checkout.api_url);
    println!("state_dir:        {}", config.state_dir.display());
    println!(
        "catalog:          {}",
        config
            .catalog_path
            .as_ref()
            .map_or_else(|| storefront.catalog().version().to_string(), |p| p.display().to_string())
    );
    println!(
        "payment:          {}",
        storefront
            .payment()
            .map_or("disabled", |p| if p.is_live_mode() { "live" } else { "test" })
    );
    println!("currency:         {}", storefront.currency().get());
}

#[allow(clippy::print_stdout)]
fn print_json(value: &impl Serialize) -> Result<(), CheckoutCommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
