//! Krona CLI - Currency and checkout tools.
//!
//! # Usage
//!
//! ```bash
//! # Convert 100 SEK to USD
//! krona convert 100 --from SEK --to USD
//!
//! # Format an amount in its currency's locale
//! krona format 1234.5 --currency SEK
//!
//! # Render a SEK price in the selected currency
//! krona price 249 --currency SEK
//!
//! # Select the display currency
//! krona currency set USD
//!
//! # Create a checkout session from a JSON request
//! krona checkout create-session --file cart.json
//! ```
//!
//! # Commands
//!
//! - `convert` / `format` / `price` / `currencies` - Pure currency operations
//! - `currency get|set` - Persisted currency selection
//! - `checkout ...` - Checkout backend calls

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use krona_core::CurrencyCode;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "krona=info";

#[derive(Parser)]
#[command(name = "krona")]
#[command(author, version, about = "Krona currency and checkout tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an amount between currencies
    Convert {
        amount: Decimal,

        #[arg(long)]
        from: CurrencyCode,

        #[arg(long)]
        to: CurrencyCode,
    },
    /// Format an amount in a currency's display locale
    Format {
        amount: Decimal,

        #[arg(short, long)]
        currency: CurrencyCode,

        /// Use the legacy whole-unit Swedish formatter
        #[arg(long)]
        legacy: bool,
    },
    /// Render a product price in the selected (or given) currency
    Price {
        amount: Decimal,

        /// Currency the price is stored in
        #[arg(short, long)]
        currency: CurrencyCode,

        /// Display currency; defaults to the persisted selection
        #[arg(long)]
        display: Option<CurrencyCode>,
    },
    /// List supported currencies
    Currencies {
        /// UI language tag (`en`, `ar`, `sv`, `sv-SE`, ...)
        #[arg(short, long, default_value = "en")]
        lang: String,
    },
    /// Show or change the persisted currency selection
    Currency {
        #[command(subcommand)]
        action: CurrencyAction,
    },
    /// Call the checkout backend
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
    /// Show the effective configuration
    Config,
}

#[derive(Subcommand)]
enum CurrencyAction {
    /// Print the selected currency
    Get,
    /// Select a currency
    Set { code: CurrencyCode },
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Create a checkout session from a JSON request file
    CreateSession {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Retrieve a checkout session
    Retrieve { session_id: String },
    /// Create an order from a completed session
    CreateOrder {
        session_id: String,

        /// Reuse a key when retrying the same attempt; generated if omitted
        #[arg(long)]
        idempotency_key: Option<String>,
    },
    /// Request the order confirmation email
    SendEmail {
        #[arg(long)]
        session_id: Option<String>,

        #[arg(long)]
        order_id: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let storefront = commands::storefront()?;

    match cli.command {
        Commands::Convert { amount, from, to } => commands::currency::convert(&storefront, amount, from, to)?,
        Commands::Format {
            amount,
            currency,
            legacy,
        } => commands::currency::format(&storefront, amount, currency, legacy),
        Commands::Price {
            amount,
            currency,
            display,
        } => commands::currency::price(&storefront, amount, currency, display)?,
        Commands::Currencies { lang } => commands::currency::list(&storefront, &lang)?,
        Commands::Currency { action } => match action {
            CurrencyAction::Get => commands::currency::get(&storefront),
            CurrencyAction::Set { code } => commands::currency::set(&storefront, code)?,
        },
        Commands::Checkout { action } => match action {
            CheckoutAction::CreateSession { file } => {
                commands::checkout::create_session(&storefront, &file).await?;
            }
            CheckoutAction::Retrieve { session_id } => {
                commands::checkout::retrieve(&storefront, session_id).await?;
            }
            CheckoutAction::CreateOrder {
                session_id,
                idempotency_key,
            } => {
                commands::checkout::create_order(&storefront, session_id, idempotency_key).await?;
            }
            CheckoutAction::SendEmail { session_id, order_id } => {
                commands::checkout::send_email(&storefront, session_id, order_id).await?;
            }
        },
        Commands::Config => commands::checkout::show_config(&storefront),
    }
    Ok(())
}
