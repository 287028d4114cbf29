//! Example PortOne client.
//!
//! Prepares a payment intent and looks up a payment, authenticating
//! transparently on the first call.
//!
//! Run with:
//! ```bash
//! cargo run --example get_payment
//! ```
//!
//! Environment variables (a `.env` file is honoured):
//! - PORTONE_API_KEY / PORTONE_API_SECRET: REST API credentials
//! - PORTONE_BASE_URL: Service root (defaults to production)
//! - PORTONE_TIMEOUT_SECS: Per-call timeout
//! - IMP_UID: Payment to look up
//! - RUST_LOG: Log filter, e.g. `portone=debug`

use portone::types::CreatePaymentIntentRequest;
use portone::{Client, ClientConfig, Credentials};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let credentials = Credentials::from_env()?;
    let config = ClientConfig::from_env()?.with_user_agent("portone-rs-demo");
    let imp_uid = std::env::var("IMP_UID").unwrap_or_else(|_| "imp_000000000000".to_string());

    println!("PortOne example client");
    println!("   API: {}", config.base_url);
    println!();

    let client = Client::new(credentials, config)?;

    let merchant_uid = format!("demo_{}", chrono::Utc::now().timestamp_millis());
    let intent = client
        .create_payment_intent(&CreatePaymentIntentRequest {
            merchant_uid,
            amount: 1000,
        })
        .await?;
    println!("Prepare: code={} message={:?}", intent.code, intent.message);
    if let Some(intent) = intent.response {
        println!("   {} -> {}", intent.merchant_uid, intent.amount);
    }

    let payment = client.get_payment(&imp_uid).await?;
    println!("Lookup {}: code={} message={:?}", imp_uid, payment.code, payment.message);
    if let Some(payment) = payment.response {
        println!("{}", serde_json::to_string_pretty(&payment)?);
    }

    Ok(())
}

