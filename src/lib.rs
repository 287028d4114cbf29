//! # portone-rs
//!
//! A typed async client for the [PortOne](https://portone.io) (iamport) payment
//! gateway REST API.
//!
//! Every endpoint call is authenticated transparently: the client exchanges
//! its REST API key and secret for an access token on first use, caches it,
//! and fetches a new one once it expires. Callers never handle tokens.
//!
//! ## Features
//!
//! - **Lazy authentication**: no network traffic until the first call
//! - **Token caching**: one token per client, reused until `expired_at`
//! - **Single-flight refresh**: concurrent calls share one token exchange
//! - **Typed envelopes**: every response decodes into [`types::Envelope`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use portone::{Client, ClientConfig, Credentials};
//! use portone::types::CreatePaymentIntentRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(
//!     Credentials::new("imp_key", "imp_secret"),
//!     ClientConfig::default(),
//! )?;
//!
//! let intent = client
//!     .create_payment_intent(&CreatePaymentIntentRequest {
//!         merchant_uid: "order_20240101_0001".to_string(),
//!         amount: 1000,
//!     })
//!     .await?
//!     .into_response()?;
//! println!("prepared {} for {}", intent.merchant_uid, intent.amount);
//!
//! let payment = client.get_payment("imp_123456789012").await?;
//! println!("status: {:?}", payment.response.and_then(|p| p.status));
//! # Ok(())
//! # }
//! ```
//!
//! ## Status codes
//!
//! Endpoint methods return the envelope exactly as decoded, including a
//! non-zero `code`. Call [`types::Envelope::into_response`] to turn those into
//! [`PortoneError::Api`] errors.
//!
//! ## Cancellation
//!
//! Dropping a call's future aborts it. A token exchange aborted this way never
//! updates the cache. Use `tokio::time::timeout` for per-call deadlines.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod authenticate;
pub mod client;
pub mod config;
pub mod errors;
pub mod payments;
pub mod token;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use authenticate::TokenSource;
pub use client::Client;
pub use config::{ClientConfig, Credentials};
pub use errors::{PortoneError, Result};
pub use types::{
    AccessToken, CreatePaymentIntentRequest, Envelope, GetTokenRequest, Payment, PaymentIntent,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_accessibility() {
        let _ = config::ClientConfig::new();
        let _ = token::TokenCache::new();
        let _ = Client::new(Credentials::new("key", "secret"), ClientConfig::default());
    }
}
