//! The PortOne API client.
//!
//! [`Client`] wires the pieces together: an [`AuthenticateService`] for the
//! credential exchange, an [`AuthTransport`] that keeps a token cached and
//! attaches it to every request, and the endpoint services built on top.

use crate::authenticate::{AuthenticateService, TokenSource};
use crate::config::{ClientConfig, Credentials};
use crate::errors::Result;
use crate::payments::PaymentsService;
use crate::token::TokenState;
use crate::transport::AuthTransport;
use crate::types::{
    AccessToken, CreatePaymentIntentRequest, Envelope, GetTokenRequest, Payment, PaymentIntent,
};
use std::sync::Arc;
use tracing::debug;

/// Client for the PortOne REST API.
///
/// Cloning is cheap; clones share the token cache and the connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
    authenticate: AuthenticateService,
    payments: PaymentsService,
    transport: Arc<AuthTransport>,
}

impl Client {
    /// Creates a client that authenticates with `credentials`.
    ///
    /// No request is made here; the first token is fetched by the first call
    /// that needs one.
    ///
    /// # Examples
    ///
    /// ```
    /// use portone::client::Client;
    /// use portone::config::{ClientConfig, Credentials};
    /// use std::time::Duration;
    ///
    /// let client = Client::new(
    ///     Credentials::new("imp_key", "imp_secret"),
    ///     ClientConfig::new().with_timeout(Duration::from_secs(5)),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(client.config().base_url, "https://api.iamport.kr");
    /// ```
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        let root = config.parsed_base_url()?;
        let authenticate = AuthenticateService::new(http.clone(), &root)?;
        Self::assemble(credentials, config, http, authenticate.clone(), Arc::new(authenticate))
    }

    /// Creates a client whose transport obtains tokens from `source` instead
    /// of the identity endpoint.
    pub fn with_token_source(
        credentials: Credentials,
        config: ClientConfig,
        source: Arc<dyn TokenSource>,
    ) -> Result<Self> {
        let http = build_http_client(&config)?;
        let root = config.parsed_base_url()?;
        let authenticate = AuthenticateService::new(http.clone(), &root)?;
        Self::assemble(credentials, config, http, authenticate, source)
    }

    fn assemble(
        credentials: Credentials,
        config: ClientConfig,
        http: reqwest::Client,
        authenticate: AuthenticateService,
        source: Arc<dyn TokenSource>,
    ) -> Result<Self> {
        let root = config.parsed_base_url()?;
        let transport = Arc::new(AuthTransport::new(
            http,
            source,
            credentials,
            config.expiry_margin,
        )?);
        let payments = PaymentsService::new(transport.clone(), &root)?;

        debug!(base_url = %root, timeout = ?config.timeout, "PortOne client created");

        Ok(Self {
            config,
            authenticate,
            payments,
            transport,
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The payments endpoints.
    pub fn payments(&self) -> &PaymentsService {
        &self.payments
    }

    /// Exchanges credentials for a token via `POST /users/getToken`.
    ///
    /// This is the raw exchange: the result is not stored in the client's
    /// token cache.
    pub async fn get_token(&self, req: &GetTokenRequest) -> Result<Envelope<AccessToken>> {
        self.authenticate.get_token(req).await
    }

    /// See [`PaymentsService::create_payment_intent`].
    pub async fn create_payment_intent(
        &self,
        req: &CreatePaymentIntentRequest,
    ) -> Result<Envelope<PaymentIntent>> {
        self.payments.create_payment_intent(req).await
    }

    /// See [`PaymentsService::get_payment`].
    pub async fn get_payment(&self, imp_uid: &str) -> Result<Envelope<Payment>> {
        self.payments.get_payment(imp_uid).await
    }

    /// Snapshot of the token currently cached by the transport.
    pub async fn token_state(&self) -> Option<TokenState> {
        self.transport.token_state().await
    }
}

fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().timeout(config.timeout);
    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PortoneError;

    #[test]
    fn test_client_creation() {
        let client = Client::new(Credentials::new("key", "secret"), ClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        let err = Client::new(
            Credentials::new("key", "secret"),
            ClientConfig::new().with_base_url("::nope::"),
        )
        .unwrap_err();
        assert!(matches!(err, PortoneError::UrlParseError(_)));
    }

    #[tokio::test]
    async fn test_new_client_has_no_token() {
        let client =
            Client::new(Credentials::new("key", "secret"), ClientConfig::default()).unwrap();
        assert!(client.token_state().await.is_none());
    }
}
