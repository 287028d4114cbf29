//! Authenticating transport.
//!
//! Every authenticated request passes through [`AuthTransport::execute`], which
//! makes sure a usable access token is cached, refreshing it through a
//! [`TokenSource`] when it is missing or expired, and then attaches it as the
//! `Authorization` header before dispatching the request.
//!
//! ## Token lifecycle
//!
//! 1. **Unauthenticated**: no token cached; the next request refreshes
//! 2. **Authenticated**: token cached and `now < expires_at`; reused verbatim
//! 3. **Expired**: `now >= expires_at`; the next request refreshes
//!
//! A failed refresh leaves the cache untouched and fails the request without
//! sending it.
//!
//! The check-refresh-store sequence runs under one async mutex, so concurrent
//! callers that all find the cache stale share a single refresh. Dropping a
//! call mid-refresh leaves the cache as it was.

use crate::authenticate::TokenSource;
use crate::config::Credentials;
use crate::errors::{PortoneError, Result};
use crate::token::{TokenCache, TokenState};
use crate::utils::timestamp_to_datetime;
use chrono::Utc;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Request, Response};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Wraps an HTTP client so that every request carries a valid access token.
pub struct AuthTransport {
    http: reqwest::Client,
    source: Arc<dyn TokenSource>,
    credentials: Credentials,
    cache: Mutex<TokenCache>,
    expiry_margin: chrono::Duration,
}

impl std::fmt::Debug for AuthTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTransport")
            .field("credentials", &self.credentials)
            .field("expiry_margin", &self.expiry_margin)
            .finish_non_exhaustive()
    }
}

impl AuthTransport {
    /// Creates a transport with an empty token cache.
    ///
    /// # Arguments
    ///
    /// * `http` - Client that performs the actual network calls
    /// * `source` - Where fresh tokens come from
    /// * `credentials` - Exchanged for a token on every refresh
    /// * `expiry_margin` - Tokens count as expired this long before `expired_at`
    pub fn new(
        http: reqwest::Client,
        source: Arc<dyn TokenSource>,
        credentials: Credentials,
        expiry_margin: Duration,
    ) -> Result<Self> {
        let expiry_margin = chrono::Duration::from_std(expiry_margin).map_err(|_| {
            PortoneError::ConfigError(format!("expiry margin too large: {:?}", expiry_margin))
        })?;

        Ok(Self {
            http,
            source,
            credentials,
            cache: Mutex::new(TokenCache::new()),
            expiry_margin,
        })
    }

    /// Returns a usable access token, refreshing the cache first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`PortoneError::Authentication`] wrapping the cause when the
    /// refresh fails. The cache is left unchanged in that case.
    pub async fn access_token(&self) -> Result<String> {
        let mut cache = self.cache.lock().await;

        let stale = Utc::now()
            .checked_add_signed(self.expiry_margin)
            .map_or(true, |horizon| cache.needs_refresh(horizon));
        if stale {
            debug!(present = cache.is_present(), "Refreshing access token");
            let (access_token, expires_at) = self.refresh().await.map_err(|err| {
                warn!(error = %err, "Access token refresh failed");
                PortoneError::Authentication(Box::new(err))
            })?;
            cache.set(access_token, expires_at);
            info!(%expires_at, "Access token refreshed");
        }

        cache
            .token()
            .map(|state| state.access_token.clone())
            .ok_or_else(|| PortoneError::InvalidResponse("token cache is empty".to_string()))
    }

    async fn refresh(&self) -> Result<(String, chrono::DateTime<Utc>)> {
        let token = self.source.fetch_token(&self.credentials).await?;
        // A token that cannot travel as a header must never reach the cache.
        HeaderValue::from_str(&token.access_token)?;
        let expires_at = timestamp_to_datetime(token.expired_at)?;
        Ok((token.access_token, expires_at))
    }

    /// Attaches the access token to `request` and sends it.
    ///
    /// The token goes into `Authorization` as is, without a `Bearer` prefix.
    /// The response is returned untouched, whatever its status.
    pub async fn execute(&self, mut request: Request) -> Result<Response> {
        let token = self.access_token().await?;

        let mut value = HeaderValue::from_str(&token)?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);

        Ok(self.http.execute(request).await?)
    }

    /// The underlying HTTP client, for building requests.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Snapshot of the cached token, if any.
    pub async fn token_state(&self) -> Option<TokenState> {
        self.cache.lock().await.token().cloned()
    }
}
