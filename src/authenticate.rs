//! Credential exchange against the identity endpoint.
//!
//! [`AuthenticateService`] posts the REST API key and secret to
//! `/users/getToken` and returns the short-lived access token. It is the
//! default [`TokenSource`] behind the authenticating transport.

use crate::config::Credentials;
use crate::errors::{PortoneError, Result};
use crate::types::{AccessToken, Envelope, GetTokenRequest};
use crate::utils::{decode_envelope, join_path, new_request};
use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, instrument};
use url::Url;

/// Path of the identity service, relative to the service root.
pub const AUTHENTICATE_SERVICE_PATH: &str = "users";

/// Anything that can exchange credentials for an access token.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Exchanges `credentials` for a fresh access token.
    ///
    /// # Errors
    ///
    /// Fails when the call cannot complete, the body is not a token envelope,
    /// or the envelope carries no token.
    async fn fetch_token(&self, credentials: &Credentials) -> Result<AccessToken>;
}

/// Client for `POST /users/getToken`.
///
/// Requests go out on a plain HTTP client; they are never routed through the
/// authenticating transport.
#[derive(Debug, Clone)]
pub struct AuthenticateService {
    http: reqwest::Client,
    base_url: Url,
}

impl AuthenticateService {
    /// Creates a service rooted at `{service_root}/users`.
    pub fn new(http: reqwest::Client, service_root: &Url) -> Result<Self> {
        Ok(Self {
            http,
            base_url: join_path(service_root, &[AUTHENTICATE_SERVICE_PATH])?,
        })
    }

    /// Calls `POST /users/getToken` and returns the envelope as decoded.
    #[instrument(skip_all, fields(api_key = %req.api_key))]
    pub async fn get_token(&self, req: &GetTokenRequest) -> Result<Envelope<AccessToken>> {
        let url = join_path(&self.base_url, &["getToken"])?;
        let request = new_request(&self.http, Method::POST, url, Some(req))?;

        debug!("Requesting access token");
        let response = self.http.execute(request).await?;
        decode_envelope(response).await
    }
}

#[async_trait]
impl TokenSource for AuthenticateService {
    async fn fetch_token(&self, credentials: &Credentials) -> Result<AccessToken> {
        let req = GetTokenRequest {
            api_key: credentials.api_key().to_string(),
            api_secret: credentials.api_secret().to_string(),
        };

        // The code is not checked; only a missing payload is fatal here.
        let Envelope {
            code,
            message,
            response,
        } = self.get_token(&req).await?;

        response.ok_or_else(|| PortoneError::Api {
            code,
            message: message.unwrap_or_default(),
        })
    }
}
