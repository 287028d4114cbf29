//! Client configuration and credentials.

use crate::errors::{PortoneError, Result};
use std::time::Duration;
use url::Url;

/// Production host of the PortOne REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.iamport.kr";

/// Default timeout applied to every HTTP call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Long-lived REST API credentials exchanged for short-lived access tokens.
///
/// # Examples
///
/// ```
/// use portone::config::Credentials;
///
/// let credentials = Credentials::new("imp_key", "imp_secret");
/// assert_eq!(credentials.api_key(), "imp_key");
/// assert!(!format!("{:?}", credentials).contains("imp_secret"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    /// Creates a new credential pair.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Reads `PORTONE_API_KEY` and `PORTONE_API_SECRET` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_var)
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| PortoneError::ConfigError(format!("{} is not set", name)))
        };
        Ok(Self::new(
            required("PORTONE_API_KEY")?,
            required("PORTONE_API_SECRET")?,
        ))
    }

    /// The REST API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The REST API secret.
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Configuration applied once when a [`Client`](crate::client::Client) is built.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root, e.g. `https://api.iamport.kr`; point it at a local stub in tests
    pub base_url: String,

    /// Upper bound on the duration of each HTTP call, token exchange included
    pub timeout: Duration,

    /// Treat a token as expired this long before its `expired_at`; zero by default
    pub expiry_margin: Duration,

    /// Optional `User-Agent` header sent with every request
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            expiry_margin: Duration::ZERO,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with production defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the defaults and applies `PORTONE_BASE_URL` and
    /// `PORTONE_TIMEOUT_SECS` when they are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_var)
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base_url) = lookup("PORTONE_BASE_URL") {
            config.base_url = base_url;
        }

        if let Some(secs) = lookup("PORTONE_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                PortoneError::ConfigError(format!("PORTONE_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Sets the service root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the safety margin subtracted from token expiry.
    pub fn with_expiry_margin(mut self, margin: Duration) -> Self {
        self.expiry_margin = margin;
        self
    }

    /// Sets the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Parses and validates `base_url`.
    pub(crate) fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)?;
        if url.cannot_be_a_base() {
            return Err(PortoneError::ConfigError(format!(
                "base URL cannot carry paths: {}",
                self.base_url
            )));
        }
        Ok(url)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
