//! Single-slot cache for the current access token.

use chrono::{DateTime, Utc};

/// An access token together with the instant it stops being usable.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenState {
    /// Opaque token value
    pub access_token: String,

    /// First instant at which the token is no longer valid
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for TokenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenState")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Holds zero or one [`TokenState`].
///
/// The record is only ever replaced wholesale, so the token and its expiry
/// always come from the same exchange.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    slot: Option<TokenState>,
}

impl TokenCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a token has been stored.
    pub fn is_present(&self) -> bool {
        self.slot.is_some()
    }

    /// True iff a token is present and `now >= expires_at`.
    ///
    /// An empty cache is never expired; see [`TokenCache::needs_refresh`].
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.slot
            .as_ref()
            .is_some_and(|state| now >= state.expires_at)
    }

    /// True when no token is present or the stored one has expired at `now`.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        !self.is_present() || self.is_expired(now)
    }

    /// Replaces the stored record.
    pub fn set(&mut self, access_token: impl Into<String>, expires_at: DateTime<Utc>) {
        self.slot = Some(TokenState {
            access_token: access_token.into(),
            expires_at,
        });
    }

    /// The stored record, if any.
    pub fn token(&self) -> Option<&TokenState> {
        self.slot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_empty_cache() {
        let cache = TokenCache::new();
        let now = Utc::now();

        assert!(!cache.is_present());
        assert!(!cache.is_expired(now));
        assert!(cache.needs_refresh(now));
        assert!(cache.token().is_none());
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let expires_at = Utc::now();
        let mut cache = TokenCache::new();
        cache.set("token", expires_at);

        assert!(!cache.is_expired(expires_at - Duration::seconds(1)));
        assert!(!cache.needs_refresh(expires_at - Duration::seconds(1)));
        assert!(cache.is_expired(expires_at));
        assert!(cache.is_expired(expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_set_replaces_whole_record() {
        let now = Utc::now();
        let mut cache = TokenCache::new();
        cache.set("first", now);
        cache.set("second", now + Duration::hours(1));

        let state = cache.token().unwrap();
        assert_eq!(state.access_token, "second");
        assert_eq!(state.expires_at, now + Duration::hours(1));
        assert!(!cache.needs_refresh(now));
    }
}
