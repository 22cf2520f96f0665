use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::types::TokenGrant;

/// Current wall clock in milliseconds since the epoch.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// The access/refresh token pair and the instant the access token expires.
///
/// Always persisted as a single document so the three fields change together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at_ms: Option<i64>,
}

impl TokenState {
    /// Builds the state following a grant obtained at `now_ms`.
    ///
    /// A grant without a refresh token keeps `previous_refresh`; the token
    /// endpoint only rotates it occasionally.
    pub fn from_grant(grant: TokenGrant, now_ms: i64, previous_refresh: Option<String>) -> Self {
        let lifetime_ms = i64::try_from(grant.expires_in)
            .unwrap_or(i64::MAX / 2)
            .saturating_mul(1000);

        Self {
            access_token: Some(grant.access_token),
            refresh_token: grant.refresh_token.or(previous_refresh),
            expires_at_ms: Some(now_ms.saturating_add(lifetime_ms)),
        }
    }

    /// Expired means `now > expiry`; a missing expiry counts as expired.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        match self.expires_at_ms {
            Some(expiry) => now_ms > expiry,
            None => true,
        }
    }

    /// The access token, if present and not expired.
    pub fn usable_token(&self, now_ms: i64) -> Option<&str> {
        if self.is_expired(now_ms) {
            return None;
        }
        self.access_token.as_deref()
    }

    /// No token of either kind is held.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}
