use std::{fmt, future::Future};

use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{
    state::{TokenState, now_ms},
    store::{FileTokenStore, StoreError, TokenStore},
};
use crate::{
    types::{RefreshRequest, TokenGrant},
    utils,
};

#[derive(Debug)]
pub enum TokenError {
    Http(reqwest::Error),
    Rejected(u16, String),
    Store(StoreError),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Http(e) => write!(f, "token request failed: {e}"),
            TokenError::Rejected(status, body) => {
                write!(f, "token request rejected ({status}): {body}")
            }
            TokenError::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for TokenError {}

impl From<reqwest::Error> for TokenError {
    fn from(err: reqwest::Error) -> Self {
        TokenError::Http(err)
    }
}

impl From<StoreError> for TokenError {
    fn from(err: StoreError) -> Self {
        TokenError::Store(err)
    }
}

/// Exchanges a refresh token for a new grant.
pub trait TokenRefresher {
    fn refresh(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<TokenGrant, TokenError>> + Send;
}

/// Refreshes through the auth bridge's `/spotify/refresh-token` endpoint, so
/// the client secret never leaves the server.
pub struct BridgeRefresher {
    client: Client,
    api_url: String,
}

impl BridgeRefresher {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl TokenRefresher for BridgeRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, TokenError> {
        let res = self
            .client
            .post(format!("{}/spotify/refresh-token", self.api_url))
            .json(&RefreshRequest {
                refresh_token: refresh_token.to_string(),
            })
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(TokenError::Rejected(status.as_u16(), body));
        }

        let grant: TokenGrant = res.json().await?;
        if grant.access_token.is_empty() {
            return Err(TokenError::Rejected(
                status.as_u16(),
                "empty access token".to_string(),
            ));
        }
        Ok(grant)
    }
}

/// The token manager used by the terminal client.
pub type SessionTokens = TokenManager<FileTokenStore, BridgeRefresher>;

/// Owns the [`TokenState`] and hands out valid access tokens.
///
/// Refreshes go through a gate: at most one refresh is in flight, and
/// callers that queued behind it re-check the state and reuse its result
/// instead of issuing their own request.
pub struct TokenManager<S, R> {
    state: Mutex<TokenState>,
    refresh_gate: Mutex<()>,
    store: S,
    refresher: R,
}

impl<S, R> TokenManager<S, R>
where
    S: TokenStore + Sync,
    R: TokenRefresher + Sync,
{
    /// Creates a manager around an already known state.
    ///
    /// Nothing is written to `store` until the state changes.
    ///
    /// # Arguments
    ///
    /// * `state` - Initial tokens; `TokenState::default()` means unlinked
    /// * `store` - Where every later state change is persisted
    /// * `refresher` - Performs refresh grants when the access token expires
    pub fn new(state: TokenState, store: S, refresher: R) -> Self {
        TokenManager {
            state: Mutex::new(state),
            refresh_gate: Mutex::new(()),
            store,
            refresher,
        }
    }

    /// Builds a manager from whatever the store currently holds.
    ///
    /// An empty store yields an unlinked manager, not an error.
    ///
    /// # Arguments
    ///
    /// * `store` - Source of the initial state and target of later writes
    /// * `refresher` - Performs refresh grants
    ///
    /// # Returns
    ///
    /// The manager, or the [`StoreError`] when the stored document exists
    /// but cannot be read or parsed.
    pub async fn load(store: S, refresher: R) -> Result<Self, StoreError> {
        let state = store.load().await?;
        Ok(Self::new(state, store, refresher))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn refresher(&self) -> &R {
        &self.refresher
    }

    pub async fn snapshot(&self) -> TokenState {
        self.state.lock().await.clone()
    }

    /// Whether a third-party account is linked at all.
    pub async fn is_linked(&self) -> bool {
        !self.state.lock().await.is_empty()
    }

    /// Returns a non-expired access token, refreshing first when needed.
    ///
    /// Concurrent callers holding an expired token share a single refresh
    /// request.
    ///
    /// # Returns
    ///
    /// `None` means the caller has to fall back to sample data: nothing is
    /// linked, there is no refresh token, or the refresh failed.
    pub async fn get_valid_token(&self) -> Option<String> {
        {
            let state = self.state.lock().await;
            if let Some(token) = state.usable_token(now_ms()) {
                return Some(token.to_string());
            }
            if state.is_empty() {
                return None;
            }
        }

        let _gate = self.refresh_gate.lock().await;
        {
            let state = self.state.lock().await;
            if let Some(token) = state.usable_token(now_ms()) {
                debug!("token refreshed by a concurrent caller");
                return Some(token.to_string());
            }
            if state.is_empty() {
                return None;
            }
        }

        self.refresh_locked().await
    }

    /// Refreshes unconditionally.
    pub async fn refresh(&self) -> Option<String> {
        let _gate = self.refresh_gate.lock().await;
        self.refresh_locked().await
    }

    /// Refreshes after `stale` was rejected by the API.
    ///
    /// If another caller already replaced `stale` while this one waited for
    /// the gate, the replacement is returned without a new request.
    pub async fn force_refresh(&self, stale: &str) -> Option<String> {
        let _gate = self.refresh_gate.lock().await;
        {
            let state = self.state.lock().await;
            if let Some(token) = state.usable_token(now_ms()) {
                if token != stale {
                    return Some(token.to_string());
                }
            }
            if state.is_empty() {
                return None;
            }
        }

        self.refresh_locked().await
    }

    /// Stores a grant obtained from the bridge redirect.
    pub async fn accept_grant(&self, grant: TokenGrant) -> Result<(), StoreError> {
        let _gate = self.refresh_gate.lock().await;
        let previous_refresh = self.state.lock().await.refresh_token.clone();
        let next = TokenState::from_grant(grant, now_ms(), previous_refresh);
        self.commit(next).await
    }

    /// Consumes a redirect fragment exactly once.
    ///
    /// The fragment is emptied whether or not it carried tokens, so it cannot
    /// be replayed or linger in history. Returns whether tokens were stored.
    pub async fn accept_fragment(&self, fragment: &mut String) -> Result<bool, StoreError> {
        let raw = std::mem::take(fragment);
        match utils::parse_token_fragment(&raw) {
            Some(grant) => {
                self.accept_grant(grant).await?;
                info!("spotify account linked");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drops all tokens, in memory and on disk.
    pub async fn logout(&self) -> Result<(), StoreError> {
        let _gate = self.refresh_gate.lock().await;
        self.commit(TokenState::default()).await
    }

    // Caller holds the refresh gate.
    async fn refresh_locked(&self) -> Option<String> {
        let refresh_token = self.state.lock().await.refresh_token.clone();
        let Some(refresh_token) = refresh_token else {
            warn!("access token expired and no refresh token is stored");
            self.clear().await;
            return None;
        };

        match self.refresher.refresh(&refresh_token).await {
            Ok(grant) => {
                let next = TokenState::from_grant(grant, now_ms(), Some(refresh_token));
                let token = next.access_token.clone();
                if let Err(e) = self.commit(next).await {
                    warn!(error = %e, "refreshed token could not be persisted");
                }
                debug!("access token refreshed");
                token
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed, unlinking account");
                self.clear().await;
                None
            }
        }
    }

    async fn clear(&self) {
        if let Err(e) = self.commit(TokenState::default()).await {
            warn!(error = %e, "cleared token state could not be persisted");
        }
    }

    // Memory follows the store even if the write fails; the store itself
    // only ever holds complete documents.
    async fn commit(&self, next: TokenState) -> Result<(), StoreError> {
        let persisted = self.store.save(&next).await;
        *self.state.lock().await = next;
        persisted
    }
}
