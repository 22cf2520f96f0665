use std::sync::Arc;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::{ApiError, ensure_success};
use crate::management::{TokenManager, TokenRefresher, TokenStore};

/// Web API client that always presents a valid token.
///
/// A 401 despite a fresh-looking token triggers one forced refresh and one
/// retry of the same call; a second 401 is returned to the caller.
pub struct SpotifyClient<S, R> {
    http: Client,
    api_url: String,
    tokens: Arc<TokenManager<S, R>>,
}

impl<S, R> SpotifyClient<S, R>
where
    S: TokenStore + Sync,
    R: TokenRefresher + Sync,
{
    /// Creates a client for the Web API at `api_url`.
    ///
    /// # Arguments
    ///
    /// * `api_url` - Web API base such as `https://api.spotify.com/v1`; a
    ///   trailing slash is ignored
    /// * `tokens` - Token manager shared with the rest of the session
    pub fn new(api_url: impl Into<String>, tokens: Arc<TokenManager<S, R>>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Performs an authorized `GET` and decodes the JSON body.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Path below the API base, starting with `/`
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(T)` - The decoded response body
    /// - `Err(ApiError::Unauthorized)` - No token could be obtained, the
    ///   refresh after a 401 failed, or the retry got a 401 as well
    /// - `Err(ApiError::Status)` - Any other non-success status
    /// - `Err(ApiError::Http)` - Network or decoding failure
    ///
    /// # Retry
    ///
    /// Only a 401 is retried, and only once. The refresh goes through
    /// [`TokenManager::force_refresh`], so several calls failing with the
    /// same stale token still share one refresh request.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let token = self
            .tokens
            .get_valid_token()
            .await
            .ok_or(ApiError::Unauthorized)?;

        let res = self.send(endpoint, &token).await?;
        if res.status() != StatusCode::UNAUTHORIZED {
            return Ok(ensure_success(res).await?.json().await?);
        }

        warn!(endpoint, "access token rejected, refreshing once");
        let fresh = self
            .tokens
            .force_refresh(&token)
            .await
            .ok_or(ApiError::Unauthorized)?;

        let retry = self.send(endpoint, &fresh).await?;
        Ok(ensure_success(retry).await?.json().await?)
    }

    async fn send(&self, endpoint: &str, token: &str) -> Result<Response, ApiError> {
        Ok(self
            .http
            .get(format!("{}{}", self.api_url, endpoint))
            .bearer_auth(token)
            .send()
            .await?)
    }
}
