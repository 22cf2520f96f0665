use std::sync::Arc;

use reqwest::Client;
use tracing::{debug, warn};

use super::{ApiError, ensure_success, samples};
use crate::{
    management::{TokenManager, TokenRefresher, TokenStore},
    moods,
    types::{LoginResponse, Track},
    utils,
};

/// Client of the Resource API.
///
/// Every call recovers locally: a missing token or a failed request yields
/// bundled sample data (or the built-in mood list) and a log line, never an
/// error.
pub struct Discovery<S, R> {
    http: Client,
    api_url: String,
    tokens: Arc<TokenManager<S, R>>,
}

impl<S, R> Discovery<S, R>
where
    S: TokenStore + Sync,
    R: TokenRefresher + Sync,
{
    /// Creates a client for the Resource API.
    ///
    /// # Arguments
    ///
    /// * `api_url` - Resource API base including the `/api` prefix
    /// * `tokens` - Token manager asked for a valid token before each
    ///   authorized call
    pub fn new(api_url: impl Into<String>, tokens: Arc<TokenManager<S, R>>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Spotify authorization URL relayed by the bridge.
    ///
    /// # Returns
    ///
    /// `None` when the bridge is unreachable or answers with an error; the
    /// failure is logged.
    pub async fn login_url(&self) -> Option<String> {
        let res = self
            .http
            .get(format!("{}/spotify/login", self.api_url))
            .send()
            .await;

        let login = match res {
            Ok(res) => match ensure_success(res).await {
                Ok(res) => res.json::<LoginResponse>().await.map_err(ApiError::from),
                Err(e) => Err(e),
            },
            Err(e) => Err(ApiError::from(e)),
        };

        match login {
            Ok(login) => Some(login.redirect_url),
            Err(e) => {
                warn!(error = %e, "failed to get auth url");
                None
            }
        }
    }

    /// Mood names offered by the Resource API.
    ///
    /// # Returns
    ///
    /// The server's list, or the built-in [`MOODS`](crate::moods::MOODS)
    /// when the request fails or the server returns an empty list.
    pub async fn moods(&self) -> Vec<String> {
        match self.fetch_moods().await {
            Ok(moods) if !moods.is_empty() => moods,
            Ok(_) => moods::MOODS.iter().map(|m| m.to_string()).collect(),
            Err(e) => {
                warn!(error = %e, "failed to fetch moods");
                moods::MOODS.iter().map(|m| m.to_string()).collect()
            }
        }
    }

    /// Searches the catalog.
    ///
    /// Queries that do not already target Hindi content are split: half the
    /// limit (rounded up) for the plain query, the other half for the query
    /// with `bollywood` appended. Results are merged, de-duplicated by id and
    /// truncated to `limit`.
    ///
    /// # Arguments
    ///
    /// * `query` - Free search text
    /// * `limit` - Maximum number of tracks returned
    ///
    /// # Returns
    ///
    /// The search results, or the first `limit` English samples when no
    /// token is available or either search request fails.
    pub async fn search_songs(&self, query: &str, limit: usize) -> Vec<Track> {
        let fallback = || -> Vec<Track> {
            samples::sample_tracks().into_iter().take(limit).collect()
        };

        let Some(token) = self.tokens.get_valid_token().await else {
            warn!("no valid Spotify token available, serving sample tracks");
            return fallback();
        };

        let res = if utils::is_hindi_query(query) {
            self.search(query, &token, limit).await
        } else {
            let regular_limit = limit.div_ceil(2);
            let hindi_limit = limit / 2;
            let hindi_query = format!("{query} bollywood");

            let merged = async {
                let mut tracks = self.search(query, &token, regular_limit).await?;
                if hindi_limit > 0 {
                    tracks.extend(self.search(&hindi_query, &token, hindi_limit).await?);
                }
                Ok::<_, ApiError>(tracks)
            }
            .await;

            merged.map(|mut tracks| {
                utils::remove_duplicate_tracks(&mut tracks);
                tracks.truncate(limit);
                tracks
            })
        };

        match res {
            Ok(tracks) => {
                debug!(query, results = tracks.len(), "search results");
                tracks
            }
            Err(e) => {
                warn!(error = %e, "search failed, serving sample tracks");
                fallback()
            }
        }
    }

    /// Tracks for `mood`, or the English samples when no token is available,
    /// the call fails or nothing matches.
    pub async fn mood_recommendations(&self, mood: &str) -> Vec<Track> {
        let Some(token) = self.tokens.get_valid_token().await else {
            warn!("no valid Spotify token available for recommendations");
            return samples::sample_tracks();
        };

        let path = format!(
            "/spotify/recommendations/{}",
            urlencoding::encode(&mood.trim().to_lowercase())
        );
        match self.fetch_tracks(&path, &[("access_token", token)]).await {
            Ok(tracks) if !tracks.is_empty() => tracks,
            Ok(_) => samples::sample_tracks(),
            Err(e) => {
                warn!(error = %e, mood, "recommendations failed");
                samples::sample_tracks()
            }
        }
    }

    /// Popular Bollywood tracks.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of tracks requested from the search
    ///
    /// # Returns
    ///
    /// The search results, or the bundled Hindi samples when no token is
    /// available or the search fails. The samples ignore `limit`.
    pub async fn hindi_songs(&self, limit: usize) -> Vec<Track> {
        let Some(token) = self.tokens.get_valid_token().await else {
            return samples::hindi_sample_tracks();
        };

        match self.search("bollywood hindi", &token, limit).await {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!(error = %e, "hindi search failed");
                samples::hindi_sample_tracks()
            }
        }
    }

    async fn fetch_moods(&self) -> Result<Vec<String>, ApiError> {
        let res = self
            .http
            .get(format!("{}/moods", self.api_url))
            .send()
            .await?;
        Ok(ensure_success(res).await?.json().await?)
    }

    async fn search(&self, query: &str, token: &str, limit: usize) -> Result<Vec<Track>, ApiError> {
        self.fetch_tracks(
            "/spotify/search",
            &[
                ("query", query.to_string()),
                ("access_token", token.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn fetch_tracks(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<Track>, ApiError> {
        let res = self
            .http
            .get(format!("{}{}", self.api_url, path))
            .query(params)
            .send()
            .await?;
        Ok(ensure_success(res).await?.json().await?)
    }
}
