use reqwest::Client;
use tracing::debug;

use super::{ApiError, ensure_success};
use crate::{
    moods,
    types::{SpotifySearchResponse, Track},
};

pub const MAX_SEARCH_LIMIT: u32 = 50;

/// Searches the Web API for tracks on behalf of the caller's access token.
///
/// `limit` is clamped to `1..=50`, the range the search endpoint accepts.
pub async fn search_tracks(
    client: &Client,
    api_url: &str,
    access_token: &str,
    query: &str,
    limit: u32,
) -> Result<Vec<Track>, ApiError> {
    let limit = limit.clamp(1, MAX_SEARCH_LIMIT).to_string();
    let res = client
        .get(format!("{}/search", api_url.trim_end_matches('/')))
        .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
        .bearer_auth(access_token)
        .send()
        .await?;

    let page: SpotifySearchResponse = ensure_success(res).await?.json().await?;
    debug!(query, results = page.tracks.items.len(), "search finished");
    Ok(page.tracks.items.into_iter().map(Track::from).collect())
}

/// Tracks matching the genres of `mood`.
///
/// The mood is turned into an OR of `genre:` filters (see
/// [`mood_query`](crate::moods::mood_query)); unknown moods use the genres
/// of `happy`.
///
/// # Arguments
///
/// * `client` - HTTP client used for the request
/// * `api_url` - Web API base, e.g. `https://api.spotify.com/v1`
/// * `access_token` - The caller's Spotify access token
/// * `mood` - Mood name, case-insensitive
/// * `limit` - Maximum number of tracks, clamped like [`search_tracks`]
///
/// # Returns
///
/// The mapped tracks, or [`ApiError::Unauthorized`] when Spotify rejects the
/// token.
pub async fn mood_tracks(
    client: &Client,
    api_url: &str,
    access_token: &str,
    mood: &str,
    limit: u32,
) -> Result<Vec<Track>, ApiError> {
    search_tracks(client, api_url, access_token, &moods::mood_query(mood), limit).await
}
