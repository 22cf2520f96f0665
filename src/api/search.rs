use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query},
};

use super::{BridgeError, BridgeState};
use crate::{
    moods, spotify,
    types::{AccessParams, SearchParams, Track},
};

const DEFAULT_LIMIT: u32 = 20;

/// `GET /api/spotify/search?query=..&access_token=..[&limit=..]`
///
/// Proxies the Web API search with the caller's token. `limit` defaults to
/// 20 and is clamped to the Web API maximum.
pub async fn search(
    Query(params): Query<SearchParams>,
    Extension(state): Extension<Arc<BridgeState>>,
) -> Result<Json<Vec<Track>>, BridgeError> {
    if params.query.trim().is_empty() {
        return Err(BridgeError::BadRequest("query is required".to_string()));
    }

    let tracks = spotify::search::search_tracks(
        &state.http,
        &state.settings.spotify_api_url,
        &params.access_token,
        &params.query,
        params.limit.unwrap_or(DEFAULT_LIMIT),
    )
    .await?;
    Ok(Json(tracks))
}

/// `GET /api/spotify/recommendations/{mood}?access_token=..[&limit=..]`
///
/// Searches by the genres of a known mood; unknown moods are a 400.
pub async fn recommendations(
    Path(mood): Path<String>,
    Query(params): Query<AccessParams>,
    Extension(state): Extension<Arc<BridgeState>>,
) -> Result<Json<Vec<Track>>, BridgeError> {
    if !moods::is_known_mood(&mood) {
        return Err(BridgeError::BadRequest(format!("unknown mood: {mood}")));
    }

    let tracks = spotify::search::mood_tracks(
        &state.http,
        &state.settings.spotify_api_url,
        &params.access_token,
        &mood,
        params.limit.unwrap_or(DEFAULT_LIMIT),
    )
    .await?;
    Ok(Json(tracks))
}
