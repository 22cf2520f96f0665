use super::{ApiError, client::SpotifyClient};
use crate::{
    management::{TokenRefresher, TokenStore},
    types::{AudioFeatures, SpotifyTrack, Track},
};

/// Fetches one track from the Web API `/tracks/{id}` endpoint.
///
/// # Arguments
///
/// * `client` - Authorized Web API client
/// * `id` - Spotify track id, path-encoded before use
///
/// # Returns
///
/// The track in the application's [`Track`] shape. Artist names are joined
/// with `", "` and the album cover is the first listed image.
pub async fn get_track<S, R>(client: &SpotifyClient<S, R>, id: &str) -> Result<Track, ApiError>
where
    S: TokenStore + Sync,
    R: TokenRefresher + Sync,
{
    let track: SpotifyTrack = client
        .get_json(&format!("/tracks/{}", urlencoding::encode(id)))
        .await?;
    Ok(track.into())
}

/// Energy, valence, danceability and tempo of one track.
pub async fn get_audio_features<S, R>(
    client: &SpotifyClient<S, R>,
    id: &str,
) -> Result<AudioFeatures, ApiError>
where
    S: TokenStore + Sync,
    R: TokenRefresher + Sync,
{
    client
        .get_json(&format!("/audio-features/{}", urlencoding::encode(id)))
        .await
}
