use serde::{Deserialize, Deserializer, Serialize};
use tabled::Tabled;

/// A playable song item as returned by the Resource API and the bridge.
///
/// The shape mirrors what the web client consumes: a nested `artist` and
/// `album` object and an optional `preview` URL that may also arrive as an
/// empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub artist: TrackArtist,
    pub album: TrackAlbum,
    #[serde(default)]
    pub preview: Option<String>,
}

impl Track {
    /// Returns the preview URL if one is present and non-blank.
    pub fn preview_url(&self) -> Option<&str> {
        self.preview
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackAlbum {
    pub title: String,
    #[serde(default)]
    pub cover_medium: Option<String>,
}

// Sample data and older records carry numeric ids.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub source: String,
}

/// Token material handed to the client, either through the redirect fragment
/// or a refresh response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "redirectUrl")]
    pub redirect_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub access_token: String,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessParams {
    pub access_token: String,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

fn default_expires_in() -> u64 {
    3600
}

impl From<SpotifyTokenResponse> for TokenGrant {
    fn from(res: SpotifyTokenResponse) -> Self {
        TokenGrant {
            access_token: res.access_token,
            refresh_token: res.refresh_token,
            expires_in: res.expires_in,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifySearchResponse {
    pub tracks: SpotifyTrackPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrackPage {
    pub items: Vec<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub id: String,
    pub name: String,
    pub artists: Vec<SpotifyArtist>,
    pub album: SpotifyAlbum,
    #[serde(default)]
    pub preview_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyAlbum {
    pub name: String,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
}

impl From<SpotifyTrack> for Track {
    fn from(track: SpotifyTrack) -> Self {
        let artist = track
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Track {
            id: track.id,
            title: track.name,
            artist: TrackArtist { name: artist },
            album: TrackAlbum {
                title: track.album.name,
                cover_medium: track.album.images.into_iter().next().map(|i| i.url),
            },
            preview: track.preview_url,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub id: String,
    #[serde(default)]
    pub danceability: f32,
    #[serde(default)]
    pub energy: f32,
    #[serde(default)]
    pub valence: f32,
    #[serde(default)]
    pub tempo: f32,
    #[serde(default)]
    pub acousticness: f32,
}

#[derive(Tabled)]
pub struct MoodTableRow {
    pub mood: String,
    pub genres: String,
}
