//! # Spotify and Resource API integration
//!
//! Two sides live here:
//!
//! - Bridge side, run by the server with the client secret: [`auth`] builds the
//!   authorization URL and talks to the token endpoint, [`search`] queries the
//!   Web API search endpoint and maps results to [`Track`](crate::types::Track).
//! - Client side, run by the terminal client: [`client`] makes authorized Web
//!   API calls with a single refresh-and-retry on 401, [`tracks`] builds on it,
//!   [`discovery`] calls the Resource API and falls back to [`samples`] when no
//!   token is available or a call fails.
//!
//! ```text
//! CLI ──► discovery ──► Resource API (bridge) ──► Spotify Web API
//!  │                         ▲
//!  └──► client/tracks ───────┼──────────────────► Spotify Web API
//!          │                 │
//!          └── TokenManager ─┘ (refresh via bridge)
//! ```

pub mod auth;
pub mod client;
pub mod discovery;
pub mod samples;
pub mod search;
pub mod tracks;

use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    Http(reqwest::Error),
    Status(u16, String),
    Unauthorized,
    InvalidUrl(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http(e) => write!(f, "request failed: {e}"),
            ApiError::Status(status, body) => write!(f, "unexpected status {status}: {body}"),
            ApiError::Unauthorized => write!(f, "no valid Spotify authorization"),
            ApiError::InvalidUrl(e) => write!(f, "invalid url: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Http(err)
    }
}

/// Maps a non-success response to [`ApiError::Status`].
pub(crate) async fn ensure_success(res: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    let body = res.text().await.unwrap_or_default();
    Err(ApiError::Status(status.as_u16(), body))
}
