//! # API Module
//!
//! HTTP handlers of the auth bridge. The bridge holds the Spotify client
//! secret and nothing else: tokens are relayed to the client and never
//! stored server-side.
//!
//! ## Endpoints
//!
//! - [`health`] - status and version
//! - [`list_moods`], [`mood_genres`] - mood categories
//! - [`login`] - Spotify authorization URL as `{ "redirectUrl": ... }`
//! - [`callback`] - exchanges the authorization code and redirects to the
//!   client dashboard with the tokens in the URL fragment
//! - [`refresh_token`] - exchanges a refresh token for a new access token
//! - [`search`], [`recommendations`] - Web API search proxied with the
//!   caller's access token
//!
//! All handlers receive the shared [`BridgeState`] through an `Extension`.

mod callback;
mod error;
mod health;
mod login;
mod moods;
mod refresh;
mod search;

use reqwest::Client;

use crate::config::BridgeSettings;

pub use callback::callback;
pub use error::BridgeError;
pub use health::health;
pub use login::login;
pub use moods::list_moods;
pub use moods::mood_genres;
pub use refresh::refresh_token;
pub use search::recommendations;
pub use search::search;

/// Shared state of the bridge handlers.
pub struct BridgeState {
    pub settings: BridgeSettings,
    pub http: Client,
}

impl BridgeState {
    pub fn new(settings: BridgeSettings) -> Self {
        Self {
            settings,
            http: Client::new(),
        }
    }
}
