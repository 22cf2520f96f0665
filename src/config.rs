//! Configuration management for moodtune.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. The process environment always wins over
//! the file, and every setting except the Spotify client credentials has a
//! default.
//!
//! Two settings groups exist because the two halves of the system run in
//! different places: [`BridgeSettings`] configures the auth bridge server
//! (it holds the client secret), [`ClientSettings`] configures the terminal
//! client (it never sees the secret).

use std::{env, fmt, path::PathBuf};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_CLIENT_APP_URL: &str = "http://localhost:3000";
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_SCOPE: &str = "user-read-private user-read-email streaming";

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::Io(e) => write!(f, "config io error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

/// Loads environment variables from `<data_local_dir>/moodtune/.env`.
///
/// Creates the directory if needed. A missing `.env` file is not an error;
/// all settings can come from the process environment instead.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/moodtune/.env`
/// - macOS: `~/Library/Application Support/moodtune/.env`
/// - Windows: `%LOCALAPPDATA%/moodtune/.env`
pub async fn load_env() -> Result<(), ConfigError> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        // dotenv never overrides variables already present in the process
        let _ = dotenv::from_path(&path);
    }
    Ok(())
}

/// Root of moodtune's local data.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("moodtune");
    path
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

/// Settings of the auth bridge server.
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    pub server_address: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Base URL of the client application the callback redirects to.
    pub client_app_url: String,
    pub spotify_auth_url: String,
    pub spotify_token_url: String,
    pub spotify_api_url: String,
    pub scope: String,
}

impl BridgeSettings {
    /// Reads the bridge settings.
    ///
    /// `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and `SPOTIFY_REDIRECT_URI`
    /// are required; the server refuses to start without them.
    ///
    /// # Environment Variables
    ///
    /// - `SERVER_ADDRESS` - Listen address, default `127.0.0.1:5000`
    /// - `SPOTIFY_CLIENT_ID` / `SPOTIFY_CLIENT_SECRET` - App credentials
    /// - `SPOTIFY_REDIRECT_URI` - Callback registered with Spotify, must end
    ///   in `/api/spotify/callback` of this server
    /// - `CLIENT_APP_URL` - Where the callback sends the user afterwards
    /// - `SPOTIFY_AUTH_URL`, `SPOTIFY_TOKEN_URL`, `SPOTIFY_API_URL` -
    ///   Endpoint overrides, mainly for tests
    /// - `SPOTIFY_SCOPE` - Requested scopes
    ///
    /// # Returns
    ///
    /// The settings, or [`ConfigError::Missing`] naming the first required
    /// variable that is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server_address: var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: required("SPOTIFY_REDIRECT_URI")?,
            client_app_url: var_or("CLIENT_APP_URL", DEFAULT_CLIENT_APP_URL),
            spotify_auth_url: var_or("SPOTIFY_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL),
            spotify_token_url: var_or("SPOTIFY_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
            spotify_api_url: var_or("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL),
            scope: var_or("SPOTIFY_SCOPE", DEFAULT_SPOTIFY_SCOPE),
        })
    }
}

/// Settings of the terminal client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Base URL of the Resource API, including the `/api` prefix.
    pub api_url: String,
    pub spotify_api_url: String,
    pub token_path: PathBuf,
    pub fallback_catalog: Option<PathBuf>,
}

impl ClientSettings {
    /// Reads the client settings. Every value has a default, so this never
    /// fails.
    ///
    /// # Environment Variables
    ///
    /// - `MOODTUNE_API_URL` - Resource API base, default
    ///   `http://localhost:5000/api`
    /// - `SPOTIFY_API_URL` - Web API base for track lookups
    /// - `MOODTUNE_TOKEN_PATH` - Token document, default
    ///   `<data_dir>/cache/token.json`
    /// - `MOODTUNE_FALLBACK_CATALOG` - Optional JSON catalog replacing the
    ///   bundled fallback URLs
    pub fn from_env() -> Self {
        let token_path = env::var("MOODTUNE_TOKEN_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join("cache/token.json"));

        Self {
            api_url: var_or("MOODTUNE_API_URL", DEFAULT_API_URL),
            spotify_api_url: var_or("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL),
            token_path,
            fallback_catalog: env::var("MOODTUNE_FALLBACK_CATALOG")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}
