use std::sync::Arc;

use crate::{
    config::ClientSettings,
    management::{BridgeRefresher, FileTokenStore, SessionTokens, TokenState},
    playback::FallbackCatalog,
    spotify::{client::SpotifyClient, discovery::Discovery},
    warning,
};

/// Everything a client command needs, wired from [`ClientSettings`].
pub struct Session {
    pub settings: ClientSettings,
    pub tokens: Arc<SessionTokens>,
    pub discovery: Discovery<FileTokenStore, BridgeRefresher>,
    pub spotify: SpotifyClient<FileTokenStore, BridgeRefresher>,
    pub catalog: FallbackCatalog,
}

impl Session {
    pub async fn open() -> Self {
        let settings = ClientSettings::from_env();

        let tokens = match SessionTokens::load(
            FileTokenStore::new(settings.token_path.clone()),
            BridgeRefresher::new(settings.api_url.clone()),
        )
        .await
        {
            Ok(tokens) => tokens,
            Err(e) => {
                warning!("Stored tokens are unreadable, continuing unlinked. Err: {}", e);
                SessionTokens::new(
                    TokenState::default(),
                    FileTokenStore::new(settings.token_path.clone()),
                    BridgeRefresher::new(settings.api_url.clone()),
                )
            }
        };
        let tokens = Arc::new(tokens);

        let catalog = match &settings.fallback_catalog {
            Some(path) => match FallbackCatalog::from_json_file(path).await {
                Ok(catalog) => catalog,
                Err(e) => {
                    warning!("Using bundled fallback catalog. Err: {}", e);
                    FallbackCatalog::bundled()
                }
            },
            None => FallbackCatalog::bundled(),
        };

        Self {
            discovery: Discovery::new(settings.api_url.clone(), Arc::clone(&tokens)),
            spotify: SpotifyClient::new(settings.spotify_api_url.clone(), Arc::clone(&tokens)),
            settings,
            tokens,
            catalog,
        }
    }
}
