use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tracing::info;

use crate::{
    Res,
    api::{self, BridgeState},
    config::BridgeSettings,
};

/// Routes of the auth bridge.
pub fn router(state: Arc<BridgeState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/api/moods", get(api::list_moods))
        .route("/api/moods/{mood}/genres", get(api::mood_genres))
        .route("/api/spotify/login", get(api::login))
        .route("/api/spotify/callback", get(api::callback))
        .route("/api/spotify/refresh-token", post(api::refresh_token))
        .route("/api/spotify/search", get(api::search))
        .route("/api/spotify/recommendations/{mood}", get(api::recommendations))
        .layer(Extension(state))
}

/// Binds the bridge to `settings.server_address` and serves until the
/// process is stopped.
///
/// # Returns
///
/// An error when the address does not parse, the port cannot be bound or
/// the server fails while running.
pub async fn start_api_server(settings: BridgeSettings) -> Res<()> {
    let addr = SocketAddr::from_str(&settings.server_address)?;
    let app = router(Arc::new(BridgeState::new(settings)));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "auth bridge listening");
    axum::serve(listener, app).await?;
    Ok(())
}
