use std::sync::Arc;

use axum::{Extension, Json};

use super::{BridgeError, BridgeState};
use crate::{
    spotify,
    types::{RefreshRequest, TokenGrant},
};

/// `POST /api/spotify/refresh-token`
///
/// Body `{ "refresh_token": "..." }`. Answers with the new grant; its
/// `refresh_token` is only present when Spotify rotated it. A blank refresh
/// token is a 400, a rejection by Spotify is passed on with its status.
pub async fn refresh_token(
    Extension(state): Extension<Arc<BridgeState>>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenGrant>, BridgeError> {
    if body.refresh_token.trim().is_empty() {
        return Err(BridgeError::BadRequest(
            "refresh_token is required".to_string(),
        ));
    }

    let grant =
        spotify::auth::refresh_grant(&state.http, &state.settings, &body.refresh_token).await?;
    Ok(Json(grant))
}
