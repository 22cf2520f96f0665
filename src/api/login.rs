use std::sync::Arc;

use axum::{Extension, Json};

use super::{BridgeError, BridgeState};
use crate::{spotify, types::LoginResponse};

/// `GET /api/spotify/login` - the authorization URL as `{ "redirectUrl": .. }`.
pub async fn login(
    Extension(state): Extension<Arc<BridgeState>>,
) -> Result<Json<LoginResponse>, BridgeError> {
    let redirect_url = spotify::auth::authorize_url(&state.settings)?;
    Ok(Json(LoginResponse { redirect_url }))
}
