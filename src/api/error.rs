use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::spotify::ApiError;

#[derive(Debug)]
pub enum BridgeError {
    BadRequest(String),
    Upstream(ApiError),
}

impl From<ApiError> for BridgeError {
    fn from(err: ApiError) -> Self {
        BridgeError::Upstream(err)
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            BridgeError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            BridgeError::Upstream(ApiError::Unauthorized) => (
                StatusCode::UNAUTHORIZED,
                "Spotify rejected the access token".to_string(),
            ),
            BridgeError::Upstream(e) => {
                error!(error = %e, "spotify request failed");
                (StatusCode::BAD_GATEWAY, "Spotify request failed".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
