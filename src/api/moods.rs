use axum::{Json, extract::Path};

use super::BridgeError;
use crate::moods;

pub async fn list_moods() -> Json<Vec<&'static str>> {
    Json(moods::MOODS.to_vec())
}

pub async fn mood_genres(Path(mood): Path<String>) -> Result<Json<Vec<&'static str>>, BridgeError> {
    if !moods::is_known_mood(&mood) {
        return Err(BridgeError::BadRequest(format!("unknown mood: {mood}")));
    }
    Ok(Json(moods::mood_genres(&mood).to_vec()))
}
