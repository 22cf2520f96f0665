//! Mood categories and the genres used to search for them.

pub const MOODS: [&str; 7] = [
    "happy",
    "sad",
    "energetic",
    "calm",
    "romantic",
    "angry",
    "chill",
];

/// Genres associated with a mood. Unknown moods fall back to `happy`.
pub fn mood_genres(mood: &str) -> &'static [&'static str] {
    match mood.trim().to_lowercase().as_str() {
        "sad" => &["sad", "emo", "indie", "acoustic"],
        "energetic" => &["rock", "metal", "punk", "hip hop"],
        "calm" => &["jazz", "classical", "chill", "ambient"],
        "romantic" => &["love", "romance", "r&b", "soul"],
        "angry" => &["metal", "hard rock", "rap", "hardcore"],
        "chill" => &["chill", "lofi", "jazz", "acoustic"],
        _ => &["happy", "pop", "dance", "electronic"],
    }
}

pub fn is_known_mood(mood: &str) -> bool {
    let mood = mood.trim().to_lowercase();
    MOODS.contains(&mood.as_str())
}

/// Search query used to build recommendations for a mood.
pub fn mood_query(mood: &str) -> String {
    mood_genres(mood)
        .iter()
        .map(|g| format!("genre:\"{g}\""))
        .collect::<Vec<_>>()
        .join(" OR ")
}
