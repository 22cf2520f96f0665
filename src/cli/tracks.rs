use tabled::Table;

use crate::{
    error, info, moods,
    playback::FallbackCatalog,
    spotify::{ApiError, tracks},
    types::{Track, TrackTableRow},
    utils, warning,
};

use super::{Session, spinner};

pub async fn search(query: String, limit: usize) {
    let query = query.trim();
    if query.is_empty() {
        error!("Search query must not be empty.");
    }

    let session = Session::open().await;
    let pb = spinner(&format!("Searching for \"{query}\"..."));
    let tracks = session.discovery.search_songs(query, limit).await;
    pb.finish_and_clear();

    print_tracks(&tracks, &session.catalog);
}

pub async fn recommend(mood: String) {
    let mood = mood.trim().to_lowercase();
    if !moods::is_known_mood(&mood) {
        warning!("Unknown mood '{}', known moods: {}", mood, moods::MOODS.join(", "));
    }

    let session = Session::open().await;
    let pb = spinner(&format!("Finding {mood} tracks..."));
    let tracks = session.discovery.mood_recommendations(&mood).await;
    pb.finish_and_clear();

    print_tracks(&tracks, &session.catalog);
}

pub async fn hindi(limit: usize) {
    let session = Session::open().await;
    let pb = spinner("Fetching Hindi songs...");
    let tracks = session.discovery.hindi_songs(limit).await;
    pb.finish_and_clear();

    print_tracks(&tracks, &session.catalog);
}

pub async fn track(id: String) {
    let session = Session::open().await;
    if !session.tokens.is_linked().await {
        error!("No Spotify account linked. Run `moodtune link` first.");
    }

    let pb = spinner("Fetching track...");
    let track = tracks::get_track(&session.spotify, &id).await;
    let features = tracks::get_audio_features(&session.spotify, &id).await;
    pb.finish_and_clear();

    let track = match track {
        Ok(track) => track,
        Err(ApiError::Unauthorized) => {
            error!("Spotify rejected the stored token. Run `moodtune link` again.")
        }
        Err(e) => error!("Failed to fetch track {}. Err: {}", id, e),
    };

    print_tracks(std::slice::from_ref(&track), &session.catalog);

    match features {
        Ok(f) => info!(
            "energy {:.2} | valence {:.2} | danceability {:.2} | tempo {:.0} bpm",
            f.energy, f.valence, f.danceability, f.tempo
        ),
        Err(e) => warning!("No audio features for {}. Err: {}", id, e),
    }
}

fn print_tracks(tracks: &[Track], catalog: &FallbackCatalog) {
    if tracks.is_empty() {
        info!("No tracks found.");
        return;
    }

    let mut tracks = tracks.to_vec();
    utils::remove_duplicate_tracks(&mut tracks);

    let mut rng = rand::rng();
    let rows: Vec<TrackTableRow> = tracks
        .iter()
        .map(|t| TrackTableRow {
            title: t.title.clone(),
            artist: t.artist.name.clone(),
            album: t.album.title.clone(),
            source: match catalog.resolve(t, &mut rng) {
                Ok(source) => source.kind.to_string(),
                Err(e) => e.to_string(),
            },
        })
        .collect();

    let table = Table::new(rows);
    println!("{}", table);
}
