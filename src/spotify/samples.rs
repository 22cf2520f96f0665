//! Tracks served when no Spotify data can be obtained.
//!
//! The general samples carry no preview of their own; their ids are keys of
//! the bundled fallback catalog, which supplies the audio.

use crate::types::{Track, TrackAlbum, TrackArtist};

fn sample(
    id: &str,
    title: &str,
    artist: &str,
    album: &str,
    cover: &str,
    preview: Option<&str>,
) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        artist: TrackArtist {
            name: artist.to_string(),
        },
        album: TrackAlbum {
            title: album.to_string(),
            cover_medium: Some(format!(
                "https://e-cdns-images.dzcdn.net/images/cover/{cover}/250x250-000000-80-0-0.jpg"
            )),
        },
        preview: preview.map(str::to_string),
    }
}

pub fn sample_tracks() -> Vec<Track> {
    vec![
        sample(
            "hindi1",
            "Raataan Lambiyan",
            "Jubin Nautiyal, Asees Kaur",
            "Shershaah",
            "30d377c78edd4694c2979a83a707da4e",
            None,
        ),
        sample(
            "hindi2",
            "Kesariya",
            "Arijit Singh",
            "Brahmastra",
            "9c3068df4f608e6a086e9e5fd22b95ab",
            None,
        ),
        sample(
            "hindi3",
            "Chaiyya Chaiyya",
            "Sukhwinder Singh, Sapna Awasthi",
            "Dil Se",
            "3ed374dbce1f41bac103f1c0574a1063",
            None,
        ),
        sample(
            "hindi4",
            "Kala Chashma",
            "Amar Arshi, Badshah, Neha Kakkar",
            "Baar Baar Dekho",
            "e8c3e169b837cf489725f92860805748",
            None,
        ),
        sample(
            "english1",
            "Happy",
            "Pharrell Williams",
            "G I R L",
            "b72d2a95edb26290b0ed1d50f3abe9e2",
            None,
        ),
        sample(
            "english2",
            "Blinding Lights",
            "The Weeknd",
            "After Hours",
            "fd00ebd6d30d7253a0d32cbef62e8990",
            None,
        ),
        sample(
            "english3",
            "Dance Monkey",
            "Tones and I",
            "The Kids Are Coming",
            "a95cbeb974c4a7a18bfbd95e31f07bc1",
            None,
        ),
    ]
}

pub fn hindi_sample_tracks() -> Vec<Track> {
    vec![
        sample(
            "701",
            "Raataan Lambiyan",
            "Jubin Nautiyal, Asees Kaur",
            "Shershaah",
            "30d377c78edd4694c2979a83a707da4e",
            Some("https://cdns-preview-7.dzcdn.net/stream/c-74e01b78405a3c3b922035b718de4a00-3.mp3"),
        ),
        sample(
            "702",
            "Kesariya",
            "Arijit Singh",
            "Brahmastra",
            "9c3068df4f608e6a086e9e5fd22b95ab",
            Some("https://cdns-preview-d.dzcdn.net/stream/c-d63da5a566c95c8da93545fae423cc0f-3.mp3"),
        ),
        sample(
            "703",
            "Chaiyya Chaiyya",
            "Sukhwinder Singh, Sapna Awasthi",
            "Dil Se",
            "3ed374dbce1f41bac103f1c0574a1063",
            Some("https://cdns-preview-7.dzcdn.net/stream/c-7aa136ec7d02b409bb4f79042633853b-5.mp3"),
        ),
    ]
}
