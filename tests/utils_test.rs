use moodtune::moods::*;
use moodtune::types::{TokenGrant, Track, TrackAlbum, TrackArtist};
use moodtune::utils::*;

// Helper function to create a test track
fn create_test_track(id: &str, title: &str) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        artist: TrackArtist {
            name: "Test Artist".to_string(),
        },
        album: TrackAlbum {
            title: "Test Album".to_string(),
            cover_medium: None,
        },
        preview: None,
    }
}

#[test]
fn test_basic_auth_header() {
    // base64("id:secret")
    assert_eq!(basic_auth_header("id", "secret"), "Basic aWQ6c2VjcmV0");
}

#[test]
fn test_parse_token_fragment_full() {
    let grant = parse_token_fragment("#access_token=A&refresh_token=R&expires_in=1800").unwrap();

    assert_eq!(grant.access_token, "A");
    assert_eq!(grant.refresh_token.as_deref(), Some("R"));
    assert_eq!(grant.expires_in, 1800);
}

#[test]
fn test_parse_token_fragment_without_hash_and_expiry() {
    let grant = parse_token_fragment("access_token=A").unwrap();

    assert_eq!(grant.access_token, "A");
    assert_eq!(grant.refresh_token, None);
    assert_eq!(grant.expires_in, 3600);
}

#[test]
fn test_parse_token_fragment_requires_access_token() {
    assert!(parse_token_fragment("").is_none());
    assert!(parse_token_fragment("#").is_none());
    assert!(parse_token_fragment("refresh_token=R&expires_in=10").is_none());
    assert!(parse_token_fragment("access_token=&expires_in=10").is_none());
}

#[test]
fn test_parse_token_fragment_decodes_values() {
    let grant = parse_token_fragment("access_token=a%2Bb%3D&expires_in=nope").unwrap();

    assert_eq!(grant.access_token, "a+b=");
    assert_eq!(grant.expires_in, 3600);
}

#[test]
fn test_encode_token_fragment_parses_back() {
    let grant = TokenGrant {
        access_token: "tok/with+chars".to_string(),
        refresh_token: Some("ref".to_string()),
        expires_in: 42,
    };

    let encoded = encode_token_fragment(&grant);
    assert!(encoded.starts_with("access_token=tok%2Fwith%2Bchars"));
    assert_eq!(parse_token_fragment(&encoded), Some(grant));
}

#[test]
fn test_encode_token_fragment_omits_missing_refresh_token() {
    let grant = TokenGrant {
        access_token: "A".to_string(),
        refresh_token: None,
        expires_in: 3600,
    };

    assert_eq!(encode_token_fragment(&grant), "access_token=A&expires_in=3600");
}

#[test]
fn test_fragment_of() {
    assert_eq!(
        fragment_of("http://localhost:3000/dashboard#access_token=A"),
        Some("access_token=A")
    );
    assert_eq!(fragment_of("http://localhost:3000/dashboard"), None);
    assert_eq!(fragment_of("http://localhost:3000/dashboard#"), None);
}

#[test]
fn test_is_hindi_query() {
    assert!(is_hindi_query("Hindi love songs"));
    assert!(is_hindi_query("BOLLYWOOD hits"));
    assert!(is_hindi_query("तुम हि हो"));
    assert!(!is_hindi_query("lofi beats"));
    assert!(!is_hindi_query(""));
}

#[test]
fn test_remove_duplicate_tracks_keeps_first() {
    let mut tracks = vec![
        create_test_track("1", "First"),
        create_test_track("2", "Second"),
        create_test_track("1", "Duplicate"),
        create_test_track("3", "Third"),
    ];

    remove_duplicate_tracks(&mut tracks);

    let titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
}

#[test]
fn test_format_time() {
    assert_eq!(format_time(0.0), "0:00");
    assert_eq!(format_time(5.9), "0:05");
    assert_eq!(format_time(65.0), "1:05");
    assert_eq!(format_time(600.0), "10:00");
    assert_eq!(format_time(-3.0), "0:00");
    assert_eq!(format_time(f64::NAN), "0:00");
    assert_eq!(format_time(f64::INFINITY), "0:00");
}

#[test]
fn test_is_spotify_id() {
    assert!(is_spotify_id("4uLU6hMCjMI75M1A2tKUQC"));
    assert!(!is_spotify_id("lofi beats"));
    assert!(!is_spotify_id("hindi1"));
    assert!(!is_spotify_id("4uLU6hMCjMI75M1A2tKUQ-"));
}

#[test]
fn test_track_preview_url_ignores_blank() {
    let mut track = create_test_track("x", "X");
    assert_eq!(track.preview_url(), None);

    track.preview = Some("  ".to_string());
    assert_eq!(track.preview_url(), None);

    track.preview = Some("https://p.example/x.mp3".to_string());
    assert_eq!(track.preview_url(), Some("https://p.example/x.mp3"));
}

#[test]
fn test_track_accepts_numeric_id() {
    let track: Track = serde_json::from_str(
        r#"{"id":701,"title":"T","artist":{"name":"A"},"album":{"title":"B"},"preview":""}"#,
    )
    .unwrap();

    assert_eq!(track.id, "701");
    assert_eq!(track.preview_url(), None);
}

#[test]
fn test_mood_genres_and_fallback() {
    assert_eq!(MOODS.len(), 7);
    for mood in MOODS {
        assert!(is_known_mood(mood));
        assert!(!mood_genres(mood).is_empty());
    }

    assert!(!is_known_mood("grumpy"));
    assert_eq!(mood_genres("grumpy"), mood_genres("happy"));
}

#[test]
fn test_mood_query() {
    let query = mood_query("happy");
    let genres = mood_genres("happy");

    assert!(query.starts_with(&format!("genre:\"{}\"", genres[0])));
    assert_eq!(query.matches(" OR ").count(), genres.len() - 1);
}
