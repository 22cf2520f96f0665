use std::collections::HashSet;

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::types::{TokenGrant, Track};

/// Builds the `Authorization: Basic ...` value for the token endpoint.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let raw = format!("{client_id}:{client_secret}");
    format!("Basic {}", STANDARD.encode(raw))
}

/// Encodes a grant as `access_token=..&refresh_token=..&expires_in=..`.
pub fn encode_token_fragment(grant: &TokenGrant) -> String {
    let mut parts = vec![format!(
        "access_token={}",
        urlencoding::encode(&grant.access_token)
    )];
    if let Some(refresh) = &grant.refresh_token {
        parts.push(format!("refresh_token={}", urlencoding::encode(refresh)));
    }
    parts.push(format!("expires_in={}", grant.expires_in));
    parts.join("&")
}

/// Parses the token fragment delivered on the dashboard redirect.
///
/// Accepts the fragment with or without its leading `#`. Returns `None` when
/// no access token is present. A missing or malformed `expires_in` falls back
/// to one hour.
pub fn parse_token_fragment(fragment: &str) -> Option<TokenGrant> {
    let fragment = fragment.trim().trim_start_matches('#');

    let mut access_token = None;
    let mut refresh_token = None;
    let mut expires_in = None;

    for pair in fragment.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = match urlencoding::decode(value) {
            Ok(v) => v.into_owned(),
            Err(_) => continue,
        };
        match key {
            "access_token" if !value.is_empty() => access_token = Some(value),
            "refresh_token" if !value.is_empty() => refresh_token = Some(value),
            "expires_in" => expires_in = value.parse::<u64>().ok(),
            _ => {}
        }
    }

    Some(TokenGrant {
        access_token: access_token?,
        refresh_token,
        expires_in: expires_in.unwrap_or(3600),
    })
}

/// Returns the fragment part of a URL, without the `#`.
pub fn fragment_of(url: &str) -> Option<&str> {
    url.split_once('#')
        .map(|(_, f)| f)
        .filter(|f| !f.is_empty())
}

/// Whether a search query already targets Hindi content.
pub fn is_hindi_query(query: &str) -> bool {
    let lower = query.to_lowercase();
    query.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c))
        || lower.contains("hindi")
        || lower.contains("bollywood")
}

/// Removes tracks with an id already seen, keeping the first occurrence.
pub fn remove_duplicate_tracks(tracks: &mut Vec<Track>) {
    let mut seen_ids = HashSet::new();
    tracks.retain(|track| seen_ids.insert(track.id.clone()));
}

/// Formats seconds as `m:ss`. Non-finite or negative input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Whether `value` has the shape of a Spotify track id (22 base62 chars).
pub fn is_spotify_id(value: &str) -> bool {
    value.len() == 22 && value.chars().all(|c| c.is_ascii_alphanumeric())
}
