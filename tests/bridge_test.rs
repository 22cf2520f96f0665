use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use moodtune::api::BridgeState;
use moodtune::config::BridgeSettings;
use moodtune::management::*;
use moodtune::spotify::{ApiError, client::SpotifyClient, discovery::Discovery, samples, tracks};
use moodtune::types::{LoginResponse, TokenGrant, Track};
use moodtune::{moods, server, utils};
use serde_json::{Value, json};

const CLIENT_APP: &str = "http://localhost:3000";
const CLIENT_ID: &str = "cid";
const CLIENT_SECRET: &str = "secret";

fn spotify_track(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Song {id}"),
        "artists": [{ "name": "X" }, { "name": "Y" }],
        "album": { "name": "Album", "images": [{ "url": "https://img.example/1.jpg" }] },
        "preview_url": null
    })
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": { "status": 401, "message": "Invalid access token" } })),
    )
        .into_response()
}

fn bearer(headers: &HeaderMap) -> &str {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default()
}

async fn fake_token(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> Response {
    let expected = utils::basic_auth_header(CLIENT_ID, CLIENT_SECRET);
    if headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid_client" })))
            .into_response();
    }

    let grant_type = form.get("grant_type").map(String::as_str);
    let code = form.get("code").map(String::as_str);
    let refresh = form.get("refresh_token").map(String::as_str);

    match (grant_type, code, refresh) {
        (Some("authorization_code"), Some("good"), _) => Json(json!({
            "access_token": "A",
            "token_type": "Bearer",
            "scope": "user-read-private",
            "expires_in": 3600,
            "refresh_token": "R"
        }))
        .into_response(),
        (Some("refresh_token"), _, Some("R")) => Json(json!({
            "access_token": "A2",
            "token_type": "Bearer",
            "expires_in": 3600
        }))
        .into_response(),
        _ => (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_grant" }))).into_response(),
    }
}

async fn fake_search(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    if !matches!(bearer(&headers), "A" | "A2") {
        return unauthorized();
    }

    let q = params.get("q").cloned().unwrap_or_default();
    let limit: usize = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(20);

    let ids: &[&str] = if q.contains("bollywood") {
        &["s1", "h1", "h2"]
    } else if q.contains("genre:") {
        &["m1", "m2"]
    } else {
        &["s1", "s2", "s3"]
    };
    let items: Vec<Value> = ids.iter().take(limit).map(|id| spotify_track(id)).collect();

    Json(json!({ "tracks": { "items": items } })).into_response()
}

// Only the refreshed token is accepted here.
async fn fake_track(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if bearer(&headers) != "A2" {
        return unauthorized();
    }
    Json(spotify_track(&id)).into_response()
}

async fn fake_audio_features() -> Response {
    unauthorized()
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

struct TestEnv {
    spotify: String,
    bridge: String,
    http: reqwest::Client,
}

impl TestEnv {
    async fn start() -> Self {
        let fake = Router::new()
            .route("/api/token", post(fake_token))
            .route("/v1/search", get(fake_search))
            .route("/v1/tracks/{id}", get(fake_track))
            .route("/v1/audio-features/{id}", get(fake_audio_features));
        let spotify = spawn(fake).await;

        let settings = BridgeSettings {
            server_address: "127.0.0.1:0".to_string(),
            client_id: CLIENT_ID.to_string(),
            client_secret: CLIENT_SECRET.to_string(),
            redirect_uri: "http://127.0.0.1/api/spotify/callback".to_string(),
            client_app_url: CLIENT_APP.to_string(),
            spotify_auth_url: format!("{spotify}/authorize"),
            spotify_token_url: format!("{spotify}/api/token"),
            spotify_api_url: format!("{spotify}/v1"),
            scope: "user-read-private user-read-email".to_string(),
        };
        let bridge = spawn(server::router(Arc::new(BridgeState::new(settings)))).await;

        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            spotify,
            bridge,
            http,
        }
    }

    fn api_url(&self) -> String {
        format!("{}/api", self.bridge)
    }

    fn tokens(&self, state: TokenState) -> Arc<TokenManager<MemoryTokenStore, BridgeRefresher>> {
        Arc::new(TokenManager::new(
            state.clone(),
            MemoryTokenStore::new(state),
            BridgeRefresher::new(self.api_url()),
        ))
    }

    async fn location(&self, path_and_query: &str) -> String {
        let res = self
            .http
            .get(format!("{}{}", self.bridge, path_and_query))
            .send()
            .await
            .unwrap();
        assert!(res.status().is_redirection(), "status {}", res.status());
        res.headers()
            .get("location")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }
}

fn linked(access: &str) -> TokenState {
    TokenState {
        access_token: Some(access.to_string()),
        refresh_token: Some("R".to_string()),
        expires_at_ms: Some(now_ms() + 3_600_000),
    }
}

fn ids(tracks: &[Track]) -> Vec<&str> {
    tracks.iter().map(|t| t.id.as_str()).collect()
}

#[tokio::test]
async fn test_health_and_moods() {
    let env = TestEnv::start().await;

    let health: Value = env
        .http
        .get(format!("{}/health", env.bridge))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let listed: Vec<String> = env
        .http
        .get(format!("{}/api/moods", env.bridge))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed, moods::MOODS.to_vec());

    let genres: Vec<String> = env
        .http
        .get(format!("{}/api/moods/sad/genres", env.bridge))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(genres, moods::mood_genres("sad").to_vec());

    let unknown = env
        .http
        .get(format!("{}/api/moods/grumpy/genres", env.bridge))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_returns_authorization_url() {
    let env = TestEnv::start().await;

    let login: LoginResponse = env
        .http
        .get(format!("{}/api/spotify/login", env.bridge))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let url = reqwest::Url::parse(&login.redirect_url).unwrap();
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
    assert!(login.redirect_url.starts_with(&format!("{}/authorize?", env.spotify)));
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["client_id"], CLIENT_ID);
    assert_eq!(params["scope"], "user-read-private user-read-email");
    assert_eq!(params["redirect_uri"], "http://127.0.0.1/api/spotify/callback");
}

#[tokio::test]
async fn test_callback_redirects_with_token_fragment() {
    let env = TestEnv::start().await;

    let location = env.location("/api/spotify/callback?code=good").await;

    let (base, fragment) = location.split_once('#').unwrap();
    assert_eq!(base, format!("{CLIENT_APP}/dashboard"));
    assert_eq!(
        utils::parse_token_fragment(fragment),
        Some(TokenGrant {
            access_token: "A".to_string(),
            refresh_token: Some("R".to_string()),
            expires_in: 3600,
        })
    );
}

#[tokio::test]
async fn test_callback_failures_redirect_with_error() {
    let env = TestEnv::start().await;

    assert_eq!(
        env.location("/api/spotify/callback?error=access_denied").await,
        format!("{CLIENT_APP}/?error=access_denied")
    );
    assert_eq!(
        env.location("/api/spotify/callback").await,
        format!("{CLIENT_APP}/?error=missing_code")
    );

    let failed = env.location("/api/spotify/callback?code=bad").await;
    assert!(failed.starts_with(&format!("{CLIENT_APP}/?error=")));
    assert!(!failed.contains('#'));
}

#[tokio::test]
async fn test_refresh_token_endpoint() {
    let env = TestEnv::start().await;
    let url = format!("{}/api/spotify/refresh-token", env.bridge);

    let grant: TokenGrant = env
        .http
        .post(&url)
        .json(&json!({ "refresh_token": "R" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(grant.access_token, "A2");
    assert_eq!(grant.refresh_token, None);
    assert_eq!(grant.expires_in, 3600);

    let empty = env
        .http
        .post(&url)
        .json(&json!({ "refresh_token": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let rejected = env
        .http
        .post(&url)
        .json(&json!({ "refresh_token": "revoked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_search_endpoint() {
    let env = TestEnv::start().await;
    let url = format!("{}/api/spotify/search", env.bridge);

    let found: Vec<Track> = env
        .http
        .get(&url)
        .query(&[("query", "lofi"), ("access_token", "A"), ("limit", "2")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ids(&found), vec!["s1", "s2"]);
    assert_eq!(found[0].artist.name, "X, Y");
    assert_eq!(
        found[0].album.cover_medium.as_deref(),
        Some("https://img.example/1.jpg")
    );
    assert_eq!(found[0].preview, None);

    let rejected = env
        .http
        .get(&url)
        .query(&[("query", "lofi"), ("access_token", "nope")])
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);

    let blank = env
        .http
        .get(&url)
        .query(&[("query", " "), ("access_token", "A")])
        .send()
        .await
        .unwrap();
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommendations_endpoint() {
    let env = TestEnv::start().await;

    let found: Vec<Track> = env
        .http
        .get(format!("{}/api/spotify/recommendations/happy", env.bridge))
        .query(&[("access_token", "A")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ids(&found), vec!["m1", "m2"]);

    let unknown = env
        .http
        .get(format!("{}/api/spotify/recommendations/grumpy", env.bridge))
        .query(&[("access_token", "A")])
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_discovery_search_mixes_and_dedupes() {
    let env = TestEnv::start().await;
    let discovery = Discovery::new(env.api_url(), env.tokens(linked("A")));

    // "lofi" (2) + "lofi bollywood" (2): s1, s2, s1, h1
    let found = discovery.search_songs("lofi", 4).await;
    assert_eq!(ids(&found), vec!["s1", "s2", "h1"]);

    // Hindi queries are sent as they are.
    let hindi = discovery.search_songs("bollywood hits", 2).await;
    assert_eq!(ids(&hindi), vec!["s1", "h1"]);
}

#[tokio::test]
async fn test_discovery_recommendations_and_moods() {
    let env = TestEnv::start().await;
    let discovery = Discovery::new(env.api_url(), env.tokens(linked("A")));

    assert_eq!(ids(&discovery.mood_recommendations("Happy").await), vec!["m1", "m2"]);
    assert_eq!(discovery.mood_recommendations("grumpy").await, samples::sample_tracks());
    assert_eq!(discovery.moods().await, moods::MOODS.to_vec());
    assert!(
        discovery
            .login_url()
            .await
            .unwrap()
            .starts_with(&format!("{}/authorize?", env.spotify))
    );
}

#[tokio::test]
async fn test_discovery_refreshes_expired_token_through_bridge() {
    let env = TestEnv::start().await;
    let tokens = env.tokens(TokenState {
        expires_at_ms: Some(now_ms() - 1_000),
        ..linked("stale")
    });
    let discovery = Discovery::new(env.api_url(), Arc::clone(&tokens));

    let found = discovery.search_songs("bollywood", 3).await;

    assert_eq!(ids(&found), vec!["s1", "h1", "h2"]);
    let state = tokens.snapshot().await;
    assert_eq!(state.access_token.as_deref(), Some("A2"));
    assert_eq!(state.refresh_token.as_deref(), Some("R"));
    assert_eq!(tokens.store().saved(), state);
}

#[tokio::test]
async fn test_discovery_without_token_serves_samples() {
    let env = TestEnv::start().await;
    let discovery = Discovery::new(env.api_url(), env.tokens(TokenState::default()));

    assert_eq!(
        discovery.search_songs("lofi", 3).await,
        samples::sample_tracks().into_iter().take(3).collect::<Vec<_>>()
    );
    assert_eq!(discovery.mood_recommendations("sad").await, samples::sample_tracks());
    assert_eq!(discovery.hindi_songs(5).await, samples::hindi_sample_tracks());
}

#[tokio::test]
async fn test_discovery_with_unreachable_api() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = format!("http://{}/api", listener.local_addr().unwrap());
    drop(listener);

    let tokens = Arc::new(TokenManager::new(
        linked("A"),
        MemoryTokenStore::default(),
        BridgeRefresher::new(dead.clone()),
    ));
    let discovery = Discovery::new(dead, tokens);

    assert_eq!(discovery.moods().await, moods::MOODS.to_vec());
    assert_eq!(discovery.login_url().await, None);
    assert_eq!(discovery.hindi_songs(5).await, samples::hindi_sample_tracks());
}

#[tokio::test]
async fn test_spotify_client_retries_once_after_401() {
    let env = TestEnv::start().await;
    let tokens = env.tokens(linked("A"));
    let client = SpotifyClient::new(format!("{}/v1", env.spotify), Arc::clone(&tokens));

    let track = tracks::get_track(&client, "t1").await.unwrap();

    assert_eq!(track.id, "t1");
    assert_eq!(track.title, "Song t1");
    assert_eq!(tokens.snapshot().await.access_token.as_deref(), Some("A2"));
}

#[tokio::test]
async fn test_spotify_client_gives_up_after_second_401() {
    let env = TestEnv::start().await;
    let tokens = env.tokens(linked("A"));
    let client = SpotifyClient::new(format!("{}/v1", env.spotify), Arc::clone(&tokens));

    let res = tracks::get_audio_features(&client, "t1").await;

    assert!(matches!(res, Err(ApiError::Unauthorized)));
    // The refreshed token is kept for later calls.
    assert_eq!(tokens.snapshot().await.access_token.as_deref(), Some("A2"));
}

#[tokio::test]
async fn test_spotify_client_without_token() {
    let env = TestEnv::start().await;
    let client = SpotifyClient::new(
        format!("{}/v1", env.spotify),
        env.tokens(TokenState::default()),
    );

    assert!(matches!(
        tracks::get_track(&client, "t1").await,
        Err(ApiError::Unauthorized)
    ));
}
