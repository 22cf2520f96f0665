use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use moodtune::management::*;
use moodtune::types::TokenGrant;

const HOUR_MS: i64 = 3_600_000;

struct CountingRefresher {
    calls: AtomicUsize,
    fail: bool,
    rotate_refresh: bool,
}

impl CountingRefresher {
    fn ok() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
            rotate_refresh: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::ok()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenRefresher for CountingRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, TokenError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        // Keep the request open long enough for concurrent callers to queue.
        tokio::time::sleep(Duration::from_millis(20)).await;

        if self.fail {
            return Err(TokenError::Rejected(400, "invalid_grant".to_string()));
        }
        Ok(TokenGrant {
            access_token: format!("fresh-{n}-{refresh_token}"),
            refresh_token: self.rotate_refresh.then(|| format!("rotated-{n}")),
            expires_in: 3600,
        })
    }
}

type TestManager = TokenManager<MemoryTokenStore, CountingRefresher>;

fn manager(state: TokenState, refresher: CountingRefresher) -> TestManager {
    TokenManager::new(state.clone(), MemoryTokenStore::new(state), refresher)
}

fn valid_state() -> TokenState {
    TokenState {
        access_token: Some("A".to_string()),
        refresh_token: Some("R".to_string()),
        expires_at_ms: Some(now_ms() + HOUR_MS),
    }
}

fn expired_state() -> TokenState {
    TokenState {
        access_token: Some("A".to_string()),
        refresh_token: Some("R".to_string()),
        expires_at_ms: Some(now_ms() - 1_000),
    }
}

#[test]
fn test_token_state_expiry_boundary() {
    let state = TokenState {
        access_token: Some("A".to_string()),
        refresh_token: None,
        expires_at_ms: Some(1_000),
    };

    assert!(!state.is_expired(1_000));
    assert!(state.is_expired(1_001));
    assert_eq!(state.usable_token(999), Some("A"));
    assert_eq!(state.usable_token(1_001), None);

    let no_expiry = TokenState {
        expires_at_ms: None,
        ..state
    };
    assert!(no_expiry.is_expired(0));
}

#[test]
fn test_token_state_from_grant_keeps_previous_refresh() {
    let grant = TokenGrant {
        access_token: "A2".to_string(),
        refresh_token: None,
        expires_in: 60,
    };

    let state = TokenState::from_grant(grant, 10_000, Some("R".to_string()));

    assert_eq!(state.access_token.as_deref(), Some("A2"));
    assert_eq!(state.refresh_token.as_deref(), Some("R"));
    assert_eq!(state.expires_at_ms, Some(70_000));
}

#[tokio::test]
async fn test_valid_token_needs_no_refresh() {
    let m = manager(valid_state(), CountingRefresher::ok());

    assert_eq!(m.get_valid_token().await.as_deref(), Some("A"));
    assert_eq!(m.refresher_calls(), 0);
    assert_eq!(m.store().save_count(), 0);
}

#[tokio::test]
async fn test_expired_token_is_refreshed_once() {
    let m = manager(expired_state(), CountingRefresher::ok());

    let token = m.get_valid_token().await;

    assert_eq!(token.as_deref(), Some("fresh-1-R"));
    assert_eq!(m.refresher_calls(), 1);

    let state = m.snapshot().await;
    assert_eq!(state.access_token.as_deref(), Some("fresh-1-R"));
    assert_eq!(state.refresh_token.as_deref(), Some("R"));
    assert!(state.expires_at_ms.unwrap() > now_ms());
    assert_eq!(m.store().saved(), state);

    // The refreshed token is served without another request.
    assert_eq!(m.get_valid_token().await.as_deref(), Some("fresh-1-R"));
    assert_eq!(m.refresher_calls(), 1);
}

#[tokio::test]
async fn test_concurrent_callers_share_one_refresh() {
    let m = Arc::new(manager(expired_state(), CountingRefresher::ok()));

    let (a, b, c) = tokio::join!(m.get_valid_token(), m.get_valid_token(), m.get_valid_token());

    assert_eq!(m.refresher_calls(), 1);
    assert_eq!(a.as_deref(), Some("fresh-1-R"));
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[tokio::test]
async fn test_concurrent_callers_on_separate_tasks() {
    let m = Arc::new(manager(expired_state(), CountingRefresher::ok()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let m = Arc::clone(&m);
            tokio::spawn(async move { m.get_valid_token().await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().as_deref(), Some("fresh-1-R"));
    }
    assert_eq!(m.refresher_calls(), 1);
}

#[tokio::test]
async fn test_failed_refresh_unlinks() {
    let m = manager(expired_state(), CountingRefresher::failing());

    assert_eq!(m.get_valid_token().await, None);

    assert_eq!(m.refresher_calls(), 1);
    assert_eq!(m.snapshot().await, TokenState::default());
    assert_eq!(m.store().saved(), TokenState::default());
    assert!(!m.is_linked().await);

    // Nothing left to refresh with.
    assert_eq!(m.get_valid_token().await, None);
    assert_eq!(m.refresher_calls(), 1);
}

#[tokio::test]
async fn test_expired_without_refresh_token_unlinks() {
    let state = TokenState {
        refresh_token: None,
        ..expired_state()
    };
    let m = manager(state, CountingRefresher::ok());

    assert_eq!(m.get_valid_token().await, None);
    assert_eq!(m.refresher_calls(), 0);
    assert_eq!(m.store().saved(), TokenState::default());
}

#[tokio::test]
async fn test_unlinked_manager_does_nothing() {
    let m = manager(TokenState::default(), CountingRefresher::ok());

    assert_eq!(m.get_valid_token().await, None);
    assert_eq!(m.refresher_calls(), 0);
    assert_eq!(m.store().save_count(), 0);
}

#[tokio::test]
async fn test_rotated_refresh_token_is_stored() {
    let refresher = CountingRefresher {
        rotate_refresh: true,
        ..CountingRefresher::ok()
    };
    let m = manager(expired_state(), refresher);

    m.get_valid_token().await;

    assert_eq!(
        m.snapshot().await.refresh_token.as_deref(),
        Some("rotated-1")
    );
}

#[tokio::test]
async fn test_force_refresh_reuses_replacement() {
    let m = manager(valid_state(), CountingRefresher::ok());

    // Someone else already replaced "stale".
    assert_eq!(m.force_refresh("stale").await.as_deref(), Some("A"));
    assert_eq!(m.refresher_calls(), 0);

    assert_eq!(m.force_refresh("A").await.as_deref(), Some("fresh-1-R"));
    assert_eq!(m.refresher_calls(), 1);
}

#[tokio::test]
async fn test_accept_fragment_consumes_it() {
    let m = manager(TokenState::default(), CountingRefresher::ok());
    let mut fragment = "#access_token=A&refresh_token=R&expires_in=3600".to_string();

    let before = now_ms();
    assert!(m.accept_fragment(&mut fragment).await.unwrap());

    assert!(fragment.is_empty());
    let state = m.snapshot().await;
    assert_eq!(state.access_token.as_deref(), Some("A"));
    assert_eq!(state.refresh_token.as_deref(), Some("R"));
    let expiry = state.expires_at_ms.unwrap();
    assert!(expiry >= before + HOUR_MS && expiry <= now_ms() + HOUR_MS);
    assert_eq!(m.store().saved(), state);

    // A second read finds nothing to replay.
    assert!(!m.accept_fragment(&mut fragment).await.unwrap());
    assert_eq!(m.store().save_count(), 1);
}

#[tokio::test]
async fn test_accept_fragment_without_token() {
    let m = manager(TokenState::default(), CountingRefresher::ok());
    let mut fragment = "#error=access_denied".to_string();

    assert!(!m.accept_fragment(&mut fragment).await.unwrap());
    assert!(fragment.is_empty());
    assert!(!m.is_linked().await);
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let m = manager(valid_state(), CountingRefresher::ok());
    assert!(m.is_linked().await);

    m.logout().await.unwrap();

    assert!(!m.is_linked().await);
    assert_eq!(m.store().saved(), TokenState::default());
}

#[tokio::test]
async fn test_file_store_round_trip() {
    let dir = std::env::temp_dir().join(format!("moodtune-tokens-{}", rand::random::<u64>()));
    let path = dir.join("cache/token.json");
    let store = FileTokenStore::new(&path);

    assert_eq!(store.load().await.unwrap(), TokenState::default());

    let state = valid_state();
    store.save(&state).await.unwrap();

    assert_eq!(store.load().await.unwrap(), state);
    assert!(!dir.join("cache/token.json.tmp").exists());

    store.save(&TokenState::default()).await.unwrap();
    assert_eq!(store.load().await.unwrap(), TokenState::default());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_manager_loads_from_file_store() {
    let dir = std::env::temp_dir().join(format!("moodtune-tokens-{}", rand::random::<u64>()));
    let path = dir.join("token.json");
    FileTokenStore::new(&path)
        .save(&valid_state())
        .await
        .unwrap();

    let m = TokenManager::load(FileTokenStore::new(&path), CountingRefresher::ok())
        .await
        .unwrap();

    assert_eq!(m.get_valid_token().await.as_deref(), Some("A"));

    std::fs::remove_dir_all(&dir).unwrap();
}

trait RefresherCalls {
    fn refresher_calls(&self) -> usize;
}

impl RefresherCalls for TestManager {
    fn refresher_calls(&self) -> usize {
        self.refresher().calls()
    }
}
