use std::{
    fmt,
    future::Future,
    io::ErrorKind,
    path::PathBuf,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use super::state::TokenState;

#[derive(Debug)]
pub enum StoreError {
    IoError(std::io::Error),
    SerdeError(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::IoError(e) => write!(f, "token store io error: {e}"),
            StoreError::SerdeError(e) => write!(f, "token store format error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::IoError(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::SerdeError(err)
    }
}

/// Durable home of the [`TokenState`].
///
/// `save` must replace the whole state at once: a reader may never observe an
/// access token next to the expiry of a different one.
pub trait TokenStore {
    fn load(&self) -> impl Future<Output = Result<TokenState, StoreError>> + Send;
    fn save(&self, state: &TokenState) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Stores the token state as JSON on disk.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash leaves either the old or the new document.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<TokenState, StoreError> {
        match async_fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(TokenState::default()),
            Err(e) => Err(StoreError::IoError(e)),
        }
    }

    async fn save(&self, state: &TokenState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.temp_path();
        async_fs::write(&tmp, json).await?;
        async_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Keeps the token state in memory. Counts saves so callers can observe
/// persistence.
#[derive(Default)]
pub struct MemoryTokenStore {
    state: Mutex<TokenState>,
    saves: AtomicUsize,
}

impl MemoryTokenStore {
    pub fn new(state: TokenState) -> Self {
        Self {
            state: Mutex::new(state),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn saved(&self) -> TokenState {
        match self.state.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<TokenState, StoreError> {
        Ok(self.saved())
    }

    async fn save(&self, state: &TokenState) -> Result<(), StoreError> {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = state.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
