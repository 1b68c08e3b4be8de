//! Persistence for credentials and in-flight login attempts.
//!
//! The token store is the sole owner of persisted authentication state;
//! no other component writes tokens or PKCE material directly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{AuthError, Result};
use crate::pkce::PkceContext;

/// Token file name within the muse data directory.
pub const TOKEN_FILE: &str = "tokens.json";

/// Persisted credentials for one provider account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBundle {
    pub access_token: String,
    /// Absent under the implicit grant.
    pub refresh_token: Option<String>,
    /// Epoch milliseconds. Always derived as issuance time plus the
    /// provider-declared lifetime, never hand-set otherwise.
    pub expires_at: u64,
}

/// On-disk layout: the credential bundle plus the transient PKCE context
/// of an in-flight login attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredState {
    #[serde(default)]
    tokens: Option<TokenBundle>,
    #[serde(default)]
    pkce: Option<PkceContext>,
}

// ============================================================================
// TokenStore Trait
// ============================================================================

/// Owner of persisted authentication state.
#[async_trait]
pub trait TokenStore: Send + Sync + std::fmt::Debug {
    /// Load the stored credential bundle, if any.
    async fn tokens(&self) -> Result<Option<TokenBundle>>;

    /// Persist a credential bundle.
    async fn save_tokens(&self, tokens: &TokenBundle) -> Result<()>;

    /// Remove stored credentials. Idempotent.
    async fn clear_tokens(&self) -> Result<()>;

    /// Persist the PKCE context for an in-flight login attempt.
    async fn save_pkce(&self, pkce: &PkceContext) -> Result<()>;

    /// Load the in-flight PKCE context, if any.
    async fn pkce(&self) -> Result<Option<PkceContext>>;

    /// Remove the PKCE context. Idempotent.
    async fn clear_pkce(&self) -> Result<()>;
}

/// Shared token store for use across async contexts.
pub type SharedTokenStore = Arc<dyn TokenStore>;

/// Create a shared file-backed store rooted at `data_dir`.
pub fn file_store(data_dir: &Path) -> SharedTokenStore {
    Arc::new(FileTokenStore::new(data_dir))
}

/// Create a shared in-memory store (tests and embedders).
pub fn memory_store() -> SharedTokenStore {
    Arc::new(MemoryTokenStore::new())
}

// ============================================================================
// FileTokenStore
// ============================================================================

/// File-backed token store for production use.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    cached: RwLock<Option<StoredState>>,
}

impl FileTokenStore {
    /// Create a store persisting to `data_dir/tokens.json`.
    pub fn new(data_dir: &Path) -> Self {
        Self::with_path(data_dir.join(TOKEN_FILE))
    }

    /// Create a store with an explicit file path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            cached: RwLock::new(None),
        }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_state(&self) -> Result<StoredState> {
        {
            let cache = self.cached.read().await;
            if let Some(state) = cache.as_ref() {
                return Ok(state.clone());
            }
        }

        let state = if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)
                .map_err(|e| AuthError::Storage(format!("failed to read token file: {e}")))?;
            serde_json::from_str(&content)
                .map_err(|e| AuthError::Serialization(format!("failed to parse token file: {e}")))?
        } else {
            StoredState::default()
        };

        let mut cache = self.cached.write().await;
        *cache = Some(state.clone());
        Ok(state)
    }

    async fn save_state(&self, state: StoredState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AuthError::Storage(format!("failed to create token directory: {e}")))?;
        }

        let json = serde_json::to_string_pretty(&state)
            .map_err(|e| AuthError::Serialization(format!("failed to serialize tokens: {e}")))?;

        std::fs::write(&self.path, json)
            .map_err(|e| AuthError::Storage(format!("failed to write token file: {e}")))?;

        let mut cache = self.cached.write().await;
        *cache = Some(state);

        tracing::debug!("auth state saved to {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn tokens(&self) -> Result<Option<TokenBundle>> {
        Ok(self.load_state().await?.tokens)
    }

    async fn save_tokens(&self, tokens: &TokenBundle) -> Result<()> {
        let mut state = self.load_state().await?;
        state.tokens = Some(tokens.clone());
        self.save_state(state).await
    }

    async fn clear_tokens(&self) -> Result<()> {
        let mut state = self.load_state().await?;
        state.tokens = None;
        self.save_state(state).await
    }

    async fn save_pkce(&self, pkce: &PkceContext) -> Result<()> {
        let mut state = self.load_state().await?;
        state.pkce = Some(pkce.clone());
        self.save_state(state).await
    }

    async fn pkce(&self) -> Result<Option<PkceContext>> {
        Ok(self.load_state().await?.pkce)
    }

    async fn clear_pkce(&self) -> Result<()> {
        let mut state = self.load_state().await?;
        state.pkce = None;
        self.save_state(state).await
    }
}

// ============================================================================
// MemoryTokenStore
// ============================================================================

/// In-memory token store for tests and embedders.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    state: RwLock<StoredState>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a credential bundle.
    pub fn with_tokens(tokens: TokenBundle) -> Self {
        Self {
            state: RwLock::new(StoredState {
                tokens: Some(tokens),
                pkce: None,
            }),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn tokens(&self) -> Result<Option<TokenBundle>> {
        Ok(self.state.read().await.tokens.clone())
    }

    async fn save_tokens(&self, tokens: &TokenBundle) -> Result<()> {
        self.state.write().await.tokens = Some(tokens.clone());
        Ok(())
    }

    async fn clear_tokens(&self) -> Result<()> {
        self.state.write().await.tokens = None;
        Ok(())
    }

    async fn save_pkce(&self, pkce: &PkceContext) -> Result<()> {
        self.state.write().await.pkce = Some(pkce.clone());
        Ok(())
    }

    async fn pkce(&self) -> Result<Option<PkceContext>> {
        Ok(self.state.read().await.pkce.clone())
    }

    async fn clear_pkce(&self) -> Result<()> {
        self.state.write().await.pkce = None;
        Ok(())
    }
}
