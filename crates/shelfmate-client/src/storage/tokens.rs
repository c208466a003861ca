//! Token storage.

use async_trait::async_trait;
use shelfmate_types::{StorageFailure, TokenPair};
use std::path::PathBuf;
use tokio::sync::RwLock;

use super::write_atomic;

/// Where the access/refresh token pair lives between runs.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Stored tokens, if signed in.
    async fn load(&self) -> Result<Option<TokenPair>, StorageFailure>;
    /// Replace stored tokens.
    async fn save(&self, tokens: &TokenPair) -> Result<(), StorageFailure>;
    /// Forget stored tokens.
    async fn clear(&self) -> Result<(), StorageFailure>;
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self { tokens: RwLock::new(Some(tokens)) }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<TokenPair>, StorageFailure> {
        Ok(self.tokens.read().await.clone())
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), StorageFailure> {
        *self.tokens.write().await = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageFailure> {
        *self.tokens.write().await = None;
        Ok(())
    }
}

/// JSON file readable only by the owner (mode `0600` on Unix).
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<TokenPair>, StorageFailure> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(tokens) => Ok(Some(tokens)),
            Err(e) => {
                tracing::warn!("Discarding unreadable credentials file: {}", e);
                Ok(None)
            },
        }
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), StorageFailure> {
        let content = serde_json::to_vec_pretty(tokens).map_err(|e| StorageFailure::Corrupted {
            key: "credentials".to_string(),
            message: e.to_string(),
        })?;
        write_atomic(&self.path, &content).await
    }

    async fn clear(&self) -> Result<(), StorageFailure> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
