//! File-backed key-value store for settings, cached responses and the
//! offline session queue.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shelfmate_types::{Settings, StorageFailure};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Mutex;

use super::write_atomic;

const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Entry {
    value: serde_json::Value,
    /// Unix seconds after which the entry is treated as absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<i64>,
}

impl Entry {
    fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// JSON map persisted to a single file. Every mutation rewrites the file
/// atomically while the lock is held, so writers never interleave.
#[derive(Debug)]
pub struct KeyValueStore {
    path: Option<PathBuf>,
    entries: Mutex<BTreeMap<String, Entry>>,
}

impl KeyValueStore {
    /// Open the store at `path`. A missing file yields an empty store; an
    /// unreadable one is logged and replaced on the next write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageFailure> {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Store {} is corrupted, starting empty: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path: Some(path), entries: Mutex::new(entries) })
    }

    /// Store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self { path: None, entries: Mutex::new(BTreeMap::new()) }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Typed read. Expired entries read as `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageFailure> {
        let entries = self.entries.lock().await;
        let Some(entry) = entries.get(key) else {
            return Ok(None);
        };
        if entry.is_expired(Utc::now().timestamp()) {
            return Ok(None);
        }
        serde_json::from_value(entry.value.clone())
            .map(Some)
            .map_err(|e| StorageFailure::Corrupted { key: key.to_string(), message: e.to_string() })
    }

    /// Typed write without expiry.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageFailure> {
        self.insert(key, value, None).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), StorageFailure> {
        let mut entries = self.entries.lock().await;
        if entries.remove(key).is_some() {
            self.persist(&entries).await?;
        }
        Ok(())
    }

    /// Drop every entry.
    pub async fn clear(&self) -> Result<(), StorageFailure> {
        let mut entries = self.entries.lock().await;
        entries.clear();
        self.persist(&entries).await
    }

    /// Cache `value` under `key` for `ttl`.
    pub async fn put_cached<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), StorageFailure> {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = Utc::now().checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.put_cached_until(key, value, expires_at).await
    }

    /// Cache `value` under `key` until `expires_at`.
    pub async fn put_cached_until<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StorageFailure> {
        self.insert(key, value, Some(expires_at.timestamp())).await
    }

    /// Cached value for `key`. Expired or undecodable entries are evicted and
    /// read as `None`.
    pub async fn get_cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get(key)?;

        let decoded = if entry.is_expired(Utc::now().timestamp()) {
            None
        } else {
            serde_json::from_value(entry.value.clone())
                .map_err(|e| tracing::warn!("Evicting undecodable cache entry {}: {}", key, e))
                .ok()
        };

        if decoded.is_none() {
            let _ = entries.remove(key);
            if let Err(e) = self.persist(&entries).await {
                tracing::warn!("Failed to persist cache eviction: {}", e);
            }
        }
        decoded
    }

    /// Remove all expired entries, returning how many were dropped.
    pub async fn purge_expired(&self) -> Result<usize, StorageFailure> {
        let mut entries = self.entries.lock().await;
        let now = Utc::now().timestamp();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!("Purged {} expired cache entries", removed);
            self.persist(&entries).await?;
        }
        Ok(removed)
    }

    /// Stored settings, or defaults when none were saved.
    pub async fn settings(&self) -> Result<Settings, StorageFailure> {
        Ok(self.get(SETTINGS_KEY).await?.unwrap_or_default())
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<(), StorageFailure> {
        self.set(SETTINGS_KEY, settings).await
    }

    async fn insert<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expires_at: Option<i64>,
    ) -> Result<(), StorageFailure> {
        let value = serde_json::to_value(value)
            .map_err(|e| StorageFailure::Corrupted { key: key.to_string(), message: e.to_string() })?;
        let mut entries = self.entries.lock().await;
        let _ = entries.insert(key.to_string(), Entry { value, expires_at });
        self.persist(&entries).await
    }

    async fn persist(&self, entries: &BTreeMap<String, Entry>) -> Result<(), StorageFailure> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = serde_json::to_vec_pretty(entries).map_err(|e| StorageFailure::Corrupted {
            key: "*".to_string(),
            message: e.to_string(),
        })?;
        write_atomic(path, &content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let path = dir.path().join("store.json");

        let store = KeyValueStore::open(&path).await.unwrap_or_else(|e| panic!("open: {e}"));
        store.set("answer", &42_u32).await.unwrap_or_else(|e| panic!("set: {e}"));
        drop(store);

        let reopened = KeyValueStore::open(&path).await.unwrap_or_else(|e| panic!("open: {e}"));
        assert_eq!(reopened.get::<u32>("answer").await.ok().flatten(), Some(42));
    }

    #[tokio::test]
    async fn test_expired_cache_entry_is_evicted() {
        let store = KeyValueStore::in_memory();
        let past = Utc::now() - chrono::Duration::seconds(5);
        store.put_cached_until("book:b1", &"stale", past).await.unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(store.get_cached::<String>("book:b1").await, None);
        assert!(store.entries.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_fresh_cache_entry_is_returned() {
        let store = KeyValueStore::in_memory();
        store
            .put_cached("plans", &vec!["monthly", "yearly"], Duration::from_secs(60))
            .await
            .unwrap_or_else(|e| panic!("{e}"));

        let plans: Option<Vec<String>> = store.get_cached("plans").await;
        assert_eq!(plans.map(|p| p.len()), Some(2));
    }

    #[tokio::test]
    async fn test_type_mismatch_reports_corruption() {
        let store = KeyValueStore::in_memory();
        store.set("count", &"not a number").await.unwrap_or_else(|e| panic!("{e}"));

        let err = store.get::<u32>("count").await.err();
        assert!(matches!(err, Some(StorageFailure::Corrupted { .. })));
    }

    #[tokio::test]
    async fn test_corrupted_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let path = dir.path().join("store.json");
        std::fs::write(&path, "][").unwrap_or_else(|e| panic!("write: {e}"));

        let store = KeyValueStore::open(&path).await.unwrap_or_else(|e| panic!("open: {e}"));
        assert_eq!(store.settings().await.ok(), Some(Settings::default()));
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = KeyValueStore::in_memory();
        let past = Utc::now() - chrono::Duration::seconds(1);
        store.put_cached_until("a", &1, past).await.unwrap_or_else(|e| panic!("{e}"));
        store.set("b", &2).await.unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(store.purge_expired().await.ok(), Some(1));
        assert_eq!(store.get::<i32>("b").await.ok().flatten(), Some(2));
    }
}
