//! Cache backend dispatch and the in-memory store.

use crate::cache::disk::DiskStore;
use crate::cache::models::{CacheEntry, CacheMode};
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// The configured cache backend, shared across all concurrent requests.
///
/// A miss is `Ok(None)`, never an error; `put` is first-write-wins because
/// entries are content-addressed and immutable.
#[derive(Debug, Clone)]
pub enum CacheStore {
    Disabled,
    Memory(MemoryStore),
    Persistent(DiskStore),
}

impl CacheStore {
    /// Construct the backend selected by configuration. The persistent
    /// backend creates its directory here, so failures surface at startup.
    pub async fn open(mode: CacheMode) -> Result<Self> {
        match mode {
            CacheMode::Disabled => Ok(Self::Disabled),
            CacheMode::Memory => Ok(Self::Memory(MemoryStore::new())),
            CacheMode::Persistent(dir) => Ok(Self::Persistent(DiskStore::open(dir).await?)),
        }
    }

    pub fn enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    pub async fn exists(&self, key: &str) -> Result<bool> {
        match self {
            Self::Disabled => Ok(false),
            Self::Memory(store) => Ok(store.exists(key).await),
            Self::Persistent(store) => store.exists(key).await,
        }
    }

    pub async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let entry = match self {
            Self::Disabled => None,
            Self::Memory(store) => store.get(key).await,
            Self::Persistent(store) => store.get(key).await?,
        };
        let short = key.get(..16).unwrap_or(key);
        match &entry {
            Some(_) => debug!(key = %short, "cache hit"),
            None if self.enabled() => debug!(key = %short, "cache miss"),
            None => {}
        }
        Ok(entry)
    }

    pub async fn put(&self, key: &str, entry: CacheEntry) -> Result<()> {
        match self {
            Self::Disabled => Ok(()),
            Self::Memory(store) => {
                store.put(key, entry).await;
                Ok(())
            }
            Self::Persistent(store) => store.put(key, entry).await,
        }
    }
}

/// Process-lifetime in-memory backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn exists(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.read().await.get(key).cloned()
    }

    /// Write-if-absent under the write lock: two concurrent misses for the
    /// same key race benignly, exactly one entry wins and readers never see
    /// a partial value.
    pub async fn put(&self, key: &str, entry: CacheEntry) {
        self.entries
            .write()
            .await
            .entry(key.to_string())
            .or_insert(entry);
    }
}
