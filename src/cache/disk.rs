//! Persistent content-addressed cache backend.
//!
//! Each key `K` maps to two files under the cache directory: `K` holding the
//! raw body bytes and `K_content-type` holding the UTF-8 content type, the
//! sidecar written only when the response carried one. Entries are created on
//! first miss and never modified afterward.

use crate::cache::models::CacheEntry;
use crate::error::{ProxyError, Result};
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    /// Open the store, creating the directory (recursively, idempotently) if
    /// it does not exist yet.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| ProxyError::CacheIo(format!("creating {}: {e}", dir.display())))?;
        debug!(dir = %dir.display(), "opened persistent cache");
        Ok(Self { dir })
    }

    fn body_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn content_type_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}_content-type"))
    }

    pub async fn exists(&self, key: &str) -> Result<bool> {
        fs::try_exists(self.body_path(key))
            .await
            .map_err(|e| ProxyError::CacheIo(e.to_string()))
    }

    pub async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let body = match fs::read(self.body_path(key)).await {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ProxyError::CacheIo(e.to_string())),
        };

        let content_type = match fs::read_to_string(self.content_type_path(key)).await {
            Ok(value) => Some(value),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(ProxyError::CacheIo(e.to_string())),
        };

        Ok(Some(CacheEntry { body, content_type }))
    }

    /// Store an entry, first write wins. The sidecar is written before the
    /// body file so a reader that finds the body always finds its content
    /// type too.
    pub async fn put(&self, key: &str, entry: CacheEntry) -> Result<()> {
        if self.exists(key).await? {
            return Ok(());
        }

        if let Some(content_type) = &entry.content_type {
            write_atomic(&self.content_type_path(key), content_type.as_bytes()).await?;
        }
        write_atomic(&self.body_path(key), &entry.body).await?;
        debug!(key = %key.get(..16).unwrap_or(key), len = entry.body.len(), "cached response to disk");
        Ok(())
    }
}

// Write-to-temp then rename so readers never observe a torn file. The temp
// name must be unique per writer: concurrent misses for the same key all
// reach `put`, and a shared temp path would let one writer rename the file
// out from under another. With unique temps the same-key race is benign,
// last rename wins and the content is identical anyway.
async fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    static TMP_SEQ: AtomicU64 = AtomicU64::new(0);
    let tmp = path.with_extension(format!(
        "tmp.{}.{}",
        std::process::id(),
        TMP_SEQ.fetch_add(1, Ordering::Relaxed)
    ));
    fs::write(&tmp, data)
        .await
        .map_err(|e| ProxyError::CacheIo(format!("writing {}: {e}", tmp.display())))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| ProxyError::CacheIo(format!("renaming {}: {e}", path.display())))
}
