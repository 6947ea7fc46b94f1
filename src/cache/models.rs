//! Cache data models.

use bytes::Bytes;
use std::path::PathBuf;

/// A cached upstream response. Entries are immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Response body bytes (post-interception when a hook is active).
    pub body: Bytes,
    /// `content-type` the upstream responded with, if any.
    pub content_type: Option<String>,
}

/// Backend selection, fixed at pipeline construction time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// No caching; every request goes upstream.
    #[default]
    Disabled,
    /// Process-lifetime in-memory map.
    Memory,
    /// Content-addressed files under the given directory.
    Persistent(PathBuf),
}
