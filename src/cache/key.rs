//! Cache fingerprint derivation.

use sha2::{Digest, Sha256};

/// Derive the cache key for a request identity.
///
/// SHA-256 over `method \n path \n body`, hex encoded. The newline separator
/// cannot appear unescaped in a method or request path, so distinct triples
/// hash distinct byte streams; the digest's collision probability is
/// negligible at any realistic cache population.
pub fn cache_key(method: &str, path: &str, body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b"\n");
    hasher.update(path.as_bytes());
    hasher.update(b"\n");
    hasher.update(body);
    format!("{:x}", hasher.finalize())
}
