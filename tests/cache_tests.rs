// Cache backend tests - memory and persistent stores through the public API

use bytes::Bytes;
use http_relay::cache::{cache_key, CacheEntry, CacheMode, CacheStore, DiskStore};

fn entry(body: &'static [u8], content_type: Option<&str>) -> CacheEntry {
    CacheEntry {
        body: Bytes::from_static(body),
        content_type: content_type.map(str::to_string),
    }
}

#[tokio::test]
async fn test_memory_store_roundtrip() {
    let store = CacheStore::open(CacheMode::Memory).await.unwrap();
    let key = cache_key("GET", "/widgets", b"");

    assert!(!store.exists(&key).await.unwrap());
    assert!(store.get(&key).await.unwrap().is_none());

    store
        .put(&key, entry(b"body", Some("application/json")))
        .await
        .unwrap();

    assert!(store.exists(&key).await.unwrap());
    let cached = store.get(&key).await.unwrap().unwrap();
    assert_eq!(cached.body, Bytes::from_static(b"body"));
    assert_eq!(cached.content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_disk_store_layout() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskStore::open(dir.path()).await.unwrap();
    let key = cache_key("POST", "/echo", b"abc");

    store
        .put(&key, entry(b"pong", Some("text/plain")))
        .await
        .unwrap();

    // Two files per key: body and content-type sidecar, named by the key.
    assert!(dir.path().join(&key).exists());
    assert!(dir.path().join(format!("{key}_content-type")).exists());
    assert_eq!(std::fs::read(dir.path().join(&key)).unwrap(), b"pong");
    assert_eq!(
        std::fs::read_to_string(dir.path().join(format!("{key}_content-type"))).unwrap(),
        "text/plain"
    );

    let cached = store.get(&key).await.unwrap().unwrap();
    assert_eq!(cached.body, Bytes::from_static(b"pong"));
    assert_eq!(cached.content_type.as_deref(), Some("text/plain"));
}

#[tokio::test]
async fn test_disk_store_no_sidecar_without_content_type() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskStore::open(dir.path()).await.unwrap();
    let key = cache_key("GET", "/raw", b"");

    store.put(&key, entry(b"bytes", None)).await.unwrap();

    assert!(dir.path().join(&key).exists());
    assert!(!dir.path().join(format!("{key}_content-type")).exists());
    let cached = store.get(&key).await.unwrap().unwrap();
    assert!(cached.content_type.is_none());
}

#[tokio::test]
async fn test_disk_store_first_write_wins() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskStore::open(dir.path()).await.unwrap();
    let key = cache_key("GET", "/stable", b"");

    store.put(&key, entry(b"first", Some("text/plain"))).await.unwrap();
    store.put(&key, entry(b"second", Some("text/html"))).await.unwrap();

    let cached = store.get(&key).await.unwrap().unwrap();
    assert_eq!(cached.body, Bytes::from_static(b"first"));
    assert_eq!(cached.content_type.as_deref(), Some("text/plain"));
}

#[tokio::test]
async fn test_disk_store_miss_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskStore::open(dir.path()).await.unwrap();
    let key = cache_key("GET", "/nothing", b"");

    assert!(!store.exists(&key).await.unwrap());
    assert!(store.get(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn test_disk_store_creates_nested_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("tmp").join("cache");

    let store = DiskStore::open(&nested).await.unwrap();
    assert!(nested.is_dir());

    // Opening again is idempotent.
    DiskStore::open(&nested).await.unwrap();

    let key = cache_key("GET", "/", b"");
    store.put(&key, entry(b"x", None)).await.unwrap();
    assert!(store.exists(&key).await.unwrap());
}

#[tokio::test]
async fn test_disk_store_concurrent_same_key_puts_are_benign() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskStore::open(dir.path()).await.unwrap();

    // Concurrent misses for one key all reach `put` with identical content;
    // none of them may fail the request.
    for round in 0..32 {
        let key = cache_key("POST", "/contended", round.to_string().as_bytes());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let key = key.clone();
            handles.push(tokio::spawn(async move {
                store.put(&key, entry(b"identical", Some("text/plain"))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let cached = store.get(&key).await.unwrap().unwrap();
        assert_eq!(cached.body, Bytes::from_static(b"identical"));
        assert_eq!(cached.content_type.as_deref(), Some("text/plain"));
    }
}

#[tokio::test]
async fn test_concurrent_puts_leave_one_consistent_entry() {
    let store = CacheStore::open(CacheMode::Memory).await.unwrap();
    let key = cache_key("PUT", "/contended", b"payload");

    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = store.clone();
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            store.put(&key, entry(b"same-bytes", None)).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let cached = store.get(&key).await.unwrap().unwrap();
    assert_eq!(cached.body, Bytes::from_static(b"same-bytes"));
}
