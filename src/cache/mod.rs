// Response cache module
//
// One capability surface (exists/get/put) over three backends selected by
// configuration: disabled, in-memory, persistent on-disk.

pub mod disk;
pub mod key;
pub mod models;
pub mod store;

pub use disk::DiskStore;
pub use key::cache_key;
pub use models::{CacheEntry, CacheMode};
pub use store::{CacheStore, MemoryStore};
