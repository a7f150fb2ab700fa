//! Cache module for the last good order snapshot
//!
//! This module keeps one snapshot of the normalized order list in a key-value
//! store (a JSON file in the XDG cache directory by default). Snapshots older
//! than the expiry window are ignored on read, so the driver falls back to an
//! "unavailable" state instead of showing stale orders indefinitely.

mod manager;
mod store;

pub use manager::{CacheEntry, CacheError, CacheManager, CACHE_KEY, DEFAULT_EXPIRY_MINUTES};
pub use store::{FileStore, KeyValueStore, MemoryStore};
