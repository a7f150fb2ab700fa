//! Cache manager for the last good order snapshot
//!
//! Provides a `CacheManager` that keeps one serialized snapshot of the order
//! list in a key-value store, stamped with its write time, so the driver can
//! keep showing data while the feed is unreachable.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::store::{FileStore, KeyValueStore, MemoryStore};
use crate::data::OrderRecord;

/// Key of the single cache slot
pub const CACHE_KEY: &str = "emirler_cache";

/// Default age after which a snapshot is no longer served
pub const DEFAULT_EXPIRY_MINUTES: u32 = 30;

/// Errors that can occur when reading or writing the cache slot
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backing store failed
    #[error("Cache store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The entry could not be encoded or decoded
    #[error("Cache entry is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Snapshot stored in the cache slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The cached orders, in feed order
    pub records: Vec<OrderRecord>,
    /// When the snapshot was written
    pub written_at: DateTime<Utc>,
}

/// Manages the single order snapshot slot
///
/// Each write replaces the previous snapshot. Reads ignore snapshots that are
/// empty or older than the expiry window but never delete them.
#[derive(Clone)]
pub struct CacheManager {
    store: Arc<dyn KeyValueStore + Send + Sync>,
    expiry: Duration,
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

impl CacheManager {
    /// Creates a CacheManager storing its file in a custom directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self::with_store(FileStore::with_dir(cache_dir))
    }

    /// Creates a CacheManager that only lives as long as the process
    pub fn in_memory() -> Self {
        Self::with_store(MemoryStore::new())
    }

    /// Creates a CacheManager over any key-value store
    pub fn with_store(store: impl KeyValueStore + Send + Sync + 'static) -> Self {
        Self {
            store: Arc::new(store),
            expiry: Duration::minutes(i64::from(DEFAULT_EXPIRY_MINUTES)),
        }
    }

    /// Overrides the expiry window
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    /// The configured expiry window
    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Replaces the snapshot with `records`, stamped now.
    ///
    /// Failures are logged and otherwise ignored.
    pub fn store(&self, records: &[OrderRecord]) {
        self.store_at(records, Utc::now());
    }

    /// Replaces the snapshot with `records`, stamped `now`
    pub fn store_at(&self, records: &[OrderRecord], now: DateTime<Utc>) {
        match self.try_store_at(records, now) {
            Ok(()) => debug!(records = records.len(), "Cached order snapshot"),
            Err(e) => warn!(error = %e, "Failed to write order cache"),
        }
    }

    /// Replaces the snapshot, reporting failures to the caller
    pub fn try_store_at(&self, records: &[OrderRecord], now: DateTime<Utc>) -> Result<(), CacheError> {
        let entry = CacheEntry {
            records: records.to_vec(),
            written_at: now,
        };
        let json = serde_json::to_string(&entry)?;
        self.store.set(CACHE_KEY, &json)?;
        Ok(())
    }

    /// Returns the snapshot if it is usable now
    pub fn load(&self) -> Option<CacheEntry> {
        self.load_at(Utc::now())
    }

    /// Returns the snapshot if it is usable at `now`.
    ///
    /// Returns `None` when the slot was never written, holds invalid data, holds
    /// no records, or is at least as old as the expiry window.
    pub fn load_at(&self, now: DateTime<Utc>) -> Option<CacheEntry> {
        let entry = match self.read_entry() {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                debug!("No cached order snapshot");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable order cache");
                return None;
            }
        };

        if entry.records.is_empty() {
            debug!("Cached order snapshot is empty");
            return None;
        }

        let age = now - entry.written_at;
        if age >= self.expiry {
            debug!(age_secs = age.num_seconds(), "Cached order snapshot expired");
            return None;
        }

        Some(entry)
    }

    /// Reads the raw slot without freshness checks
    fn read_entry(&self) -> Result<Option<CacheEntry>, CacheError> {
        match self.store.get(CACHE_KEY)? {
            Some(content) => Ok(Some(serde_json::from_str(&content)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    fn record(value: Value) -> OrderRecord {
        match value {
            Value::Object(map) => OrderRecord::from_map(map),
            _ => panic!("test input must be an object"),
        }
    }

    fn sample_records() -> Vec<OrderRecord> {
        vec![
            record(json!({"Sembol": "EURUSD", "Lot": 0.1, "Durum": "Açık"})),
            record(json!({"Sembol": "XAUUSD", "KarZarar": -3.5})),
        ]
    }

    fn create_test_cache() -> (CacheManager, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());
        (cache, temp_dir)
    }

    /// A store that refuses every operation, like a full or read-only disk
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> io::Result<Option<String>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }

        fn set(&self, _key: &str, _value: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "quota exceeded"))
        }
    }

    #[test]
    fn test_store_then_load_returns_records() {
        let (cache, _temp_dir) = create_test_cache();
        let records = sample_records();

        cache.store(&records);
        let entry = cache.load().expect("Fresh cache should load");

        assert_eq!(entry.records, records);
    }

    #[test]
    fn test_store_writes_fixed_slot_file() {
        let (cache, temp_dir) = create_test_cache();

        cache.store(&sample_records());

        let path = temp_dir.path().join("emirler_cache.json");
        let content = fs::read_to_string(&path).expect("Cache file should exist");
        assert!(content.contains("\"records\""));
        assert!(content.contains("\"written_at\""));
        assert!(content.contains("EURUSD"));
    }

    #[test]
    fn test_load_returns_none_when_never_written() {
        let (cache, _temp_dir) = create_test_cache();
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_load_returns_none_after_expiry() {
        let cache = CacheManager::in_memory();
        let written = Utc::now();

        cache.store_at(&sample_records(), written);

        assert!(cache.load_at(written + Duration::minutes(29)).is_some());
        assert!(cache.load_at(written + Duration::minutes(30)).is_none());
        assert!(cache.load_at(written + Duration::hours(5)).is_none());
    }

    #[test]
    fn test_expired_entry_is_not_deleted() {
        let cache = CacheManager::in_memory();
        let written = Utc::now();
        cache.store_at(&sample_records(), written);

        assert!(cache.load_at(written + Duration::minutes(45)).is_none());

        // The entry is still there for a reader with a different clock
        assert!(cache.load_at(written + Duration::minutes(1)).is_some());
    }

    #[test]
    fn test_custom_expiry_window() {
        let cache = CacheManager::in_memory().with_expiry(Duration::minutes(5));
        let written = Utc::now();
        cache.store_at(&sample_records(), written);

        assert_eq!(cache.expiry(), Duration::minutes(5));
        assert!(cache.load_at(written + Duration::minutes(4)).is_some());
        assert!(cache.load_at(written + Duration::minutes(5)).is_none());
    }

    #[test]
    fn test_empty_snapshot_is_not_usable() {
        let cache = CacheManager::in_memory();
        cache.store(&[]);
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_overwrite_replaces_previous_snapshot() {
        let cache = CacheManager::in_memory();
        let first = sample_records();
        let second = vec![record(json!({"Sembol": "USDTRY"}))];

        cache.store(&first);
        cache.store(&second);

        assert_eq!(cache.load().unwrap().records, second);
    }

    #[test]
    fn test_invalid_payload_is_ignored() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileStore::with_dir(temp_dir.path().to_path_buf());
        store.set(CACHE_KEY, r#"{"records": "nope"}"#).unwrap();
        let cache = CacheManager::with_store(store);

        assert!(cache.load().is_none());
    }

    #[test]
    fn test_broken_store_never_raises() {
        let cache = CacheManager::with_store(BrokenStore);

        cache.store(&sample_records());

        assert!(cache.load().is_none());
        assert!(matches!(
            cache.try_store_at(&sample_records(), Utc::now()),
            Err(CacheError::Io(_))
        ));
    }

    #[test]
    fn test_written_at_timestamp_is_recorded() {
        let cache = CacheManager::in_memory();

        let before = Utc::now();
        cache.store(&sample_records());
        let after = Utc::now();

        let entry = cache.load().expect("Should read cache");
        assert!(entry.written_at >= before, "written_at should be after write started");
        assert!(entry.written_at <= after, "written_at should be before write finished");
    }
}
