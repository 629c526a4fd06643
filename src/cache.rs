//! Response cache with TTL-based invalidation
//!
//! Each key maps to one file `<dir>/<key>.json` holding
//! `{"timestamp": <unix-seconds>, "data": <payload>}`. Writes go to a temp
//! file in the same directory and are renamed over the target, so a reader
//! sees either the old entry or the new one.
//!
//! Caching is an optimization: read errors are misses and write errors are
//! dropped. Neither is ever returned to the caller.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::config::NotifyConfig;

/// Directory name under the platform cache root
pub const CACHE_DIR_NAME: &str = "gh-notify";

/// Keyed store of JSON payloads
pub trait CacheStore: Send + Sync {
    /// Payload stored for `key`, or `None` on miss/expiry/corruption
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `payload` for `key`, replacing any previous entry
    fn set(&self, key: &str, payload: &Value);

    /// Drop every entry
    fn clear(&self);
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    timestamp: u64,
    data: Value,
}

type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ─────────────────────────────────────────────────────────────────────────────
// File cache
// ─────────────────────────────────────────────────────────────────────────────

/// On-disk cache, one JSON file per key
pub struct FileCache {
    dir: PathBuf,
    ttl: Duration,
    enabled: bool,
    clock: Clock,
    lock: Mutex<()>,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
            enabled: true,
            clock: Arc::new(unix_now),
            lock: Mutex::new(()),
        }
    }

    /// A cache that never stores anything
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(PathBuf::new(), Duration::ZERO)
        }
    }

    /// Cache under `<cache-root>/gh-notify`, honoring the enable flag and TTL
    pub fn from_config(config: &NotifyConfig) -> Self {
        if !config.cache_enabled {
            return Self::disabled();
        }
        let root = dirs::cache_dir().unwrap_or_else(std::env::temp_dir);
        Self::new(root.join(CACHE_DIR_NAME), config.cache_duration)
    }

    /// Replace the time source (unix seconds)
    pub fn with_clock(mut self, clock: impl Fn() -> u64 + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// File backing `key`
    pub fn entry_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }

    fn read_entry(path: &Path) -> Option<CacheEntry> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!(path = %path.display(), error = %e, "cache read failed");
                }
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "cache entry malformed");
                None
            }
        }
    }

    fn write_entry(&self, path: &Path, entry: &CacheEntry) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        // Dropping the temp file on any error below removes it
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer(&mut tmp, entry)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Option<Value> {
        if !self.enabled {
            return None;
        }
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        let path = self.entry_path(key);
        let entry = Self::read_entry(&path)?;

        let age = (self.clock)().saturating_sub(entry.timestamp);
        if age > self.ttl.as_secs() {
            tracing::debug!(key, age, "cache entry expired");
            if let Err(e) = fs::remove_file(&path) {
                tracing::debug!(key, error = %e, "failed to remove expired cache entry");
            }
            return None;
        }

        tracing::debug!(key, age, "cache hit");
        Some(entry.data)
    }

    fn set(&self, key: &str, payload: &Value) {
        if !self.enabled {
            return;
        }
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        let entry = CacheEntry {
            timestamp: (self.clock)(),
            data: payload.clone(),
        };
        if let Err(e) = self.write_entry(&self.entry_path(key), &entry) {
            tracing::debug!(key, error = %e, "cache write failed");
        }
    }

    fn clear(&self) {
        if !self.enabled {
            return;
        }
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Err(e) = fs::remove_file(&path) {
                    tracing::debug!(path = %path.display(), error = %e, "failed to clear cache entry");
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory cache
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory store without expiry, for tests and one-shot runs
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, payload: &Value) {
        self.entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(key.to_string(), payload.clone());
    }

    fn clear(&self) {
        self.entries.lock().unwrap_or_else(|p| p.into_inner()).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tempfile::TempDir;

    fn cache_at(dir: &TempDir, ttl_secs: u64, now: Arc<AtomicU64>) -> FileCache {
        FileCache::new(dir.path(), Duration::from_secs(ttl_secs))
            .with_clock(move || now.load(Ordering::SeqCst))
    }

    #[test]
    fn test_set_then_get() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path(), Duration::from_secs(300));
        let payload = json!([{"id": "1"}, {"id": "2"}]);

        cache.set("page_1", &payload);
        assert_eq!(cache.get("page_1"), Some(payload));
    }

    #[test]
    fn test_entry_layout() {
        let dir = TempDir::new().unwrap();
        let now = Arc::new(AtomicU64::new(1_700_000_000));
        let cache = cache_at(&dir, 60, now);

        cache.set("k", &json!({"a": 1}));
        let raw = fs::read_to_string(dir.path().join("k.json")).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["timestamp"], 1_700_000_000u64);
        assert_eq!(value["data"]["a"], 1);
    }

    #[test]
    fn test_ttl_boundary() {
        let dir = TempDir::new().unwrap();
        let now = Arc::new(AtomicU64::new(1_000));
        let cache = cache_at(&dir, 60, now.clone());
        cache.set("k", &json!("v"));

        now.store(1_060, Ordering::SeqCst);
        assert_eq!(cache.get("k"), Some(json!("v")), "age == ttl is still fresh");

        now.store(1_061, Ordering::SeqCst);
        assert_eq!(cache.get("k"), None);
        assert!(!cache.entry_path("k").exists(), "expired entry is removed");
    }

    #[test]
    fn test_malformed_entry_is_miss() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path(), Duration::from_secs(60));
        fs::write(cache.entry_path("bad"), "{not json").unwrap();
        assert_eq!(cache.get("bad"), None);
    }

    #[test]
    fn test_disabled_cache_never_persists() {
        let cache = FileCache::disabled();
        cache.set("k", &json!(1));
        assert_eq!(cache.get("k"), None);
        assert!(!cache.is_enabled());
    }

    #[test]
    fn test_unwritable_dir_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();
        let cache = FileCache::new(&file, Duration::from_secs(60));
        cache.set("k", &json!(1));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_key_sanitized() {
        let cache = FileCache::new("/tmp/x", Duration::ZERO);
        assert_eq!(
            cache.entry_path("../a b"),
            PathBuf::from("/tmp/x/___a_b.json")
        );
    }

    #[test]
    fn test_clear_removes_entries() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path(), Duration::from_secs(60));
        cache.set("a", &json!(1));
        cache.set("b", &json!(2));
        cache.clear();
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_memory_cache() {
        let cache = MemoryCache::new();
        assert!(cache.is_empty());
        cache.set("a", &json!(1));
        assert_eq!(cache.get("a"), Some(json!(1)));
        cache.clear();
        assert!(cache.is_empty());
    }
}
