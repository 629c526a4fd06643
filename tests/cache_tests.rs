//! # File Cache Tests
//!
//! Expiry and concurrent access against a real directory.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use gh_notify::{CacheStore, FileCache};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_set_then_get_returns_payload() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(dir.path(), Duration::from_secs(300));
    let payload = json!([{ "id": "1", "title": "Fix login" }]);

    cache.set("notifications_p1_participating-false_all-false", &payload);

    assert_eq!(
        cache.get("notifications_p1_participating-false_all-false"),
        Some(payload)
    );
}

#[test]
fn test_entry_expires_after_ttl() {
    let dir = TempDir::new().unwrap();
    let now = Arc::new(AtomicU64::new(1_000));
    let clock = now.clone();
    let cache = FileCache::new(dir.path(), Duration::from_secs(60))
        .with_clock(move || clock.load(Ordering::SeqCst));

    cache.set("page", &json!("data"));
    let path = cache.entry_path("page");

    now.store(1_060, Ordering::SeqCst);
    assert_eq!(cache.get("page"), Some(json!("data")));
    assert!(path.exists());

    now.store(1_061, Ordering::SeqCst);
    assert_eq!(cache.get("page"), None);
    assert!(!path.exists());
}

#[test]
fn test_entries_survive_a_new_instance() {
    let dir = TempDir::new().unwrap();
    FileCache::new(dir.path(), Duration::from_secs(300)).set("page", &json!({ "n": 1 }));

    let reopened = FileCache::new(dir.path(), Duration::from_secs(300));
    assert_eq!(reopened.get("page"), Some(json!({ "n": 1 })));
}

#[test]
fn test_concurrent_writes_on_distinct_keys() {
    let dir = TempDir::new().unwrap();
    let cache = Arc::new(FileCache::new(dir.path(), Duration::from_secs(300)));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..20 {
                    cache.set(&format!("key-{}-{}", t, i), &json!({ "t": t, "i": i }));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for t in 0..8 {
        for i in 0..20 {
            assert_eq!(
                cache.get(&format!("key-{}-{}", t, i)),
                Some(json!({ "t": t, "i": i }))
            );
        }
    }
}

#[test]
fn test_concurrent_readers_never_see_torn_entries() {
    let dir = TempDir::new().unwrap();
    let cache = Arc::new(FileCache::new(dir.path(), Duration::from_secs(300)));
    let big = |n: u64| json!({ "n": n, "items": vec![n; 2_000] });
    cache.set("shared", &big(0));

    let writer = {
        let cache = cache.clone();
        thread::spawn(move || {
            for n in 1..50 {
                cache.set("shared", &big(n));
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let cache = cache.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    let value = cache.get("shared").expect("entry present");
                    let n = value["n"].as_u64().unwrap();
                    let items = value["items"].as_array().unwrap();
                    assert_eq!(items.len(), 2_000);
                    assert!(items.iter().all(|v| v.as_u64() == Some(n)));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn test_clear_removes_every_entry() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(dir.path(), Duration::from_secs(300));
    cache.set("a", &json!(1));
    cache.set("b", &json!(2));

    cache.clear();

    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b"), None);
}

#[test]
fn test_disabled_cache_never_stores() {
    let cache = FileCache::disabled();
    cache.set("a", &json!(1));
    assert!(!cache.is_enabled());
    assert_eq!(cache.get("a"), None);
}
