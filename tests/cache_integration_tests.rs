//! Integration Tests for the cache handle
//!
//! Exercises the public API end to end, including the background GC task.

use std::sync::{Arc, Once};
use std::time::Duration;

use ttl_cache::{CacheConfig, CacheError, Ttl, TtlCache};

// == Helper Functions ==

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "ttl_cache=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

fn create_cache(max_size: Option<usize>) -> TtlCache {
    init_tracing();
    TtlCache::new(5000, max_size).unwrap()
}

fn value(s: &str) -> String {
    s.to_string()
}

// == Basic Operations ==

#[tokio::test]
async fn test_get_never_set_key() {
    let cache = create_cache(None);
    assert_eq!(cache.get("missing"), None);
    assert_eq!(cache.stats().misses, 1);
}

#[tokio::test]
async fn test_set_then_get_without_ttl() {
    let cache = create_cache(None);
    cache.set("key", value("value"), None).unwrap();

    assert_eq!(cache.get("key").as_deref(), Some("value"));
    assert_eq!(cache.ttl_remaining("key"), None);
    assert_eq!(cache.collect_garbage(), 0);
    assert_eq!(cache.get("key").as_deref(), Some("value"));
}

#[tokio::test]
async fn test_delete_present_and_absent() {
    let cache = create_cache(None);
    cache.set("key", value("value"), Some(60)).unwrap();

    assert!(cache.delete("key"));
    assert_eq!(cache.get("key"), None);

    assert!(!cache.delete("key"));
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_negative_ttl_rejected_and_prior_value_kept() {
    let cache = create_cache(None);
    cache.set("key", value("original"), None).unwrap();

    let result = cache.set("key", value("replacement"), Some(-1));
    assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
    assert_eq!(cache.get("key").as_deref(), Some("original"));
}

#[tokio::test]
async fn test_fractional_ttl_rejected_before_write() {
    let cache = create_cache(None);
    let err = Ttl::try_from(2.5f64).unwrap_err();
    assert!(matches!(err, CacheError::InvalidArgument(_)));
    assert!(cache.is_empty());
}

// == Eviction ==

#[tokio::test]
async fn test_fifo_scenario() {
    init_tracing();
    let cache: TtlCache = TtlCache::new(5000, Some(2)).unwrap();

    cache.set("a", value("1"), None).unwrap();
    cache.set("b", value("2"), None).unwrap();
    cache.set("c", value("3"), None).unwrap();

    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b").as_deref(), Some("2"));
    assert_eq!(cache.get("c").as_deref(), Some("3"));
    assert_eq!(cache.stats().evictions, 1);
}

#[tokio::test]
async fn test_reset_key_survives_next_eviction() {
    let cache = create_cache(Some(3));
    cache.set("a", value("1"), None).unwrap();
    cache.set("b", value("2"), None).unwrap();
    cache.set("c", value("3"), None).unwrap();

    cache.set("a", value("1 again"), None).unwrap();
    assert_eq!(cache.keys(), vec!["b", "c", "a"]);

    cache.set("d", value("4"), None).unwrap();
    assert_eq!(cache.get("a").as_deref(), Some("1 again"));
    assert_eq!(cache.get("b"), None);
    assert_eq!(cache.len(), 3);
}

#[tokio::test]
async fn test_unbounded_cache_never_evicts() {
    let cache = create_cache(None);
    for i in 0..1000 {
        cache.set(format!("key{}", i), i.to_string(), None).unwrap();
    }
    assert_eq!(cache.len(), 1000);
    assert_eq!(cache.stats().evictions, 0);
}

// == Expiry ==

#[tokio::test]
async fn test_zero_ttl_expires_without_sweep() {
    let cache = create_cache(None);
    cache.set("key", value("value"), Some(0)).unwrap();

    // Past the current second boundary; the 5s GC has not ticked yet
    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert_eq!(cache.stats().gc_runs, 0);
    assert_eq!(cache.get("key"), None);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_manual_sweep_reclaims_due_entries_only() {
    let cache = create_cache(None);
    cache.set("due", value("1"), Some(0)).unwrap();
    cache.set("later", value("2"), Some(3600)).unwrap();
    cache.set("forever", value("3"), None).unwrap();

    assert_eq!(cache.collect_garbage(), 1);
    assert_eq!(cache.keys(), vec!["later", "forever"]);
    assert_eq!(cache.stats().expirations, 1);
}

#[tokio::test]
async fn test_background_gc_reclaims_without_reads() {
    init_tracing();
    let config = CacheConfig::default().with_gc_interval_ms(25);
    let cache: TtlCache = TtlCache::from_config(&config).unwrap();

    cache.set("due", value("1"), Some(0)).unwrap();
    cache.set("forever", value("2"), None).unwrap();

    tokio::time::sleep(Duration::from_millis(250)).await;

    // len() does not evict, so only the sweep can have shrunk it
    assert_eq!(cache.len(), 1);
    assert!(cache.stats().gc_runs > 0);
    assert_eq!(cache.get("forever").as_deref(), Some("2"));
}

// == Concurrency & Lifecycle ==

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_access_respects_capacity() {
    init_tracing();
    let cache: Arc<TtlCache> = Arc::new(TtlCache::new(1, Some(50)).unwrap());

    let mut handles = Vec::new();
    for worker in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            for i in 0..200 {
                let key = format!("w{}-{}", worker, i % 20);
                cache.set(key.clone(), i.to_string(), Some(i % 3)).unwrap();
                let _ = cache.get(&key);
                if i % 7 == 0 {
                    cache.delete(&key);
                }
                tokio::task::yield_now().await;
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    assert!(cache.len() <= 50);
    let stats = cache.stats();
    assert_eq!(stats.hits + stats.misses, 8 * 200);
}

#[tokio::test]
async fn test_byte_values() {
    init_tracing();
    let cache: TtlCache<Vec<u8>> = TtlCache::new(5000, Some(4)).unwrap();
    cache.set("body", b"<html></html>".to_vec(), Some(30)).unwrap();
    assert_eq!(cache.get("body").as_deref(), Some(&b"<html></html>"[..]));
}
