//! Integration Tests for the Cache
//!
//! Drives the public API end to end with a manual clock so expiration is
//! deterministic.

use std::sync::{Arc, Mutex};

use ttl_cache::{
    CacheConfig, CacheError, DisposeReason, GetOptions, ManualClock, SetOptions, TtlCache,
    WallClock,
};

// == Helper Functions ==

type Log<K, V> = Arc<Mutex<Vec<(V, K, DisposeReason)>>>;

fn ttl_config(ttl: u64) -> CacheConfig {
    CacheConfig {
        ttl: Some(ttl),
        ..Default::default()
    }
}

fn cache_with<K, V>(config: CacheConfig) -> (TtlCache<K, V>, ManualClock, Log<K, V>)
where
    K: std::hash::Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    let clock = ManualClock::new(1);
    let log: Log<K, V> = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    let cache = TtlCache::builder()
        .config(config)
        .clock(clock.clone())
        .dispose(move |value, key, reason| sink.lock().unwrap().push((value, key, reason)))
        .build()
        .unwrap();
    (cache, clock, log)
}

fn take<K, V>(log: &Log<K, V>) -> Vec<(V, K, DisposeReason)> {
    std::mem::take(&mut *log.lock().unwrap())
}

fn s(text: &str) -> String {
    text.to_string()
}

// == Basic Operation ==

#[test]
fn test_entry_expires_at_ttl() {
    let (mut cache, clock, _) = cache_with::<i32, i32>(ttl_config(1000));
    cache.set(1, 2);
    assert!(cache.has(&1));
    assert_eq!(cache.get(&1), Some(&2));

    clock.advance(1000);
    assert!(!cache.has(&1));
    assert_eq!(cache.get(&1), None);
}

#[test]
fn test_default_clock_cache_works() {
    let mut cache: TtlCache<&str, i32> = TtlCache::new(ttl_config(60_000)).unwrap();
    cache.set("a", 1);
    assert_eq!(cache.get("a"), Some(&1));
    let remaining = cache.remaining_ttl("a").unwrap();
    assert!(remaining > 0 && remaining <= 60_000);
}

#[test]
fn test_wall_clock_fallback() {
    let mut cache: TtlCache<&str, i32> = TtlCache::builder()
        .ttl(60_000)
        .clock(WallClock::new())
        .build()
        .unwrap();
    cache.set("a", 1);
    assert_eq!(cache.get("a"), Some(&1));
    let remaining = cache.remaining_ttl("a").unwrap();
    assert!(remaining > 0 && remaining <= 60_000);
}

// == Config Policies ==

#[test]
fn test_update_age_on_get_config() {
    let config = CacheConfig {
        ttl: Some(1000),
        update_age_on_get: true,
        ..Default::default()
    };
    let (mut cache, clock, _) = cache_with::<i32, i32>(config);
    cache.set(1, 2);

    assert_eq!(cache.remaining_ttl(&1), Some(1000));
    clock.advance(5);
    assert_eq!(cache.remaining_ttl(&1), Some(995));

    cache.get(&1);
    assert_eq!(cache.remaining_ttl(&1), Some(1000));
}

#[test]
fn test_no_update_ttl_config() {
    let config = CacheConfig {
        ttl: Some(1000),
        no_update_ttl: true,
        ..Default::default()
    };
    let (mut cache, clock, _) = cache_with::<i32, i32>(config);
    cache.set(1, 2);

    assert_eq!(cache.remaining_ttl(&1), Some(1000));
    clock.advance(5);
    assert_eq!(cache.remaining_ttl(&1), Some(995));

    cache.set(1, 3);
    assert_eq!(cache.remaining_ttl(&1), Some(995));
    assert_eq!(cache.get(&1), Some(&3));
}

#[test]
fn test_bad_values_rejected() {
    let zero_max = CacheConfig {
        max: Some(0),
        ..Default::default()
    };
    assert_eq!(
        TtlCache::<i32, i32>::new(zero_max).unwrap_err(),
        CacheError::InvalidCapacity
    );
    assert!(matches!(
        TtlCache::<i32, i32>::new(ttl_config(0)),
        Err(CacheError::InvalidTtl(_))
    ));

    let mut cache: TtlCache<i32, i32> = TtlCache::new(ttl_config(1)).unwrap();
    assert!(matches!(
        cache.set_with(1, 2, SetOptions::new().ttl(0)),
        Err(CacheError::InvalidTtl(_))
    ));
    assert!(cache.is_empty());
}

// == Set and Dispose ==

#[test]
fn test_set_dispose_sequence() {
    let config = CacheConfig {
        ttl: Some(10),
        max: Some(5),
        ..Default::default()
    };
    let (mut cache, clock, log) = cache_with::<String, String>(config);

    cache.set(s("set"), s("oldval"));
    cache.set(s("set"), s("newval"));
    assert_eq!(take(&log), vec![(s("oldval"), s("set"), DisposeReason::Set)]);

    cache
        .set_with(s("set"), s("newnewval"), SetOptions::new().no_dispose_on_set(true))
        .unwrap();
    assert!(take(&log).is_empty());

    clock.advance(5);
    assert_eq!(cache.remaining_ttl("set"), Some(5));
    cache
        .set_with(s("set"), s("newnewval"), SetOptions::new().no_update_ttl(true))
        .unwrap();
    assert_eq!(cache.remaining_ttl("set"), Some(5));
    assert!(take(&log).is_empty());

    cache.set(s("set"), s("newnewval"));
    assert_eq!(cache.remaining_ttl("set"), Some(10));
    assert!(take(&log).is_empty());

    clock.advance(3);
    cache
        .set_with(s("set"), s("back to old val"), SetOptions::new().no_update_ttl(true))
        .unwrap();
    assert_eq!(cache.remaining_ttl("set"), Some(7));
    assert_eq!(take(&log), vec![(s("newnewval"), s("set"), DisposeReason::Set)]);

    for i in 0..5 {
        cache.set(i.to_string(), i.to_string());
    }
    assert_eq!(
        take(&log),
        vec![(s("back to old val"), s("set"), DisposeReason::Evict)]
    );

    cache
        .set_with(
            s("0"),
            s("99"),
            SetOptions::new().no_update_ttl(true).no_dispose_on_set(true),
        )
        .unwrap();
    assert!(take(&log).is_empty());

    clock.advance(10);
    assert_eq!(cache.purge_stale(), 5);
    assert_eq!(
        take(&log),
        vec![
            (s("99"), s("0"), DisposeReason::Stale),
            (s("1"), s("1"), DisposeReason::Stale),
            (s("2"), s("2"), DisposeReason::Stale),
            (s("3"), s("3"), DisposeReason::Stale),
            (s("4"), s("4"), DisposeReason::Stale),
        ]
    );

    cache
        .set_with(s("key"), s("val"), SetOptions::new().ttl(1000))
        .unwrap();
    for i in 0..5 {
        cache
            .set_with(i.to_string(), i.to_string(), SetOptions::new().ttl(1000))
            .unwrap();
        clock.advance(1);
    }
    assert_eq!(take(&log), vec![(s("val"), s("key"), DisposeReason::Evict)]);
}

#[test]
fn test_config_no_dispose_on_set_suppresses_overwrite_disposal() {
    let config = CacheConfig {
        ttl: Some(10),
        no_dispose_on_set: true,
        ..Default::default()
    };
    let (mut cache, _, log) = cache_with::<i32, i32>(config);
    cache.set(1, 1);
    cache.set(1, 2);
    cache.set_with(1, 3, SetOptions::new().ttl(50)).unwrap();

    assert!(take(&log).is_empty());
    assert_eq!(cache.get(&1), Some(&3));
    assert_eq!(cache.remaining_ttl(&1), Some(50));
    assert!(cache.delete(&1));
    assert_eq!(take(&log), vec![(3, 1, DisposeReason::Delete)]);
}

#[test]
fn test_no_update_ttl_insert_at_capacity_evicts_lru() {
    let config = CacheConfig {
        ttl: Some(10),
        max: Some(5),
        ..Default::default()
    };
    let (mut cache, clock, log) = cache_with::<i32, i32>(config);
    for i in 0..5 {
        cache.set(i, i);
    }
    for i in 0..5 {
        assert_eq!(cache.remaining_ttl(&i), Some(10));
    }

    clock.advance(5);
    cache
        .set_with(5, 5, SetOptions::new().no_update_ttl(true))
        .unwrap();
    assert_eq!(take(&log), vec![(0, 0, DisposeReason::Evict)]);
    assert_eq!(cache.len(), 5);
    assert_eq!(cache.remaining_ttl(&5), Some(10));
    assert_eq!(cache.remaining_ttl(&1), Some(5));
}

// == Get ==

#[test]
fn test_get_update_age() {
    let (mut cache, clock, _) = cache_with::<i32, i32>(ttl_config(10));
    cache.set(0, 0);
    assert_eq!(cache.remaining_ttl(&0), Some(10));

    clock.advance(7);
    assert_eq!(cache.remaining_ttl(&0), Some(3));
    assert_eq!(cache.get(&0), Some(&0));
    assert_eq!(cache.remaining_ttl(&0), Some(3));

    let refresh = GetOptions::new().update_age_on_get(true);
    assert_eq!(cache.get_with(&0, refresh).unwrap(), Some(&0));
    assert_eq!(cache.remaining_ttl(&0), Some(10));

    clock.advance(5);
    assert_eq!(cache.get_with(&0, refresh.ttl(1000)).unwrap(), Some(&0));
    assert_eq!(cache.remaining_ttl(&0), Some(1000));
}

// == Delete ==

#[test]
fn test_delete() {
    let (mut cache, _, log) = cache_with::<i32, i32>(ttl_config(10));
    cache.set(0, 0);
    cache.set(1, 1);

    assert!(cache.delete(&0));
    assert_eq!(cache.get(&0), None);
    assert!(!cache.has(&0));
    assert_eq!(cache.get(&1), Some(&1));
    assert!(cache.has(&1));

    assert!(cache.delete(&1));
    assert_eq!(cache.get(&1), None);
    assert!(!cache.has(&1));

    assert!(!cache.delete(&0));
    assert_eq!(cache.remaining_ttl(&0), Some(0));
    assert_eq!(
        take(&log),
        vec![(0, 0, DisposeReason::Delete), (1, 1, DisposeReason::Delete)]
    );
}

// == Iteration ==

#[test]
fn test_iterators() {
    let (mut cache, _, _) = cache_with::<i32, i32>(ttl_config(10));
    for i in 0..3 {
        cache.set(i, i * 2);
    }

    let entries: Vec<(i32, i32)> = cache.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(entries, vec![(0, 0), (1, 2), (2, 4)]);
    let via_ref: Vec<(i32, i32)> = (&cache).into_iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(via_ref, entries);
    assert_eq!(cache.values().copied().collect::<Vec<_>>(), vec![0, 2, 4]);
    assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(cache.keys().rev().copied().collect::<Vec<_>>(), vec![2, 1, 0]);
}

// == Clear ==

#[test]
fn test_clear_disposes_in_order() {
    let (mut cache, _, log) = cache_with::<i32, i32>(ttl_config(10));
    for i in 0..3 {
        cache.set(i, i * 2);
    }
    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(
        take(&log),
        vec![
            (0, 0, DisposeReason::Delete),
            (2, 1, DisposeReason::Delete),
            (4, 2, DisposeReason::Delete),
        ]
    );
}

#[test]
fn test_clear_without_dispose() {
    let mut cache: TtlCache<i32, i32> = TtlCache::new(ttl_config(10)).unwrap();
    for i in 0..3 {
        cache.set(i, i * 2);
    }
    cache.clear();
    assert!(cache.is_empty());
    cache.set(7, 7);
    assert_eq!(cache.get(&7), Some(&7));
}

// == Shared Expiration ==

#[test]
fn test_update_ttl_multiple_same_expiration() {
    let (mut cache, clock, _) = cache_with::<i32, i32>(ttl_config(10));
    for i in 0..10 {
        cache.set(i, i * 2);
    }
    clock.advance(5);
    cache.set(5, 500);

    for i in 0..10 {
        let expected = if i == 5 { 10 } else { 5 };
        assert_eq!(cache.remaining_ttl(&i), Some(expected), "key {}", i);
    }
}

#[test]
fn test_stale_entries_hold_capacity_until_seen() {
    let config = CacheConfig {
        ttl: Some(10),
        max: Some(2),
        ..Default::default()
    };
    let (mut cache, clock, log) = cache_with::<i32, i32>(config);
    cache.set(1, 1);
    cache.set(2, 2);
    clock.advance(10);

    assert_eq!(cache.len(), 2);
    cache.set(3, 3);
    assert_eq!(take(&log), vec![(1, 1, DisposeReason::Evict)]);
    assert!(!cache.has(&2));
    assert_eq!(take(&log), vec![(2, 2, DisposeReason::Stale)]);
    assert_eq!(cache.len(), 1);
}
