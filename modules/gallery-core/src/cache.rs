// Time-bounded result cache with single-flight population.
//
// Stores the pre-pagination result of one normalized query; the facade
// slices pages out of it. Entries expire lazily on read. `get_or_compute`
// holds a per-key async lock across the fetch-and-balance computation so a
// popular key cannot stampede the provider: concurrent misses run the
// computation exactly once and every waiter observes the same value.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::debug;

use crate::types::{ImageDescriptor, SortOrder};

struct CacheEntry {
    value: Arc<Vec<ImageDescriptor>>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

pub struct ResultCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
    /// Per-key population locks. A key's lock outlives the computation and
    /// is dropped once the entry is stored.
    inflight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Normalized cache key. Page and page size are deliberately excluded:
    /// every page of a query shares one pre-pagination entry. Random
    /// queries never reach the cache, so randomness is not keyed either.
    pub fn key_for(category: &str, search_term: &str, sort: SortOrder) -> String {
        format!(
            "{}|{}|{}",
            category.trim().to_lowercase(),
            search_term.trim().to_lowercase(),
            sort.as_str()
        )
    }

    pub fn get(&self, key: &str) -> Option<Arc<Vec<ImageDescriptor>>> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                debug!(key, "Cache entry expired");
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    pub fn set(&self, key: &str, value: Vec<ImageDescriptor>) -> Arc<Vec<ImageDescriptor>> {
        let value = Arc::new(value);
        self.entries.lock().unwrap().insert(
            key.to_string(),
            CacheEntry {
                value: value.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        value
    }

    /// Single-flight lookup: on a miss, run `compute` under the key's
    /// population lock. Callers that lose the race wait on the lock and then
    /// find the entry populated. A failed computation stores nothing, so the
    /// next caller retries.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &str,
        compute: F,
    ) -> Result<Arc<Vec<ImageDescriptor>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<ImageDescriptor>>>,
    {
        if let Some(hit) = self.get(key) {
            debug!(key, "Cache hit");
            return Ok(hit);
        }

        let gate = {
            let mut inflight = self.inflight.lock().unwrap();
            inflight
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        let _guard = gate.lock().await;

        // The flight that held the gate before us may have stored the entry.
        if let Some(hit) = self.get(key) {
            debug!(key, "Cache hit after waiting on in-flight computation");
            return Ok(hit);
        }

        debug!(key, "Cache miss, computing");
        match compute().await {
            Ok(value) => {
                // Store before dropping the gate: a caller that misses the
                // entry map and then installs a fresh gate must find the
                // value on its double-check, never start a second flight.
                let shared = self.set(key, value);
                self.inflight.lock().unwrap().remove(key);
                Ok(shared)
            }
            Err(err) => {
                self.inflight.lock().unwrap().remove(key);
                Err(err)
            }
        }
    }

    /// Drop every expired entry. Expiry is lazy on read; this sweep is an
    /// optional housekeeping aid for long-lived processes.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "Purged expired cache entries");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn descriptor(id: &str) -> ImageDescriptor {
        ImageDescriptor {
            id: id.to_string(),
            filename: format!("{id}.jpg"),
            category: "animals".to_string(),
            created_at: None,
            delivery_url: String::new(),
            caption: None,
        }
    }

    #[test]
    fn get_after_set_round_trips_within_ttl() {
        let cache = ResultCache::new(Duration::from_secs(60));
        cache.set("k", vec![descriptor("a"), descriptor("b")]);
        let hit = cache.get("k").unwrap();
        assert_eq!(hit.len(), 2);
        assert_eq!(hit[0].id, "a");
    }

    #[test]
    fn expired_entries_are_dropped_on_read() {
        let cache = ResultCache::new(Duration::from_millis(5));
        cache.set("k", vec![descriptor("a")]);
        std::thread::sleep(Duration::from_millis(15));
        assert!(cache.get("k").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn key_excludes_pagination_and_normalizes() {
        let a = ResultCache::key_for("Animals", " cats ", SortOrder::Newest);
        let b = ResultCache::key_for("animals", "cats", SortOrder::Newest);
        assert_eq!(a, b);
        let c = ResultCache::key_for("animals", "cats", SortOrder::Oldest);
        assert_ne!(a, c);
    }

    #[test]
    fn purge_reports_removed_count() {
        let cache = ResultCache::new(Duration::from_millis(5));
        cache.set("k1", vec![descriptor("a")]);
        cache.set("k2", vec![descriptor("b")]);
        std::thread::sleep(Duration::from_millis(15));
        assert_eq!(cache.purge_expired(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn concurrent_misses_compute_once() {
        let cache = Arc::new(ResultCache::new(Duration::from_secs(60)));
        let computes = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let computes = computes.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_compute("k", || async move {
                        computes.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok(vec![descriptor("a")])
                    })
                    .await
                    .unwrap()
            }));
        }

        for handle in handles {
            let value = handle.await.unwrap();
            assert_eq!(value.len(), 1);
        }
        assert_eq!(computes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn computation_is_stored_before_the_gate_reopens() {
        // Exercises the window between gate release and entry storage: if
        // the entry were stored after the gate disappears from the map, a
        // caller arriving in between would start a second computation.
        let cache = Arc::new(ResultCache::new(Duration::from_secs(60)));
        for round in 0..50 {
            let key = format!("k{round}");
            let computes = Arc::new(AtomicUsize::new(0));

            let mut handles = Vec::new();
            for _ in 0..4 {
                let cache = cache.clone();
                let computes = computes.clone();
                let key = key.clone();
                handles.push(tokio::spawn(async move {
                    cache
                        .get_or_compute(&key, || async move {
                            computes.fetch_add(1, Ordering::SeqCst);
                            tokio::task::yield_now().await;
                            Ok(vec![descriptor("a")])
                        })
                        .await
                        .unwrap();
                }));
            }
            for handle in handles {
                handle.await.unwrap();
            }
            assert_eq!(computes.load(Ordering::SeqCst), 1, "round {round}");
        }
    }

    #[tokio::test]
    async fn failed_computation_is_not_cached() {
        let cache = ResultCache::new(Duration::from_secs(60));
        let err = cache
            .get_or_compute("k", || async { anyhow::bail!("provider down") })
            .await;
        assert!(err.is_err());
        assert!(cache.is_empty());

        // The key is usable again afterwards.
        let value = cache
            .get_or_compute("k", || async { Ok(vec![descriptor("a")]) })
            .await
            .unwrap();
        assert_eq!(value.len(), 1);
    }
}
