//! Concurrent cache of visibility decisions.
//!
//! Entries are bounded by count and age. Lookups for the same key that
//! miss concurrently share one computation: the first caller computes
//! while holding the entry's lock and the others wait on it.

use std::collections::HashMap;
use std::hash::{BuildHasher, RandomState};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use gitscope_git::ObjectId;
use tracing::{debug, trace};

use crate::access::PrincipalKey;
use crate::config::VisibilityConfig;
use crate::error::Result;

/// Identifies one cached decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub principal: PrincipalKey,
    pub repository: String,
    pub id: ObjectId,
}

impl CacheKey {
    pub fn new(principal: PrincipalKey, repository: impl Into<String>, id: ObjectId) -> Self {
        Self {
            principal,
            repository: repository.into(),
            id,
        }
    }
}

#[derive(Debug)]
struct Slot {
    created: Instant,
    value: Mutex<Option<bool>>,
}

type Shard = HashMap<CacheKey, Arc<Slot>>;

/// Sharded, size- and age-bounded map from [`CacheKey`] to a decision.
#[derive(Debug)]
pub struct VisibilityCache {
    shards: Box<[Mutex<Shard>]>,
    hasher: RandomState,
    shard_capacity: usize,
    max_age: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl VisibilityCache {
    /// Create a cache holding roughly `max_entries` decisions for at most
    /// `max_age` each. A `max_entries` of zero disables caching.
    #[must_use]
    pub fn new(max_entries: usize, max_age: Duration, shards: usize) -> Self {
        let shards = shards.clamp(1, max_entries.max(1));
        let shard_capacity = max_entries.div_ceil(shards);
        Self {
            shards: (0..shards).map(|_| Mutex::new(HashMap::new())).collect(),
            hasher: RandomState::new(),
            shard_capacity,
            max_age,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn from_config(config: &VisibilityConfig) -> Self {
        Self::new(
            config.cache_max_entries,
            config.cache_max_age(),
            config.cache_shards,
        )
    }

    /// Return the cached decision for `key`, or run `compute` to produce it.
    ///
    /// At most one `compute` runs per key at a time; concurrent callers for
    /// the same key block until it finishes and then reuse its answer.
    /// Errors are returned to the computing caller and not cached.
    ///
    /// # Errors
    /// Propagates the error returned by `compute`.
    pub fn get_or_compute<F>(&self, key: CacheKey, compute: F) -> Result<bool>
    where
        F: FnOnce() -> Result<bool>,
    {
        if self.shard_capacity == 0 {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return compute();
        }

        let id = key.id;
        let slot = self.slot(key);
        let mut value = slot.value.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(visible) = *value {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(%id, visible, "visibility cache hit");
            return Ok(visible);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(%id, "visibility cache miss");
        let visible = compute()?;
        *value = Some(visible);
        Ok(visible)
    }

    /// Find the live slot for `key`, inserting an empty one if needed.
    ///
    /// Slots that a caller still holds are never dropped, so a computation
    /// in flight keeps its key until it is done.
    fn slot(&self, key: CacheKey) -> Arc<Slot> {
        let mut shard = self.shard(&key);
        if let Some(slot) = shard.get(&key) {
            if slot.created.elapsed() < self.max_age || in_use(slot) {
                return Arc::clone(slot);
            }
            trace!(id = %key.id, "visibility entry expired");
            shard.remove(&key);
        }

        if shard.len() >= self.shard_capacity {
            let max_age = self.max_age;
            shard.retain(|_, slot| slot.created.elapsed() < max_age || in_use(slot));
        }
        if shard.len() >= self.shard_capacity {
            let oldest = shard
                .iter()
                .filter(|(_, slot)| !in_use(slot))
                .min_by_key(|(_, slot)| slot.created)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(oldest) => {
                    shard.remove(&oldest);
                }
                None => trace!(len = shard.len(), "every entry in use, shard over capacity"),
            }
        }

        let slot = Arc::new(Slot {
            created: Instant::now(),
            value: Mutex::new(None),
        });
        shard.insert(key, Arc::clone(&slot));
        slot
    }

    fn shard(&self, key: &CacheKey) -> MutexGuard<'_, Shard> {
        let index = usize::try_from(self.hasher.hash_one(key) % self.shards.len() as u64)
            .unwrap_or_default();
        self.shards[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached decision for `key`, if one is present, fresh and not
    /// currently being computed.
    #[must_use]
    pub fn peek(&self, key: &CacheKey) -> Option<bool> {
        let shard = self.shard(key);
        let slot = shard.get(key)?;
        if slot.created.elapsed() >= self.max_age {
            return None;
        }
        slot.value.try_lock().ok().and_then(|value| *value)
    }

    /// Number of entries, including ones still being computed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.lock().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lookups answered from the cache.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that ran a computation.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Drop every entry.
    pub fn clear(&self) {
        for shard in &*self.shards {
            shard.lock().unwrap_or_else(PoisonError::into_inner).clear();
        }
    }
}

/// Whether a caller outside the map holds the slot, i.e. is computing or
/// waiting on it. Only called with the shard lock held.
fn in_use(slot: &Arc<Slot>) -> bool {
    Arc::strong_count(slot) > 1
}

impl Default for VisibilityCache {
    fn default() -> Self {
        Self::from_config(&VisibilityConfig::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::Barrier;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    fn key(principal: &str, n: u8) -> CacheKey {
        CacheKey::new(
            PrincipalKey::new(principal),
            "repo",
            ObjectId::from_bytes(&[n; 20]).unwrap(),
        )
    }

    #[test]
    fn test_computes_once_then_hits() {
        let cache = VisibilityCache::default();
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let visible = cache
                .get_or_compute(key("alice", 1), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(true)
                })
                .unwrap();
            assert!(visible);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.hits(), 2);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.peek(&key("alice", 1)), Some(true));
    }

    #[test]
    fn test_principals_do_not_share_entries() {
        let cache = VisibilityCache::default();
        cache.get_or_compute(key("alice", 1), || Ok(true)).unwrap();
        let bob = cache.get_or_compute(key("bob", 1), || Ok(false)).unwrap();
        assert!(!bob);
        assert_eq!(cache.peek(&key("alice", 1)), Some(true));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = VisibilityCache::default();
        let err = cache.get_or_compute(key("alice", 1), || Err(Error::InvalidLimit));
        assert!(err.is_err());
        assert_eq!(cache.peek(&key("alice", 1)), None);
        assert!(cache.get_or_compute(key("alice", 1), || Ok(true)).unwrap());
    }

    #[test]
    fn test_size_bound_evicts_oldest() {
        let cache = VisibilityCache::new(2, Duration::from_secs(60), 1);
        cache.get_or_compute(key("a", 1), || Ok(true)).unwrap();
        thread::sleep(Duration::from_millis(2));
        cache.get_or_compute(key("a", 2), || Ok(true)).unwrap();
        thread::sleep(Duration::from_millis(2));
        cache.get_or_compute(key("a", 3), || Ok(true)).unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.peek(&key("a", 1)), None);
        assert_eq!(cache.peek(&key("a", 3)), Some(true));
    }

    #[test]
    fn test_expired_entries_are_recomputed() {
        let cache = VisibilityCache::new(16, Duration::ZERO, 4);
        let calls = AtomicUsize::new(0);
        for _ in 0..2 {
            cache
                .get_or_compute(key("a", 1), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(true)
                })
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let cache = VisibilityCache::new(0, Duration::from_secs(60), 4);
        cache.get_or_compute(key("a", 1), || Ok(true)).unwrap();
        assert!(cache.is_empty());
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_concurrent_misses_compute_once() {
        let cache = VisibilityCache::default();
        let calls = AtomicUsize::new(0);
        let barrier = Barrier::new(8);

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    barrier.wait();
                    let visible = cache
                        .get_or_compute(key("alice", 7), || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(50));
                            Ok(true)
                        })
                        .unwrap();
                    assert!(visible);
                });
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.hits(), 7);
    }

    #[test]
    fn test_eviction_spares_running_computation() {
        let cache = VisibilityCache::new(1, Duration::from_secs(60), 1);
        let calls = AtomicUsize::new(0);
        let started = Barrier::new(2);

        let slow = || {
            calls.fetch_add(1, Ordering::SeqCst);
            started.wait();
            thread::sleep(Duration::from_millis(300));
            Ok(true)
        };

        thread::scope(|s| {
            let first = s.spawn(|| cache.get_or_compute(key("a", 1), slow).unwrap());
            started.wait();

            // Fills the only slot while key 1 is still computing.
            cache.get_or_compute(key("a", 2), || Ok(false)).unwrap();

            let second = s.spawn(|| {
                cache
                    .get_or_compute(key("a", 1), || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(true)
                    })
                    .unwrap()
            });
            assert!(first.join().unwrap());
            assert!(second.join().unwrap());
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear() {
        let cache = VisibilityCache::default();
        cache.get_or_compute(key("a", 1), || Ok(true)).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
