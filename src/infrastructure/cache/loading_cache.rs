//! In-process read-through cache with refresh-ahead.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::AppError;

/// Timing and size policy for a [`LoadingCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// A slot is discarded this long after it was written.
    pub expire_after_write: Duration,
    /// A read of a slot older than this triggers a background reload.
    pub refresh_after_write: Duration,
    /// Upper bound on slots held, positive and negative together.
    pub max_capacity: usize,
}

impl CachePolicy {
    pub const DEFAULT_MAX_CAPACITY: usize = 10_000;

    pub fn new(expire_after_write: Duration, refresh_after_write: Duration) -> Self {
        Self {
            expire_after_write,
            refresh_after_write,
            max_capacity: Self::DEFAULT_MAX_CAPACITY,
        }
    }

    pub fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity.max(1);
        self
    }
}

impl Default for CachePolicy {
    /// 20 minutes expiry, 10 minutes refresh, 10 000 slots.
    fn default() -> Self {
        Self::new(Duration::from_secs(20 * 60), Duration::from_secs(10 * 60))
    }
}

/// Source of truth consulted on a miss or a refresh.
///
/// `Ok(None)` is a real answer ("does not exist") and is cached like any other
/// value. Errors are never cached.
#[async_trait]
pub trait CacheLoader<K, V>: Send + Sync + 'static {
    async fn load(&self, key: &K) -> Result<Option<V>, AppError>;
}

struct Slot<V> {
    value: Option<V>,
    written_at: Instant,
    generation: u64,
    refreshing: AtomicBool,
}

/// Marks the last invalidation of a key.
struct Tombstone {
    sequence: u64,
    at: Instant,
}

struct Slots<K, V> {
    live: HashMap<K, Slot<V>>,
    /// Kept for `expire_after_write` so a load that started before the
    /// invalidation of the same key cannot write its result back.
    tombstones: HashMap<K, Tombstone>,
}

struct Inner<K, V> {
    slots: RwLock<Slots<K, V>>,
    policy: CachePolicy,
    loader: Arc<dyn CacheLoader<K, V>>,
    /// Sequence of the latest invalidation, across all keys.
    invalidations: AtomicU64,
    next_generation: AtomicU64,
}

/// Read-through cache that also caches absent results.
///
/// - **Hit** (`age < expire_after_write`): the cached value is returned. If the
///   slot is older than `refresh_after_write` a single background reload is
///   spawned; the caller still gets the cached value immediately.
/// - **Miss / expired**: the loader runs on the caller's task and the result
///   (present or absent) is stored.
/// - **Failed refresh**: the stale value keeps being served until it expires.
/// - **Full**: inserting a new key first drops expired slots, then the oldest
///   one.
///
/// Cloning is cheap and every clone shares the same slots.
pub struct LoadingCache<K, V> {
    inner: Arc<Inner<K, V>>,
}

impl<K, V> Clone for LoadingCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> LoadingCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + std::fmt::Debug + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(policy: CachePolicy, loader: Arc<dyn CacheLoader<K, V>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                slots: RwLock::new(Slots {
                    live: HashMap::new(),
                    tombstones: HashMap::new(),
                }),
                policy,
                loader,
                invalidations: AtomicU64::new(0),
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.inner.policy
    }

    /// Returns the cached value for `key`, loading it on a miss.
    ///
    /// # Errors
    ///
    /// Propagates loader errors on a miss. Nothing is cached in that case.
    pub async fn get(&self, key: &K) -> Result<Option<V>, AppError> {
        let now = Instant::now();

        {
            let slots = self.inner.slots.read().await;
            if let Some(slot) = slots.live.get(key) {
                let age = now.saturating_duration_since(slot.written_at);
                if age < self.inner.policy.expire_after_write {
                    debug!(?key, "Cache HIT");
                    let value = slot.value.clone();

                    if age >= self.inner.policy.refresh_after_write
                        && !slot.refreshing.swap(true, Ordering::AcqRel)
                    {
                        self.spawn_refresh(key.clone(), slot.generation);
                    }

                    return Ok(value);
                }
            }
        }

        debug!(?key, "Cache MISS");
        let started = self.inner.invalidations.load(Ordering::Acquire);
        let value = self.inner.loader.load(key).await?;
        self.inner
            .store_loaded(key.clone(), value.clone(), started)
            .await;

        Ok(value)
    }

    /// Drops the slot for `key`, positive or negative.
    ///
    /// A load of the same key already in flight will not write its result
    /// back. Loads of other keys are unaffected.
    pub async fn invalidate(&self, key: &K) {
        let mut slots = self.inner.slots.write().await;
        let sequence = self.inner.invalidations.fetch_add(1, Ordering::AcqRel) + 1;
        slots.tombstones.insert(
            key.clone(),
            Tombstone {
                sequence,
                at: Instant::now(),
            },
        );
        if slots.live.remove(key).is_some() {
            debug!(?key, "Cache INVALIDATE");
        }
    }

    /// Removes every slot that has outlived `expire_after_write`, along with
    /// tombstones of the same age.
    ///
    /// Returns the number of slots removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let expire = self.inner.policy.expire_after_write;
        let mut slots = self.inner.slots.write().await;
        slots
            .tombstones
            .retain(|_, t| now.saturating_duration_since(t.at) < expire);
        let before = slots.live.len();
        slots
            .live
            .retain(|_, slot| now.saturating_duration_since(slot.written_at) < expire);
        before - slots.live.len()
    }

    /// Number of slots currently held, including negative and expired ones.
    pub async fn len(&self) -> usize {
        self.inner.slots.read().await.live.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Spawns a task that calls [`Self::purge_expired`] every `interval`.
    ///
    /// Abort the returned handle to stop it.
    pub fn spawn_eviction_task(&self, name: &'static str, interval: Duration) -> JoinHandle<()> {
        let cache = self.clone();

        tokio::spawn(async move {
            info!(cache = name, ?interval, "Starting cache eviction task");
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let removed = cache.purge_expired().await;
                if removed > 0 {
                    debug!(cache = name, removed, "Purged expired cache slots");
                }
            }
        })
    }

    fn spawn_refresh(&self, key: K, generation: u64) {
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            debug!(?key, "Cache REFRESH");
            let loaded = inner.loader.load(&key).await;
            let mut slots = inner.slots.write().await;

            // Invalidation removes the slot and any later write gets a new
            // generation, so a matching generation means the key is untouched.
            let untouched = slots
                .live
                .get(&key)
                .is_some_and(|slot| slot.generation == generation);
            if !untouched {
                return;
            }

            match loaded {
                Ok(value) => {
                    let slot = inner.new_slot(value);
                    slots.live.insert(key, slot);
                }
                Err(e) => {
                    warn!(?key, error = %e, "Cache refresh failed, serving stale value");
                    if let Some(slot) = slots.live.get(&key) {
                        slot.refreshing.store(false, Ordering::Release);
                    }
                }
            }
        });
    }
}

impl<K, V> Inner<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new_slot(&self, value: Option<V>) -> Slot<V> {
        Slot {
            value,
            written_at: Instant::now(),
            generation: self.next_generation.fetch_add(1, Ordering::AcqRel),
            refreshing: AtomicBool::new(false),
        }
    }

    /// Writes the result of a miss-path load unless `key` was invalidated
    /// after the load started.
    async fn store_loaded(&self, key: K, value: Option<V>, started: u64) {
        let mut slots = self.slots.write().await;

        if slots
            .tombstones
            .get(&key)
            .is_some_and(|t| t.sequence > started)
        {
            return;
        }

        if !slots.live.contains_key(&key) && slots.live.len() >= self.policy.max_capacity {
            self.make_room(&mut slots.live);
        }

        let slot = self.new_slot(value);
        slots.live.insert(key, slot);
    }

    fn make_room(&self, live: &mut HashMap<K, Slot<V>>) {
        let now = Instant::now();
        let expire = self.policy.expire_after_write;
        live.retain(|_, slot| now.saturating_duration_since(slot.written_at) < expire);

        while live.len() >= self.policy.max_capacity {
            let Some(oldest) = live
                .iter()
                .min_by_key(|(_, slot)| slot.written_at)
                .map(|(k, _)| k.clone())
            else {
                break;
            };
            live.remove(&oldest);
        }
    }
}
