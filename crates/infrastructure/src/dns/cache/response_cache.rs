use dashmap::DashMap;
use dnsproxy_domain::DomainError;
use lru::LruCache;
use rustc_hash::FxBuildHasher;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;

type InflightResult<V> = Option<Result<V, DomainError>>;
type InflightSender<V> = Arc<watch::Sender<InflightResult<V>>>;
type InflightMap<V> = Arc<DashMap<String, InflightSender<V>, FxBuildHasher>>;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Owns the in-flight registration of one producing task.
///
/// Only the sender this guard registered is ever removed, so a finished or
/// dropped leader cannot unregister a successor on the same key. A leader
/// dropped before completing publishes `None`, which sends joined callers
/// back to the start of `fetch`.
struct InflightLeaderGuard<V> {
    inflight: InflightMap<V>,
    key: String,
    tx: InflightSender<V>,
    completed: bool,
}

impl<V> InflightLeaderGuard<V> {
    fn unregister(&self) {
        self.inflight
            .remove_if(&self.key, |_, registered| Arc::ptr_eq(registered, &self.tx));
    }

    fn complete(mut self, result: Result<V, DomainError>) {
        self.completed = true;
        self.unregister();
        let _ = self.tx.send(Some(result));
    }
}

impl<V> Drop for InflightLeaderGuard<V> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        self.unregister();
        let _ = self.tx.send(None);
    }
}

enum Role<V> {
    Leader(InflightLeaderGuard<V>),
    Follower(watch::Receiver<InflightResult<V>>),
}

/// TTL-bound LRU store with single-flight production per key.
pub struct ResponseCache<V> {
    entries: Mutex<LruCache<String, CacheEntry<V>, FxBuildHasher>>,
    inflight: InflightMap<V>,
}

impl<V> ResponseCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::with_hasher(capacity, FxBuildHasher)),
            inflight: Arc::new(DashMap::with_hasher(FxBuildHasher)),
        }
    }

    /// Live value for `key`. Expired entries are removed.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if now < entry.expires_at => return Some(entry.value.clone()),
            Some(_) => {}
            None => return None,
        }

        entries.pop(key);
        None
    }

    pub fn insert(&self, key: String, value: V, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(key, entry);
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached value for `key`, or the result of `producer`.
    ///
    /// Concurrent callers for the same key share one `producer` run and its
    /// outcome. Only successful values are stored.
    pub async fn fetch<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<V, DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, DomainError>>,
    {
        loop {
            if let Some(value) = self.get(key) {
                debug!(key = %key, "Cache HIT");
                return Ok(value);
            }

            match self.register_or_join(key) {
                Role::Follower(rx) => {
                    if let Some(result) = Self::wait_for_leader(rx).await {
                        return result;
                    }
                    debug!(key = %key, "In-flight producer abandoned, retrying");
                }
                Role::Leader(guard) => {
                    // Another leader may have stored the value since our miss
                    if let Some(value) = self.get(key) {
                        guard.complete(Ok(value.clone()));
                        return Ok(value);
                    }

                    debug!(key = %key, "Cache MISS");
                    let result = producer().await;
                    if let Ok(value) = &result {
                        self.insert(key.to_string(), value.clone(), ttl);
                    }
                    guard.complete(result.clone());
                    return result;
                }
            }
        }
    }

    fn register_or_join(&self, key: &str) -> Role<V> {
        match self.inflight.entry(key.to_string()) {
            dashmap::Entry::Occupied(e) => {
                let rx = e.get().subscribe();
                drop(e);
                Role::Follower(rx)
            }
            dashmap::Entry::Vacant(e) => {
                let (tx, _rx) = watch::channel(None);
                let tx = Arc::new(tx);
                e.insert(Arc::clone(&tx));
                Role::Leader(InflightLeaderGuard {
                    inflight: Arc::clone(&self.inflight),
                    key: key.to_string(),
                    tx,
                    completed: false,
                })
            }
        }
    }

    async fn wait_for_leader(
        mut rx: watch::Receiver<InflightResult<V>>,
    ) -> Option<Result<V, DomainError>> {
        let _ = rx.changed().await;
        let result = rx.borrow().clone();
        result
    }
}
