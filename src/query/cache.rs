use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::time::Instant;

use super::{QueryKey, QueryOptions};
use crate::ClientError;

type Value = Arc<dyn Any + Send + Sync>;
type Fetch = Shared<BoxFuture<'static, Result<Value, ClientError>>>;

/// How long a stale value is kept when no GC time is configured.
pub const DEFAULT_GC_TIME: Duration = Duration::from_secs(5 * 60);

struct Entry {
    value: Value,
    /// `None` when the stale time does not fit in an `Instant`.
    stale_after: Option<Instant>,
    /// When the entry is evicted; `stale_after` plus the cache's GC time.
    expires_at: Option<Instant>,
    invalidated: bool,
    /// Id of the fetch or write that produced the value. Older fetches
    /// never overwrite a newer value.
    origin: u64,
}

impl Entry {
    fn new(value: Value, stale_time: Duration, gc_time: Duration, origin: u64) -> Self {
        let stale_after = Instant::now().checked_add(stale_time);
        Self {
            value,
            stale_after,
            expires_at: stale_after.and_then(|at| at.checked_add(gc_time)),
            invalidated: false,
            origin,
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        !self.invalidated && self.stale_after.map_or(true, |at| now < at)
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

struct InFlight {
    id: u64,
    /// Slot version the fetch started under. A fetch from an older version
    /// is still awaited by its callers but no longer joined.
    version: u64,
    fetch: Fetch,
}

#[derive(Default)]
struct Slot {
    entry: Option<Entry>,
    /// The newest fetch for the key. At most one request per key is
    /// outstanding: a fetch started after an invalidation first waits for
    /// the one it supersedes.
    in_flight: Option<InFlight>,
    /// Bumped by every invalidation.
    version: u64,
}

#[derive(Default)]
struct Inner {
    slots: HashMap<QueryKey, Slot>,
    gc_time: Duration,
    /// Bumped by every clear.
    epoch: u64,
    next_id: u64,
}

impl Inner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Drops expired entries that no fetch is running for.
    fn evict_expired(&mut self, now: Instant) {
        let before = self.slots.len();
        self.slots.retain(|_, slot| {
            slot.in_flight.is_some()
                || slot.entry.as_ref().is_some_and(|entry| !entry.is_expired(now))
        });

        let evicted = before - self.slots.len();
        if evicted > 0 {
            log::debug!(target: "nutritrack", "msg=\"evicted expired queries\" count={evicted}");
        }
    }

    fn complete(
        &mut self,
        key: &QueryKey,
        started: Started,
        stale_time: Duration,
        result: &Result<Value, ClientError>,
    ) {
        if self.epoch != started.epoch {
            log::debug!(
                target: "nutritrack",
                "msg=\"discarding result fetched before cache clear\" key={key}"
            );
            return;
        }

        let gc_time = self.gc_time;
        let Some(slot) = self.slots.get_mut(key) else {
            log::debug!(
                target: "nutritrack",
                "msg=\"discarding result for removed key\" key={key}"
            );
            return;
        };

        if slot
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.id == started.id)
        {
            slot.in_flight = None;
        }

        match result {
            Ok(value) => {
                if slot
                    .entry
                    .as_ref()
                    .is_some_and(|entry| entry.origin > started.id)
                {
                    return;
                }
                let mut entry = Entry::new(value.clone(), stale_time, gc_time, started.id);
                entry.invalidated = slot.version != started.version;
                slot.entry = Some(entry);
            }
            Err(e) => {
                log::debug!(
                    target: "nutritrack",
                    "msg=\"read failed, keeping previous value\" key={key} error=\"{e}\""
                );
                let empty = slot.entry.is_none() && slot.in_flight.is_none();
                if empty {
                    self.slots.remove(key);
                }
            }
        }
    }
}

/// What a fetch remembers about the cache when it started.
#[derive(Debug, Clone, Copy)]
struct Started {
    id: u64,
    epoch: u64,
    version: u64,
}

/// Keyed cache of backend reads.
///
/// - A value is served without refetching while it is fresh: younger than
///   its stale time and not invalidated.
/// - Concurrent reads of the same key share one fetch and get the same
///   result.
/// - Failures are returned to every waiting caller and never cached.
/// - A fetch that started before [`clear`](Self::clear) still answers its
///   callers but does not write into the cache; one that started before
///   [`invalidate`](Self::invalidate) stores its value already stale.
///
/// Clones share the same entries.
///
/// ```rust
/// use std::time::Duration;
///
/// use nutritrack::query::{QueryCache, QueryKey, QueryOptions};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let cache = QueryCache::new();
/// let key = QueryKey::new("todayLog");
/// let options = QueryOptions::new(Duration::from_secs(60));
///
/// let calories = cache.fetch(&key, &options, || async { Ok(1850u32) }).await;
/// assert_eq!(calories, Ok(1850));
/// assert_eq!(cache.get_query_data::<u32>(&key), Some(1850));
///
/// cache.invalidate(&key);
/// assert_eq!(cache.is_stale(&key), Some(true));
/// # }
/// ```
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Mutex<Inner>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_gc_time(DEFAULT_GC_TIME)
    }

    /// A cache that evicts values once they have been stale for `gc_time`.
    pub fn with_gc_time(gc_time: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                gc_time,
                ..Default::default()
            })),
        }
    }

    /// Returns the cached value for `key` if fresh, otherwise runs (or joins)
    /// a fetch.
    ///
    /// Retryable failures are retried `options.retries` times with a
    /// doubling delay before the error is returned.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: &QueryKey,
        options: &QueryOptions,
        fetcher: F,
    ) -> Result<T, ClientError>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        let fetch = {
            let mut inner = self.lock();
            inner.evict_expired(Instant::now());
            let epoch = inner.epoch;
            let id = inner.next_id();
            let slot = inner.slots.entry(key.clone()).or_default();

            let cached = slot
                .entry
                .as_ref()
                .filter(|entry| entry.is_fresh(Instant::now()))
                .and_then(|entry| entry.value.clone().downcast::<T>().ok());
            if let Some(value) = cached {
                log::trace!(target: "nutritrack", "msg=\"cache hit\" key={key}");
                return Ok(T::clone(&value));
            }

            match &slot.in_flight {
                Some(in_flight) if in_flight.version == slot.version => {
                    log::trace!(target: "nutritrack", "msg=\"joining in-flight read\" key={key}");
                    in_flight.fetch.clone()
                }
                superseded => {
                    let after = superseded.as_ref().map(|in_flight| in_flight.fetch.clone());
                    if after.is_some() {
                        log::trace!(
                            target: "nutritrack",
                            "msg=\"queueing read behind invalidated fetch\" key={key}"
                        );
                    }
                    let started = Started {
                        id,
                        epoch,
                        version: slot.version,
                    };
                    let fetch = self.start(key.clone(), started, *options, after, fetcher);
                    slot.in_flight = Some(InFlight {
                        id,
                        version: started.version,
                        fetch: fetch.clone(),
                    });
                    fetch
                }
            }
        };

        let value = fetch.await?;
        value
            .downcast::<T>()
            .map(|value| T::clone(&value))
            .map_err(|_| ClientError::Parse(format!("cached value for {key} has another type")))
    }

    fn start<T, F, Fut>(
        &self,
        key: QueryKey,
        started: Started,
        options: QueryOptions,
        after: Option<Fetch>,
        fetcher: F,
    ) -> Fetch
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        let cache = Arc::downgrade(&self.inner);

        async move {
            if let Some(previous) = after {
                // Only the ordering matters; its callers get its result.
                let _ = previous.await;
            }
            let result = run_with_retries(&key, &options, &fetcher)
                .await
                .map(|value| Arc::new(value) as Value);
            write_back(&cache, &key, started, options.stale_time, &result);
            result
        }
        .boxed()
        .shared()
    }

    /// The cached value for `key`, fresh or not.
    pub fn get_query_data<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        let inner = self.lock();
        let entry = inner.slots.get(key)?.entry.as_ref()?;
        entry.value.downcast_ref::<T>().cloned()
    }

    /// Stores `value` as freshly fetched. In-flight fetches that started
    /// earlier will not overwrite it.
    pub fn set_query_data<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
        value: T,
        stale_time: Duration,
    ) {
        let mut inner = self.lock();
        inner.evict_expired(Instant::now());
        let origin = inner.next_id();
        let entry = Entry::new(Arc::new(value), stale_time, inner.gc_time, origin);
        inner.slots.entry(key.clone()).or_default().entry = Some(entry);
    }

    /// `None` when nothing is cached for `key`.
    pub fn is_stale(&self, key: &QueryKey) -> Option<bool> {
        let inner = self.lock();
        let entry = inner.slots.get(key)?.entry.as_ref()?;
        Some(!entry.is_fresh(Instant::now()))
    }

    /// Marks every entry whose key starts with `key` as stale. The next read
    /// of such a key fetches again, after any fetch still running for it.
    /// Returns how many cached values were affected.
    pub fn invalidate(&self, key: &QueryKey) -> usize {
        let mut inner = self.lock();
        let mut affected = 0;

        for (_, slot) in inner
            .slots
            .iter_mut()
            .filter(|(candidate, _)| key.is_prefix_of(candidate))
        {
            slot.version += 1;
            if let Some(entry) = slot.entry.as_mut() {
                entry.invalidated = true;
                affected += 1;
            }
        }

        log::debug!(
            target: "nutritrack",
            "msg=\"invalidated queries\" key={key} affected={affected}"
        );
        affected
    }

    /// Drops `key` entirely. A fetch for it that is still running will not
    /// store its result.
    pub fn remove(&self, key: &QueryKey) {
        self.lock().slots.remove(key);
    }

    /// Drops every entry. Fetches still running will not store their results.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.epoch += 1;
        inner.slots.clear();
    }

    /// Number of cached values.
    pub fn len(&self) -> usize {
        self.lock()
            .slots
            .values()
            .filter(|slot| slot.entry.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.len())
            .finish()
    }
}

async fn run_with_retries<T, F, Fut>(
    key: &QueryKey,
    options: &QueryOptions,
    fetcher: &F,
) -> Result<T, ClientError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0;
    loop {
        match fetcher().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < options.retries => {
                let delay = options.backoff(attempt);
                attempt += 1;
                log::debug!(
                    target: "nutritrack",
                    "msg=\"retrying read\" key={key} attempt={attempt} delay_ms={} error=\"{e}\"",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

fn write_back(
    cache: &Weak<Mutex<Inner>>,
    key: &QueryKey,
    started: Started,
    stale_time: Duration,
    result: &Result<Value, ClientError>,
) {
    if let Some(inner) = cache.upgrade() {
        inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .complete(key, started, stale_time, result);
    }
}
