use super::{QueryKey, QueryPolicy, QueryState};
use crate::http_handler::FetchError;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::{collections::HashMap, panic::AssertUnwindSafe, sync::Arc};
use tokio::sync::{Mutex, watch};
use tokio::time::Instant;

/// Produces one upstream attempt for a query.
///
/// The argument is the value cached when the fetch started, so a fetch can
/// build on it (e.g. append a page). The cache may call a fetcher several
/// times while retrying.
pub type Fetcher<T> =
    Arc<dyn Fn(Option<T>) -> BoxFuture<'static, Result<T, FetchError>> + Send + Sync>;

/// Handle of a running fetch, shared by every caller interested in the same key.
type InFlight<T> = Shared<BoxFuture<'static, Result<T, FetchError>>>;

struct CacheEntry<T> {
    state: QueryState<T>,
    last_accessed: Instant,
    in_flight: Option<InFlight<T>>,
    notifier: watch::Sender<QueryState<T>>,
}

impl<T: Clone> CacheEntry<T> {
    fn new() -> Self {
        let (notifier, _) = watch::channel(QueryState::default());
        Self { state: QueryState::default(), last_accessed: Instant::now(), in_flight: None, notifier }
    }

    fn touch(&mut self) { self.last_accessed = Instant::now(); }

    fn publish(&self) { self.notifier.send_replace(self.state.clone()); }
}

/// Keyed cache of fetched values with per-key single-flight, retry with
/// exponential backoff, staleness driven background refresh and idle eviction.
///
/// Each entry is replaced as a whole when a fetch completes; readers never see
/// a partially updated value.
pub struct QueryCache<T> {
    policy: QueryPolicy,
    entries: Mutex<HashMap<QueryKey, CacheEntry<T>>>,
}

impl<T> QueryCache<T>
where T: Clone + Send + Sync + 'static
{
    pub fn new(policy: QueryPolicy) -> Self { Self { policy, entries: Mutex::new(HashMap::new()) } }

    pub fn policy(&self) -> QueryPolicy { self.policy }

    /// Reads `key`, fetching as needed.
    ///
    /// * fresh value: returned as is
    /// * stale value: returned immediately, a background refresh is started
    /// * no value: joins the running fetch or starts one and waits for it
    pub async fn fetch(
        self: &Arc<Self>,
        key: &QueryKey,
        fetcher: Fetcher<T>,
    ) -> Result<T, FetchError> {
        let pending = {
            let mut entries = self.entries.lock().await;
            let entry = entries.entry(key.clone()).or_insert_with(CacheEntry::new);
            entry.touch();
            if let Some(data) = entry.state.data().cloned() {
                if entry.in_flight.is_none() && self.is_stale(&entry.state) {
                    log::debug!("Refreshing stale {key} in background");
                    drop(self.start_fetch(key, entry, fetcher));
                }
                return Ok(data);
            }
            match entry.in_flight.clone() {
                Some(in_flight) => in_flight,
                None => self.start_fetch(key, entry, fetcher),
            }
        };
        pending.await
    }

    /// Forces a fetch of `key` regardless of staleness, joining a running one.
    ///
    /// The cached value is replaced only on success. On failure the previous
    /// value stays available and the error is recorded next to it.
    pub async fn refetch(
        self: &Arc<Self>,
        key: &QueryKey,
        fetcher: Fetcher<T>,
    ) -> Result<T, FetchError> {
        let pending = {
            let mut entries = self.entries.lock().await;
            let entry = entries.entry(key.clone()).or_insert_with(CacheEntry::new);
            entry.touch();
            match entry.in_flight.clone() {
                Some(in_flight) => in_flight,
                None => self.start_fetch(key, entry, fetcher),
            }
        };
        pending.await
    }

    /// Starts a fetch only if none is running and `should_fetch` accepts the current state.
    ///
    /// # Returns
    /// `None` if nothing was started, the outcome of the new fetch otherwise.
    pub async fn fetch_if(
        self: &Arc<Self>,
        key: &QueryKey,
        should_fetch: impl FnOnce(&QueryState<T>) -> bool,
        fetcher: Fetcher<T>,
    ) -> Option<Result<T, FetchError>> {
        let pending = {
            let mut entries = self.entries.lock().await;
            let entry = entries.entry(key.clone()).or_insert_with(CacheEntry::new);
            entry.touch();
            if entry.in_flight.is_some() || !should_fetch(&entry.state) {
                return None;
            }
            self.start_fetch(key, entry, fetcher)
        };
        Some(pending.await)
    }

    /// Current snapshot of `key` without triggering a fetch. Counts as a read.
    pub async fn state(&self, key: &QueryKey) -> Option<QueryState<T>> {
        let mut entries = self.entries.lock().await;
        entries.get_mut(key).map(|entry| {
            entry.touch();
            entry.state.clone()
        })
    }

    /// Registers a subscriber that observes every state change of `key`.
    ///
    /// Entries with live subscribers are never evicted.
    pub async fn subscribe(&self, key: &QueryKey) -> watch::Receiver<QueryState<T>> {
        let mut entries = self.entries.lock().await;
        let entry = entries.entry(key.clone()).or_insert_with(CacheEntry::new);
        entry.touch();
        entry.notifier.subscribe()
    }

    /// Evicts entries that were not read within the GC window, have no fetch
    /// running and no subscribers.
    ///
    /// # Returns
    /// The number of evicted entries.
    pub async fn collect_garbage(&self) -> usize {
        let now = Instant::now();
        let gc_time = self.policy.gc_time;
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|key, entry| {
            let keep = entry.in_flight.is_some()
                || entry.notifier.receiver_count() > 0
                || now.duration_since(entry.last_accessed) < gc_time;
            if !keep {
                log::debug!("Evicting idle {key}");
            }
            keep
        });
        before - entries.len()
    }

    pub async fn entry_count(&self) -> usize { self.entries.lock().await.len() }

    fn is_stale(&self, state: &QueryState<T>) -> bool {
        state.updated_at().is_none_or(|at| at.elapsed() >= self.policy.stale_time)
    }

    /// Spawns the fetch task for `key` and registers it as the entry's in-flight handle.
    ///
    /// The task runs to completion and commits its result even if every
    /// caller stops waiting for it. A panicking fetcher settles the entry
    /// with [`FetchError::Abandoned`] so later reads can fetch again.
    fn start_fetch(
        self: &Arc<Self>,
        key: &QueryKey,
        entry: &mut CacheEntry<T>,
        fetcher: Fetcher<T>,
    ) -> InFlight<T> {
        let previous = entry.state.data().cloned();
        let cache = Arc::clone(self);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            let attempts = AssertUnwindSafe(cache.run_with_retry(&task_key, &fetcher, previous));
            let res = attempts.catch_unwind().await.unwrap_or_else(|_| {
                log::error!("Fetch for {task_key} panicked");
                Err(FetchError::Abandoned)
            });
            cache.commit(&task_key, res.clone()).await;
            res
        });

        let cache = Arc::clone(self);
        let task_key = key.clone();
        let in_flight = async move {
            match handle.await {
                Ok(res) => res,
                Err(err) => {
                    log::error!("Fetch task for {task_key} ended abnormally: {err}");
                    cache.commit(&task_key, Err(FetchError::Abandoned)).await;
                    Err(FetchError::Abandoned)
                }
            }
        }
        .boxed()
        .shared();

        entry.in_flight = Some(in_flight.clone());
        entry.state.start_fetching();
        entry.publish();
        in_flight
    }

    async fn run_with_retry(
        &self,
        key: &QueryKey,
        fetcher: &Fetcher<T>,
        previous: Option<T>,
    ) -> Result<T, FetchError> {
        let mut attempt = 0;
        loop {
            match fetcher(previous.clone()).await {
                Ok(data) => return Ok(data),
                Err(err) => {
                    self.record_failure(key).await;
                    if attempt >= self.policy.retries {
                        log::error!("Query {key} failed {} times: {err}", attempt + 1);
                        return Err(err);
                    }
                    let delay = QueryPolicy::retry_delay(attempt);
                    attempt += 1;
                    log::warn!(
                        "Query {key} failed: {err}, retry {attempt}/{} in {delay:?}",
                        self.policy.retries
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn record_failure(&self, key: &QueryKey) {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get_mut(key) {
            entry.state.record_failure();
            entry.publish();
        }
    }

    async fn commit(&self, key: &QueryKey, res: Result<T, FetchError>) {
        let mut entries = self.entries.lock().await;
        let Some(entry) = entries.get_mut(key) else {
            return;
        };
        if entry.in_flight.take().is_none() {
            // already settled
            return;
        }
        match res {
            Ok(data) => entry.state.succeed(data, Instant::now()),
            Err(err) => entry.state.fail(err),
        }
        entry.publish();
    }
}
