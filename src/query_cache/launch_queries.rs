use super::{Fetcher, InfiniteData, QueryCache, QueryKey, QueryPolicy, QueryState};
use crate::http_handler::http_request::launches_query_post::LaunchesQuery;
use crate::http_handler::http_response::{
    launch::Launch, launch_page::LaunchPage, launchpad::Launchpad,
};
use crate::http_handler::{FetchError, LaunchSource, ResourceKind};
use futures::FutureExt;
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

type LaunchPages = InfiniteData<LaunchPage>;

/// The query layer between consumers and a [`LaunchSource`].
///
/// Holds one [`QueryCache`] per resource kind, each with its own freshness
/// and retry policy, and knows how to turn the one-shot source calls into
/// fetchers for them.
pub struct LaunchQueries {
    source: Arc<dyn LaunchSource>,
    page_size: u32,
    launch_pages: Arc<QueryCache<LaunchPages>>,
    launches: Arc<QueryCache<Launch>>,
    all_launches: Arc<QueryCache<Vec<Launch>>>,
    launchpads: Arc<QueryCache<Launchpad>>,
    all_launchpads: Arc<QueryCache<Vec<Launchpad>>>,
}

impl LaunchQueries {
    /// Interval of the garbage collection sweep in [`Self::run_gc`].
    const GC_INTERVAL: Duration = Duration::from_secs(60);

    pub fn new(source: Arc<dyn LaunchSource>, page_size: u32) -> Self {
        Self {
            source,
            page_size,
            launch_pages: Arc::new(QueryCache::new(QueryPolicy::LAUNCH_PAGES)),
            launches: Arc::new(QueryCache::new(QueryPolicy::LAUNCH)),
            all_launches: Arc::new(QueryCache::new(QueryPolicy::ALL_LAUNCHES)),
            launchpads: Arc::new(QueryCache::new(QueryPolicy::LAUNCHPAD)),
            all_launchpads: Arc::new(QueryCache::new(QueryPolicy::ALL_LAUNCHPADS)),
        }
    }

    /// Handle on the paginated launch list for `search` as consumed by the presentation layer.
    pub fn launch_list(self: &Arc<Self>, search: Option<&str>) -> LaunchListQuery {
        LaunchListQuery { queries: Arc::clone(self), key: QueryKey::launch_pages(search) }
    }

    /// Accumulated launch pages for `search`, loading page 1 on first use.
    pub async fn launch_pages(&self, search: Option<&str>) -> Result<LaunchPages, FetchError> {
        let key = QueryKey::launch_pages(search);
        self.launch_pages.fetch(&key, self.reload_pages_fetcher(&key)).await
    }

    /// Appends the next page for `search`.
    ///
    /// # Returns
    /// `None` if the last page reported no successor or a fetch for this key
    /// is already running, the outcome of the page fetch otherwise.
    pub async fn fetch_next_page(
        &self,
        search: Option<&str>,
    ) -> Option<Result<LaunchPages, FetchError>> {
        let key = QueryKey::launch_pages(search);
        let source = Arc::clone(&self.source);
        let base_query = LaunchesQuery::page(LaunchPages::FIRST_PAGE, self.page_size);
        let term = key.search().map(str::to_owned);
        let fetcher: Fetcher<LaunchPages> = Arc::new(move |previous: Option<LaunchPages>| {
            let source = Arc::clone(&source);
            let base_query = base_query.clone();
            let term = term.clone();
            async move {
                let Some(previous) = previous else {
                    let page = fetch_page(&*source, &base_query, term.as_deref()).await?;
                    return Ok(LaunchPages::first(page));
                };
                let Some(param) = previous.next_page_param() else {
                    return Ok(previous);
                };
                let page = fetch_page(&*source, &base_query.with_page(param), term.as_deref()).await?;
                Ok(previous.with_page(page, param))
            }
            .boxed()
        });
        let has_next = |state: &QueryState<LaunchPages>| {
            state.data().is_none_or(InfiniteData::has_next_page)
        };
        self.launch_pages.fetch_if(&key, has_next, fetcher).await
    }

    /// Reloads every page currently held for `search`, replacing them at once on success.
    pub async fn refetch_launch_pages(
        &self,
        search: Option<&str>,
    ) -> Result<LaunchPages, FetchError> {
        let key = QueryKey::launch_pages(search);
        self.launch_pages.refetch(&key, self.reload_pages_fetcher(&key)).await
    }

    pub async fn launch_pages_state(&self, search: Option<&str>) -> Option<QueryState<LaunchPages>> {
        self.launch_pages.state(&QueryKey::launch_pages(search)).await
    }

    pub async fn subscribe_launch_pages(
        &self,
        search: Option<&str>,
    ) -> watch::Receiver<QueryState<LaunchPages>> {
        self.launch_pages.subscribe(&QueryKey::launch_pages(search)).await
    }

    /// A single launch. Blank ids fail without contacting the upstream.
    pub async fn launch(&self, id: &str) -> Result<Launch, FetchError> {
        let key = Self::entity_key(id, ResourceKind::Launch, QueryKey::Launch)?;
        self.launches.fetch(&key, self.launch_fetcher(id)).await
    }

    pub async fn refetch_launch(&self, id: &str) -> Result<Launch, FetchError> {
        let key = Self::entity_key(id, ResourceKind::Launch, QueryKey::Launch)?;
        self.launches.refetch(&key, self.launch_fetcher(id)).await
    }

    pub async fn launch_state(&self, id: &str) -> Option<QueryState<Launch>> {
        self.launches.state(&QueryKey::Launch(id.to_owned())).await
    }

    /// A single launchpad. Blank ids fail without contacting the upstream.
    pub async fn launchpad(&self, id: &str) -> Result<Launchpad, FetchError> {
        let key = Self::entity_key(id, ResourceKind::Launchpad, QueryKey::Launchpad)?;
        self.launchpads.fetch(&key, self.launchpad_fetcher(id)).await
    }

    pub async fn refetch_launchpad(&self, id: &str) -> Result<Launchpad, FetchError> {
        let key = Self::entity_key(id, ResourceKind::Launchpad, QueryKey::Launchpad)?;
        self.launchpads.refetch(&key, self.launchpad_fetcher(id)).await
    }

    pub async fn launchpad_state(&self, id: &str) -> Option<QueryState<Launchpad>> {
        self.launchpads.state(&QueryKey::Launchpad(id.to_owned())).await
    }

    /// Every launch, unpaged. Only used for exhaustive client side search.
    pub async fn all_launches(&self) -> Result<Vec<Launch>, FetchError> {
        self.all_launches.fetch(&QueryKey::AllLaunches, self.all_launches_fetcher()).await
    }

    pub async fn refetch_all_launches(&self) -> Result<Vec<Launch>, FetchError> {
        self.all_launches.refetch(&QueryKey::AllLaunches, self.all_launches_fetcher()).await
    }

    pub async fn all_launchpads(&self) -> Result<Vec<Launchpad>, FetchError> {
        self.all_launchpads.fetch(&QueryKey::AllLaunchpads, self.all_launchpads_fetcher()).await
    }

    pub async fn refetch_all_launchpads(&self) -> Result<Vec<Launchpad>, FetchError> {
        self.all_launchpads.refetch(&QueryKey::AllLaunchpads, self.all_launchpads_fetcher()).await
    }

    /// Runs one eviction sweep over all caches.
    ///
    /// # Returns
    /// The number of evicted entries.
    pub async fn collect_garbage(&self) -> usize {
        self.launch_pages.collect_garbage().await
            + self.launches.collect_garbage().await
            + self.all_launches.collect_garbage().await
            + self.launchpads.collect_garbage().await
            + self.all_launchpads.collect_garbage().await
    }

    /// Periodically evicts idle entries until `cancel` fires.
    ///
    /// Should be spawned as a background task.
    pub async fn run_gc(self: Arc<Self>, cancel: CancellationToken) {
        let mut sweep = tokio::time::interval(Self::GC_INTERVAL);
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = sweep.tick() => {
                    let evicted = self.collect_garbage().await;
                    if evicted > 0 {
                        log::debug!("Evicted {evicted} idle cache entries");
                    }
                }
            }
        }
        log::info!("Cache garbage collection stopped");
    }

    /// Key for a single entity, built by `key`. Blank ids are rejected as a failed fetch of `kind`.
    pub(super) fn entity_key(
        id: &str,
        kind: ResourceKind,
        key: fn(String) -> QueryKey,
    ) -> Result<QueryKey, FetchError> {
        if id.trim().is_empty() {
            log::warn!("Refusing to fetch {kind} without an id");
            return Err(FetchError::Failed(kind));
        }
        Ok(key(id.to_owned()))
    }

    /// Fetcher loading page 1 and then following the cursor until as many
    /// pages as currently cached are loaded again.
    fn reload_pages_fetcher(&self, key: &QueryKey) -> Fetcher<LaunchPages> {
        let source = Arc::clone(&self.source);
        let base_query = LaunchesQuery::page(LaunchPages::FIRST_PAGE, self.page_size);
        let term = key.search().map(str::to_owned);
        Arc::new(move |previous: Option<LaunchPages>| {
            let source = Arc::clone(&source);
            let base_query = base_query.clone();
            let term = term.clone();
            let wanted = previous.as_ref().map_or(1, InfiniteData::page_count);
            async move {
                let first = fetch_page(&*source, &base_query, term.as_deref()).await?;
                let mut pages = LaunchPages::first(first);
                while pages.page_count() < wanted {
                    let Some(param) = pages.next_page_param() else { break };
                    let page =
                        fetch_page(&*source, &base_query.with_page(param), term.as_deref()).await?;
                    pages = pages.with_page(page, param);
                }
                Ok(pages)
            }
            .boxed()
        })
    }

    fn launch_fetcher(&self, id: &str) -> Fetcher<Launch> {
        let source = Arc::clone(&self.source);
        let id = id.to_owned();
        Arc::new(move |_| {
            let source = Arc::clone(&source);
            let id = id.clone();
            async move {
                log::debug!("Fetching launch details for {id}");
                source.fetch_launch(&id).await
            }
            .boxed()
        })
    }

    fn launchpad_fetcher(&self, id: &str) -> Fetcher<Launchpad> {
        let source = Arc::clone(&self.source);
        let id = id.to_owned();
        Arc::new(move |_| {
            let source = Arc::clone(&source);
            let id = id.clone();
            async move {
                log::debug!("Fetching launchpad details for {id}");
                source.fetch_launchpad(&id).await
            }
            .boxed()
        })
    }

    fn all_launches_fetcher(&self) -> Fetcher<Vec<Launch>> {
        let source = Arc::clone(&self.source);
        Arc::new(move |_| {
            let source = Arc::clone(&source);
            async move {
                log::debug!("Fetching all launches for search");
                source.fetch_all_launches().await
            }
            .boxed()
        })
    }

    fn all_launchpads_fetcher(&self) -> Fetcher<Vec<Launchpad>> {
        let source = Arc::clone(&self.source);
        Arc::new(move |_| {
            let source = Arc::clone(&source);
            async move {
                log::debug!("Fetching all launchpads");
                source.fetch_all_launchpads().await
            }
            .boxed()
        })
    }
}

/// Fetches one upstream page and narrows it to launches whose name contains `search`.
///
/// The navigation metadata is left as reported upstream, so a page may come
/// back empty while still pointing at a next page.
async fn fetch_page(
    source: &dyn LaunchSource,
    query: &LaunchesQuery,
    search: Option<&str>,
) -> Result<LaunchPage, FetchError> {
    log::debug!("Fetching launches page {}", query.options.page);
    let mut page = source.fetch_launch_page(query).await?;
    if let Some(term) = search {
        page.retain_docs(|launch| launch.name_contains(term));
    }
    Ok(page)
}

/// The paginated launch list for one search term, the contract consumed by screens.
#[derive(Clone)]
pub struct LaunchListQuery {
    queries: Arc<LaunchQueries>,
    key: QueryKey,
}

impl LaunchListQuery {
    pub fn search(&self) -> Option<&str> { self.key.search() }

    /// Loads page 1 if nothing is cached yet; refreshes stale data in the background.
    pub async fn load(&self) -> Result<LaunchPages, FetchError> {
        self.queries.launch_pages(self.search()).await
    }

    /// Current state without fetching; `Pending` before the first load.
    pub async fn state(&self) -> QueryState<LaunchPages> {
        self.queries.launch_pages_state(self.search()).await.unwrap_or_default()
    }

    /// Accumulated launches across all loaded pages.
    pub async fn launches(&self) -> Vec<Launch> {
        self.state().await.data().map(|d| d.launches().cloned().collect()).unwrap_or_default()
    }

    pub async fn has_next_page(&self) -> bool {
        self.state().await.data().is_some_and(InfiniteData::has_next_page)
    }

    pub async fn fetch_next_page(&self) -> Option<Result<LaunchPages, FetchError>> {
        self.queries.fetch_next_page(self.search()).await
    }

    pub async fn refetch(&self) -> Result<LaunchPages, FetchError> {
        self.queries.refetch_launch_pages(self.search()).await
    }

    pub async fn subscribe(&self) -> watch::Receiver<QueryState<LaunchPages>> {
        self.queries.subscribe_launch_pages(self.search()).await
    }
}
