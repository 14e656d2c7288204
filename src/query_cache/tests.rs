use super::query_state::QueryStatus;
use super::{InfiniteData, LaunchQueries, QueryKey, QueryPolicy};
use crate::http_handler::http_request::launches_query_post::LaunchesQuery;
use crate::http_handler::http_response::{
    launch::Launch, launch_page::LaunchPage, launchpad::Launchpad,
};
use crate::http_handler::{FetchError, LaunchSource, ResourceKind};
use async_trait::async_trait;
use serde_json::json;
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const MINUTE: Duration = Duration::from_secs(60);

fn launch_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "date_utc": "2020-01-29T14:07:00.000Z",
        "upcoming": false,
        "success": true,
        "launchpad": "5e9e4501f509094ba4566f84",
        "flight_number": 1
    })
}

fn page(number: u32, names: &[&str], next: Option<u32>) -> LaunchPage {
    let docs: Vec<_> = names.iter().map(|n| launch_json(&n.to_lowercase(), n)).collect();
    serde_json::from_value(json!({
        "docs": docs,
        "totalDocs": 3,
        "limit": 2,
        "totalPages": 2,
        "page": number,
        "hasNextPage": next.is_some(),
        "nextPage": next
    }))
    .unwrap()
}

fn two_pages() -> Vec<LaunchPage> {
    vec![page(1, &["Starlink 1", "CRS-20"], Some(2)), page(2, &["Starlink 2"], None)]
}

/// Scripted upstream counting every call it receives.
#[derive(Default)]
struct MockSource {
    pages: Vec<LaunchPage>,
    failing: AtomicBool,
    delay: Duration,
    /// 1-based page call that panics instead of answering.
    panic_on_page_call: Option<usize>,
    page_calls: AtomicUsize,
    launch_calls: AtomicUsize,
    launchpad_calls: AtomicUsize,
}

impl MockSource {
    fn with_pages(pages: Vec<LaunchPage>) -> Arc<Self> { Arc::new(Self { pages, ..Self::default() }) }

    fn slow(delay: Duration) -> Arc<Self> { Arc::new(Self { delay, ..Self::default() }) }

    fn set_failing(&self, failing: bool) { self.failing.store(failing, Ordering::SeqCst); }

    fn page_calls(&self) -> usize { self.page_calls.load(Ordering::SeqCst) }
    fn launch_calls(&self) -> usize { self.launch_calls.load(Ordering::SeqCst) }
    fn launchpad_calls(&self) -> usize { self.launchpad_calls.load(Ordering::SeqCst) }

    async fn gate(&self, kind: ResourceKind) -> Result<(), FetchError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.load(Ordering::SeqCst) { Err(FetchError::Failed(kind)) } else { Ok(()) }
    }
}

#[async_trait]
impl LaunchSource for MockSource {
    async fn fetch_launch_page(&self, query: &LaunchesQuery) -> Result<LaunchPage, FetchError> {
        let call = self.page_calls.fetch_add(1, Ordering::SeqCst) + 1;
        assert_ne!(self.panic_on_page_call, Some(call), "upstream handler crashed");
        self.gate(ResourceKind::Launches).await?;
        self.pages
            .iter()
            .find(|p| p.page() == query.options.page)
            .cloned()
            .ok_or(FetchError::Failed(ResourceKind::Launches))
    }

    async fn fetch_all_launches(&self) -> Result<Vec<Launch>, FetchError> {
        self.gate(ResourceKind::Launches).await?;
        Ok(self.pages.iter().flat_map(|p| p.docs().iter().cloned()).collect())
    }

    async fn fetch_launch(&self, id: &str) -> Result<Launch, FetchError> {
        self.launch_calls.fetch_add(1, Ordering::SeqCst);
        self.gate(ResourceKind::Launch).await?;
        Ok(serde_json::from_value(launch_json(id, "Demo Mission")).unwrap())
    }

    async fn fetch_launchpad(&self, id: &str) -> Result<Launchpad, FetchError> {
        self.launchpad_calls.fetch_add(1, Ordering::SeqCst);
        self.gate(ResourceKind::Launchpad).await?;
        Ok(serde_json::from_value(json!({
            "id": id,
            "name": "VAFB SLC 4E",
            "full_name": "Vandenberg Space Force Base Space Launch Complex 4E",
            "locality": "Vandenberg Space Force Base",
            "region": "California",
            "latitude": 34.632_093,
            "longitude": -120.610_829,
            "launch_attempts": 15,
            "launch_successes": 15,
            "status": "active"
        }))
        .unwrap())
    }

    async fn fetch_all_launchpads(&self) -> Result<Vec<Launchpad>, FetchError> {
        self.gate(ResourceKind::Launchpads).await?;
        Ok(vec![self.fetch_launchpad("pad").await?])
    }
}

fn names(pages: &InfiniteData<LaunchPage>) -> Vec<&str> { pages.launches().map(Launch::name).collect() }

#[test]
fn test_retry_delay() {
    assert_eq!(QueryPolicy::retry_delay(0), Duration::from_secs(1));
    assert_eq!(QueryPolicy::retry_delay(1), Duration::from_secs(2));
    assert_eq!(QueryPolicy::retry_delay(2), Duration::from_secs(4));
    assert_eq!(QueryPolicy::retry_delay(4), Duration::from_secs(16));
    assert_eq!(QueryPolicy::retry_delay(5), Duration::from_secs(30));
    assert_eq!(QueryPolicy::retry_delay(40), Duration::from_secs(30));
    assert_eq!(QueryPolicy::LAUNCH_PAGES.max_backoff(), Duration::from_secs(7));
    assert_eq!(QueryPolicy::ALL_LAUNCHES.max_backoff(), Duration::from_secs(3));
}

#[test]
fn test_policies() {
    assert_eq!(QueryPolicy::LAUNCH_PAGES.stale_time, 5 * MINUTE);
    assert_eq!(QueryPolicy::LAUNCH.gc_time, 60 * MINUTE);
    assert_eq!(QueryPolicy::ALL_LAUNCHPADS.gc_time, 24 * 60 * MINUTE);
    assert_eq!(QueryPolicy::ALL_LAUNCHPADS.retries, 2);
    assert_eq!(QueryPolicy::LAUNCHPAD.stale_time, 30 * MINUTE);
}

#[test]
fn test_query_keys() {
    assert_eq!(QueryKey::launch_pages(Some("  ")), QueryKey::launch_pages(None));
    assert_eq!(QueryKey::launch_pages(Some("crs")).search(), Some("crs"));
    assert_eq!(QueryKey::launch_pages(Some("crs")).to_string(), "launches[crs]");
    assert_eq!(QueryKey::Launch(String::from("a")).to_string(), "launch[a]");
    assert_eq!(QueryKey::AllLaunchpads.resource_kind(), ResourceKind::Launchpads);
}

#[test]
fn test_infinite_data_keeps_page_order() {
    let pages = two_pages();
    let data = InfiniteData::first(pages[0].clone());
    assert_eq!(data.next_page_param(), Some(2));
    let data = data.with_page(pages[1].clone(), 2);
    assert_eq!(data.page_count(), 2);
    assert_eq!(data.page_params(), &[1, 2]);
    assert!(!data.has_next_page());
    assert_eq!(names(&data), vec!["Starlink 1", "CRS-20", "Starlink 2"]);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_reads_share_one_fetch() {
    let source = MockSource::slow(Duration::from_millis(100));
    let queries = LaunchQueries::new(source.clone(), 20);

    let (a, b) = tokio::join!(queries.launch("5eb87cd9ffd86e000604b32a"), queries.launch("5eb87cd9ffd86e000604b32a"));
    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(source.launch_calls(), 1);

    let (a, b) = tokio::join!(queries.refetch_launch("5eb87cd9ffd86e000604b32a"), queries.launch("other"));
    assert!(a.is_ok() && b.is_ok());
    assert_eq!(source.launch_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_failing_fetch_is_retried_then_reported() {
    let source = MockSource::with_pages(Vec::new());
    source.set_failing(true);
    let queries = LaunchQueries::new(source.clone(), 20);

    let res = queries.launch("a").await;
    assert_eq!(res.unwrap_err(), FetchError::Failed(ResourceKind::Launch));
    assert_eq!(source.launch_calls(), 4);

    let state = queries.launch_state("a").await.unwrap();
    assert_eq!(state.status(), QueryStatus::Error);
    assert_eq!(state.error(), Some(FetchError::Failed(ResourceKind::Launch)));
    assert_eq!(state.failure_count(), 4);
    assert!(state.is_empty());
    assert!(!state.is_fetching());

    // no stray retries after giving up
    tokio::time::advance(5 * MINUTE).await;
    assert_eq!(source.launch_calls(), 4);

    let res = queries.all_launchpads().await;
    assert_eq!(res.unwrap_err(), FetchError::Failed(ResourceKind::Launchpads));
}

#[tokio::test(start_paused = true)]
async fn test_recovers_within_retries() {
    let source = MockSource::with_pages(Vec::new());
    source.set_failing(true);
    let queries = LaunchQueries::new(source.clone(), 20);

    let recover = {
        let source = Arc::clone(&source);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            source.set_failing(false);
        })
    };
    let pad = queries.launchpad("5e9e4502f509092b78566f87").await.unwrap();
    recover.await.unwrap();
    assert_eq!(pad.name(), "VAFB SLC 4E");
    // failed at t=0 and t=1s, succeeded at t=3s
    assert_eq!(source.launchpad_calls(), 3);
    let state = queries.launchpad_state("5e9e4502f509092b78566f87").await.unwrap();
    assert!(state.is_success());
    assert_eq!(state.failure_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_refresh_keeps_previous_value() {
    let source = MockSource::with_pages(Vec::new());
    let queries = LaunchQueries::new(source.clone(), 20);

    let launch = queries.launch("a").await.unwrap();
    source.set_failing(true);
    let res = queries.refetch_launch("a").await;
    assert_eq!(res.unwrap_err(), FetchError::Failed(ResourceKind::Launch));

    let state = queries.launch_state("a").await.unwrap();
    assert_eq!(state.data(), Some(&launch));
    assert_eq!(state.error(), Some(FetchError::Failed(ResourceKind::Launch)));
    assert!(state.is_error());
}

#[tokio::test(start_paused = true)]
async fn test_blank_id_is_rejected_locally() {
    let source = MockSource::with_pages(Vec::new());
    let queries = LaunchQueries::new(source.clone(), 20);

    assert_eq!(queries.launch(" ").await.unwrap_err(), FetchError::Failed(ResourceKind::Launch));
    assert_eq!(queries.launchpad("").await.unwrap_err(), FetchError::Failed(ResourceKind::Launchpad));
    assert_eq!(source.launch_calls() + source.launchpad_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_search_filters_pages_and_keeps_cursor() {
    let source = MockSource::with_pages(two_pages());
    let queries = Arc::new(LaunchQueries::new(source.clone(), 2));
    let list = queries.launch_list(Some("STARLINK"));

    let first = list.load().await.unwrap();
    assert_eq!(names(&first), vec!["Starlink 1"]);
    assert!(list.has_next_page().await);

    let both = list.fetch_next_page().await.unwrap().unwrap();
    assert_eq!(names(&both), vec!["Starlink 1", "Starlink 2"]);
    assert_eq!(both.page_params(), &[1, 2]);
    assert!(!list.has_next_page().await);
    assert_eq!(list.launches().await.len(), 2);

    // last page reached
    assert!(list.fetch_next_page().await.is_none());
    assert_eq!(source.page_calls(), 2);

    let crs = queries.launch_pages(Some("crs")).await.unwrap();
    assert_eq!(names(&crs), vec!["CRS-20"]);
    assert!(crs.has_next_page());
    assert_eq!(source.page_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_blank_search_shares_unfiltered_list() {
    let source = MockSource::with_pages(two_pages());
    let queries = LaunchQueries::new(source.clone(), 2);

    let all = queries.launch_pages(None).await.unwrap();
    let blank = queries.launch_pages(Some("   ")).await.unwrap();
    assert_eq!(all, blank);
    assert_eq!(names(&all), vec!["Starlink 1", "CRS-20"]);
    assert_eq!(source.page_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_next_page_without_data_loads_first_page() {
    let source = MockSource::with_pages(two_pages());
    let queries = LaunchQueries::new(source.clone(), 2);

    let first = queries.fetch_next_page(None).await.unwrap().unwrap();
    assert_eq!(first.page_count(), 1);
    assert_eq!(source.page_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_refetch_reloads_every_loaded_page() {
    let source = MockSource::with_pages(two_pages());
    let queries = Arc::new(LaunchQueries::new(source.clone(), 2));
    let list = queries.launch_list(None);

    list.load().await.unwrap();
    list.fetch_next_page().await.unwrap().unwrap();
    let reloaded = list.refetch().await.unwrap();
    assert_eq!(reloaded.page_count(), 2);
    assert_eq!(names(&reloaded), vec!["Starlink 1", "CRS-20", "Starlink 2"]);
    assert_eq!(source.page_calls(), 4);

    source.set_failing(true);
    assert!(list.refetch().await.is_err());
    let state = list.state().await;
    assert_eq!(state.data(), Some(&reloaded));
    assert!(state.is_error());
}

#[tokio::test(start_paused = true)]
async fn test_stale_read_refreshes_in_background() {
    let source = MockSource::with_pages(Vec::new());
    let queries = LaunchQueries::new(source.clone(), 20);

    queries.launch("a").await.unwrap();
    let loaded_at = queries.launch_state("a").await.unwrap().updated_at().unwrap();

    tokio::time::advance(MINUTE).await;
    queries.launch("a").await.unwrap();
    assert_eq!(source.launch_calls(), 1);

    tokio::time::advance(10 * MINUTE).await;
    let stale = queries.launch("a").await;
    assert!(stale.is_ok());
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(source.launch_calls(), 2);
    let state = queries.launch_state("a").await.unwrap();
    assert!(state.updated_at().unwrap() > loaded_at);
    assert!(!state.is_fetching());
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_observe_changes() {
    let source = MockSource::with_pages(two_pages());
    let queries = Arc::new(LaunchQueries::new(source.clone(), 2));
    let list = queries.launch_list(None);

    let mut rx = list.subscribe().await;
    assert_eq!(rx.borrow_and_update().status(), QueryStatus::Pending);
    list.load().await.unwrap();
    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    assert!(state.is_success());
    assert_eq!(state.data().map(InfiniteData::page_count), Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_idle_entries_are_evicted() {
    let source = MockSource::with_pages(two_pages());
    let queries = Arc::new(LaunchQueries::new(source.clone(), 2));
    let list = queries.launch_list(None);

    let rx = list.subscribe().await;
    list.load().await.unwrap();
    queries.launch("a").await.unwrap();
    queries.all_launches().await.unwrap();

    tokio::time::advance(30 * MINUTE).await;
    assert_eq!(queries.collect_garbage().await, 0);

    tokio::time::advance(31 * MINUTE).await;
    // the subscribed launch list survives
    assert_eq!(queries.collect_garbage().await, 2);
    assert!(queries.launch_state("a").await.is_none());
    assert!(list.state().await.is_success());

    drop(rx);
    tokio::time::advance(31 * MINUTE).await;
    assert_eq!(queries.collect_garbage().await, 1);

    queries.launch("a").await.unwrap();
    assert_eq!(source.launch_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_gc_loop_stops_on_cancel() {
    let source = MockSource::with_pages(Vec::new());
    let queries = Arc::new(LaunchQueries::new(source.clone(), 20));
    queries.launch("a").await.unwrap();

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(Arc::clone(&queries).run_gc(cancel.clone()));
    tokio::time::sleep(61 * MINUTE + MINUTE).await;
    assert!(queries.launch_state("a").await.is_none());

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_failing_page_fetch_stops_after_retries() {
    let source = MockSource::with_pages(two_pages());
    source.set_failing(true);
    let queries = Arc::new(LaunchQueries::new(source.clone(), 2));
    let list = queries.launch_list(Some("starlink"));

    let res = list.load().await;
    assert_eq!(res.unwrap_err(), FetchError::Failed(ResourceKind::Launches));
    assert_eq!(source.page_calls(), 1 + QueryPolicy::LAUNCH_PAGES.retries as usize);

    let state = list.state().await;
    assert!(state.is_error());
    assert!(!state.is_loading());
    assert!(list.launches().await.is_empty());

    tokio::time::advance(QueryPolicy::LAUNCH_PAGES.max_backoff() * 2).await;
    assert_eq!(source.page_calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_next_page_is_skipped_while_loading() {
    let source = Arc::new(MockSource {
        pages: two_pages(),
        delay: Duration::from_millis(100),
        ..MockSource::default()
    });
    let queries = Arc::new(LaunchQueries::new(source.clone(), 2));
    let list = queries.launch_list(None);

    let (loaded, next) = tokio::join!(list.load(), list.fetch_next_page());
    assert_eq!(loaded.unwrap().page_count(), 1);
    assert!(next.is_none());
    assert_eq!(source.page_calls(), 1);

    let (a, b) = tokio::join!(list.fetch_next_page(), list.fetch_next_page());
    assert!(a.is_some() != b.is_some());
    let pages = a.or(b).unwrap().unwrap();
    assert_eq!(pages.page_count(), 2);
    assert_eq!(source.page_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_page_loads_share_one_fetch() {
    let source = Arc::new(MockSource {
        pages: two_pages(),
        delay: Duration::from_millis(100),
        ..MockSource::default()
    });
    let queries = Arc::new(LaunchQueries::new(source.clone(), 2));
    let list = queries.launch_list(Some("starlink"));
    let same = queries.launch_list(Some("starlink"));

    let (a, b) = tokio::join!(list.load(), same.load());
    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(source.page_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_panicking_refresh_settles_entry() {
    let source = Arc::new(MockSource {
        pages: two_pages(),
        panic_on_page_call: Some(2),
        ..MockSource::default()
    });
    let queries = Arc::new(LaunchQueries::new(source.clone(), 2));
    let list = queries.launch_list(None);

    let first = list.load().await.unwrap();
    tokio::time::advance(6 * MINUTE).await;
    // stale read, the background refresh panics
    assert_eq!(list.load().await.unwrap(), first);
    tokio::time::sleep(Duration::from_secs(1)).await;

    let state = list.state().await;
    assert!(!state.is_fetching());
    assert_eq!(state.error(), Some(FetchError::Abandoned));
    assert_eq!(state.data(), Some(&first));

    let pages = list.fetch_next_page().await.unwrap().unwrap();
    assert_eq!(pages.page_count(), 2);
    assert_eq!(source.page_calls(), 3);

    tokio::time::advance(31 * MINUTE).await;
    assert_eq!(queries.collect_garbage().await, 1);
}

#[test]
fn test_entity_keys() {
    let key = LaunchQueries::entity_key("5e9e4502", ResourceKind::Launchpad, QueryKey::Launchpad);
    assert_eq!(key, Ok(QueryKey::Launchpad(String::from("5e9e4502"))));
    assert_eq!(key.unwrap().resource_kind(), ResourceKind::Launchpad);
    let key = LaunchQueries::entity_key("5eb87cd9", ResourceKind::Launch, QueryKey::Launch);
    assert_eq!(key.unwrap().to_string(), "launch[5eb87cd9]");
    let blank = LaunchQueries::entity_key("\t", ResourceKind::Launchpad, QueryKey::Launchpad);
    assert_eq!(blank, Err(FetchError::Failed(ResourceKind::Launchpad)));
}
