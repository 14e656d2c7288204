use crate::http_handler::FetchError;
use strum_macros::Display;
use tokio::time::Instant;

/// Lifecycle of a query independent of whether a fetch is running.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// No value and no failure yet.
    Pending,
    /// The last fetch failed; an older value may still be present.
    Error,
    /// The last fetch succeeded.
    Success,
}

/// Snapshot of a cache entry as seen by consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    data: Option<T>,
    error: Option<FetchError>,
    status: QueryStatus,
    is_fetching: bool,
    failure_count: u32,
    updated_at: Option<Instant>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            status: QueryStatus::Pending,
            is_fetching: false,
            failure_count: 0,
            updated_at: None,
        }
    }
}

impl<T> QueryState<T> {
    pub fn data(&self) -> Option<&T> { self.data.as_ref() }
    pub fn error(&self) -> Option<FetchError> { self.error }
    pub fn status(&self) -> QueryStatus { self.status }
    pub fn is_fetching(&self) -> bool { self.is_fetching }
    /// Consecutive failed attempts since the last success.
    pub fn failure_count(&self) -> u32 { self.failure_count }
    pub fn updated_at(&self) -> Option<Instant> { self.updated_at }

    /// First load: fetching with nothing to show yet.
    pub fn is_loading(&self) -> bool { self.is_fetching && self.data.is_none() }
    /// Background or manual reload while a value is shown.
    pub fn is_refetching(&self) -> bool { self.is_fetching && self.data.is_some() }
    pub fn is_error(&self) -> bool { self.status == QueryStatus::Error }
    pub fn is_success(&self) -> bool { self.status == QueryStatus::Success }
    /// No value has been loaded yet.
    pub fn is_empty(&self) -> bool { self.data.is_none() }

    pub(super) fn start_fetching(&mut self) { self.is_fetching = true; }

    pub(super) fn record_failure(&mut self) { self.failure_count += 1; }

    pub(super) fn succeed(&mut self, data: T, at: Instant) {
        self.data = Some(data);
        self.error = None;
        self.status = QueryStatus::Success;
        self.is_fetching = false;
        self.failure_count = 0;
        self.updated_at = Some(at);
    }

    /// Marks the query failed, any previous value is kept next to the error.
    pub(super) fn fail(&mut self, error: FetchError) {
        self.error = Some(error);
        self.status = QueryStatus::Error;
        self.is_fetching = false;
    }
}
