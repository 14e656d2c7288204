use std::time::Duration;

/// Freshness, eviction and retry settings of one kind of query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    /// Age after which a read serves the cached value and refreshes it in the background.
    pub stale_time: Duration,
    /// Time without reads after which an idle entry is evicted.
    pub gc_time: Duration,
    /// Additional attempts after the first failed one.
    pub retries: u32,
}

impl QueryPolicy {
    const MINUTE: Duration = Duration::from_secs(60);
    /// Backoff base delay for the first retry.
    const BASE_RETRY_DELAY: Duration = Duration::from_millis(1000);
    /// Upper bound for any single backoff delay.
    const MAX_RETRY_DELAY: Duration = Duration::from_millis(30_000);

    pub const LAUNCH_PAGES: Self = Self::new(5, 30, 3);
    pub const LAUNCH: Self = Self::new(10, 60, 3);
    pub const ALL_LAUNCHES: Self = Self::new(15, 60, 2);
    pub const LAUNCHPAD: Self = Self::new(30, 2 * 60, 3);
    pub const ALL_LAUNCHPADS: Self = Self::new(60, 24 * 60, 2);

    const fn new(stale_mins: u64, gc_mins: u64, retries: u32) -> Self {
        Self {
            stale_time: Duration::from_secs(stale_mins * Self::MINUTE.as_secs()),
            gc_time: Duration::from_secs(gc_mins * Self::MINUTE.as_secs()),
            retries,
        }
    }

    /// Delay before retry number `attempt + 1`: `min(1s * 2^attempt, 30s)`.
    pub fn retry_delay(attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        Self::BASE_RETRY_DELAY.saturating_mul(factor).min(Self::MAX_RETRY_DELAY)
    }

    /// Worst case wall time spent in backoff sleeps for one fetch.
    pub fn max_backoff(&self) -> Duration {
        (0..self.retries).map(Self::retry_delay).sum()
    }
}
