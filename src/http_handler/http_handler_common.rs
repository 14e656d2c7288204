use strum_macros::Display;

/// The kind of upstream resource a fetch was aimed at.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    Launches,
    Launch,
    Launchpad,
    Launchpads,
}

impl ResourceKind {
    /// The user facing message reported when fetching this kind fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            ResourceKind::Launches => "Failed to fetch launches",
            ResourceKind::Launch => "Failed to fetch launch details",
            ResourceKind::Launchpad => "Failed to fetch launchpad details",
            ResourceKind::Launchpads => "Failed to fetch launchpads",
        }
    }
}

/// Domain level fetch failure.
///
/// Transport detail (status codes, timeouts, connection problems) is only
/// logged. A missing entity is reported like any other failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchError {
    /// The upstream call for the given resource kind failed.
    Failed(ResourceKind),
    /// The background task driving the fetch ended without producing a result.
    Abandoned,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Failed(kind) => f.write_str(kind.failure_message()),
            FetchError::Abandoned => f.write_str("Fetch was abandoned"),
        }
    }
}

impl std::error::Error for FetchError {}
