use crate::http_handler::ResourceKind;
use std::fmt::{Display, Formatter};

/// Identifies one cache entry: the operation plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Accumulated launch pages, optionally narrowed by a search term.
    LaunchPages { search: Option<String> },
    Launch(String),
    AllLaunches,
    Launchpad(String),
    AllLaunchpads,
}

impl QueryKey {
    /// Key for the paginated launch list. Blank search terms select the unfiltered list.
    pub fn launch_pages(search: Option<&str>) -> Self {
        let search = search.filter(|t| !t.trim().is_empty()).map(str::to_owned);
        QueryKey::LaunchPages { search }
    }

    /// The search term of a launch page key.
    pub fn search(&self) -> Option<&str> {
        match self {
            QueryKey::LaunchPages { search } => search.as_deref(),
            _ => None,
        }
    }

    pub fn resource_kind(&self) -> ResourceKind {
        match self {
            QueryKey::LaunchPages { .. } | QueryKey::AllLaunches => ResourceKind::Launches,
            QueryKey::Launch(_) => ResourceKind::Launch,
            QueryKey::Launchpad(_) => ResourceKind::Launchpad,
            QueryKey::AllLaunchpads => ResourceKind::Launchpads,
        }
    }
}

impl Display for QueryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryKey::LaunchPages { search: None } => write!(f, "launches"),
            QueryKey::LaunchPages { search: Some(term) } => write!(f, "launches[{term}]"),
            QueryKey::Launch(id) => write!(f, "launch[{id}]"),
            QueryKey::AllLaunches => write!(f, "allLaunches"),
            QueryKey::Launchpad(id) => write!(f, "launchpad[{id}]"),
            QueryKey::AllLaunchpads => write!(f, "allLaunchpads"),
        }
    }
}
