use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};
use crate::http_handler::http_response::launch_page::LaunchPage;
use strum_macros::Display;

/// Request type for the /v5/launches/query endpoint.
///
/// Serializes to `{ query: {...}, options: {...} }`.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct LaunchesQuery {
    /// Server side filter predicates.
    pub query: LaunchFilter,
    /// Pagination and ordering.
    pub options: QueryOptions,
}

/// Server side filter predicates, absent fields do not filter.
#[derive(serde::Serialize, Debug, Clone, Default, PartialEq)]
pub struct LaunchFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upcoming: Option<bool>,
    /// `Some(None)` selects launches whose outcome is still unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<Option<bool>>,
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct QueryOptions {
    pub page: u32,
    pub limit: u32,
    pub sort: SortOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub populate: Option<Vec<String>>,
}

#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOptions {
    pub date_utc: SortOrder,
}

#[derive(serde::Serialize, Debug, Display, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl LaunchesQuery {
    /// Number of launches requested per page unless configured otherwise.
    pub const DEFAULT_PAGE_SIZE: u32 = 20;

    /// An unfiltered query for `page`, newest launches first.
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            query: LaunchFilter::default(),
            options: QueryOptions {
                page,
                limit,
                sort: SortOptions { date_utc: SortOrder::Desc },
                populate: None,
            },
        }
    }

    /// The same query moved to another page.
    pub fn with_page(&self, page: u32) -> Self {
        let mut next = self.clone();
        next.options.page = page;
        next
    }
}

impl JSONBodyHTTPRequestType for LaunchesQuery {
    type Body = LaunchesQuery;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for LaunchesQuery {
    type Response = LaunchPage;
    fn endpoint(&self) -> String { String::from("/v5/launches/query") }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Post }
}
