use super::launch::Launch;
use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Response type for the /v5/launches/query endpoint.
///
/// One page of launches in server sort order plus the navigation metadata
/// needed to request the following page.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LaunchPage {
    docs: Vec<Launch>,
    total_docs: u32,
    #[serde(default)]
    offset: u32,
    limit: u32,
    total_pages: u32,
    page: u32,
    #[serde(default)]
    paging_counter: u32,
    #[serde(default)]
    has_prev_page: bool,
    has_next_page: bool,
    #[serde(default)]
    prev_page: Option<u32>,
    #[serde(default)]
    next_page: Option<u32>,
}

impl SerdeJSONBodyHTTPResponseType for LaunchPage {}

impl LaunchPage {
    pub fn docs(&self) -> &[Launch] { &self.docs }
    pub fn total_docs(&self) -> u32 { self.total_docs }
    pub fn offset(&self) -> u32 { self.offset }
    pub fn limit(&self) -> u32 { self.limit }
    pub fn total_pages(&self) -> u32 { self.total_pages }
    pub fn page(&self) -> u32 { self.page }
    pub fn paging_counter(&self) -> u32 { self.paging_counter }
    pub fn has_prev_page(&self) -> bool { self.has_prev_page }
    pub fn has_next_page(&self) -> bool { self.has_next_page }
    pub fn prev_page(&self) -> Option<u32> { self.prev_page }

    /// The page cursor: the number of the following page if the server reports one.
    pub fn next_page(&self) -> Option<u32> {
        if self.has_next_page { self.next_page } else { None }
    }

    /// Keeps only the launches matching `keep`, navigation metadata stays untouched.
    pub fn retain_docs(&mut self, keep: impl FnMut(&Launch) -> bool) {
        self.docs.retain(keep);
    }
}
