use super::http_client::HTTPClient;
use super::http_handler_common::{FetchError, ResourceKind};
use super::http_request::{
    launch_get::LaunchRequest,
    launches_get::AllLaunchesRequest,
    launches_query_post::LaunchesQuery,
    launchpad_get::LaunchpadRequest,
    launchpads_get::AllLaunchpadsRequest,
    request_common::{JSONBodyHTTPRequestType, NoBodyHTTPRequestType},
};
use super::http_response::{
    launch::Launch, launch_page::LaunchPage, launchpad::Launchpad, response_common::ResponseError,
};
use async_trait::async_trait;
use std::sync::Arc;

/// One-shot access to the upstream launch data.
///
/// Implementations perform exactly one upstream call per invocation and never
/// retry; retrying and caching is left to the query layer.
#[async_trait]
pub trait LaunchSource: Send + Sync {
    /// Fetches one page of launches matching `query`.
    async fn fetch_launch_page(&self, query: &LaunchesQuery) -> Result<LaunchPage, FetchError>;
    /// Fetches every launch without filtering or paging.
    async fn fetch_all_launches(&self) -> Result<Vec<Launch>, FetchError>;
    /// Fetches a single launch, unknown ids fail like any other request.
    async fn fetch_launch(&self, id: &str) -> Result<Launch, FetchError>;
    /// Fetches a single launchpad.
    async fn fetch_launchpad(&self, id: &str) -> Result<Launchpad, FetchError>;
    /// Fetches every launchpad.
    async fn fetch_all_launchpads(&self) -> Result<Vec<Launchpad>, FetchError>;
}

/// [`LaunchSource`] backed by the public REST API.
#[derive(Debug, Clone)]
pub struct LaunchApi {
    client: Arc<HTTPClient>,
}

impl LaunchApi {
    pub fn new(client: Arc<HTTPClient>) -> Self { Self { client } }

    /// Logs the transport detail of a failed request and reduces it to a [`FetchError`].
    fn surface<T>(kind: ResourceKind, res: Result<T, ResponseError>) -> Result<T, FetchError> {
        res.map_err(|err| {
            log::error!("Error fetching {kind}: {err:?}");
            FetchError::Failed(kind)
        })
    }
}

#[async_trait]
impl LaunchSource for LaunchApi {
    async fn fetch_launch_page(&self, query: &LaunchesQuery) -> Result<LaunchPage, FetchError> {
        let res = query.send_request(&self.client).await;
        Self::surface(ResourceKind::Launches, res)
    }

    async fn fetch_all_launches(&self) -> Result<Vec<Launch>, FetchError> {
        let res = AllLaunchesRequest {}.send_request(&self.client).await;
        Self::surface(ResourceKind::Launches, res).map(Vec::from)
    }

    async fn fetch_launch(&self, id: &str) -> Result<Launch, FetchError> {
        let res = LaunchRequest { id }.send_request(&self.client).await;
        Self::surface(ResourceKind::Launch, res)
    }

    async fn fetch_launchpad(&self, id: &str) -> Result<Launchpad, FetchError> {
        let res = LaunchpadRequest { id }.send_request(&self.client).await;
        Self::surface(ResourceKind::Launchpad, res)
    }

    async fn fetch_all_launchpads(&self) -> Result<Vec<Launchpad>, FetchError> {
        let res = AllLaunchpadsRequest {}.send_request(&self.client).await;
        Self::surface(ResourceKind::Launchpads, res).map(Vec::from)
    }
}
