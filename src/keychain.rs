use crate::config::ClientConfig;
use crate::http_handler::{LaunchApi, http_client::HTTPClient};
use crate::query_cache::LaunchQueries;
use std::sync::Arc;

/// Struct holding the shared handles of the application: the HTTP client
/// and the cached query layer built on top of it.
#[derive(Clone)]
pub struct Keychain {
    /// The HTTP client for performing network requests.
    client: Arc<HTTPClient>,
    /// Cached, deduplicated and retried queries.
    queries: Arc<LaunchQueries>,
}

impl Keychain {
    /// Creates a new instance of `Keychain`.
    ///
    /// # Arguments
    /// - `config`: Base URL, timeout and page size to wire the subsystems with.
    ///
    /// # Returns
    /// A new instance of `Keychain` containing initialized subsystems.
    pub fn new(config: &ClientConfig) -> Self {
        let client = Arc::new(HTTPClient::new(config.base_url(), config.timeout()));
        let api = Arc::new(LaunchApi::new(Arc::clone(&client)));
        let queries = Arc::new(LaunchQueries::new(api, config.page_size()));
        Self { client, queries }
    }

    /// Provides a cloned reference to the HTTP client.
    pub fn client(&self) -> Arc<HTTPClient> { Arc::clone(&self.client) }

    /// Provides a cloned reference to the query layer.
    pub fn queries(&self) -> Arc<LaunchQueries> { Arc::clone(&self.queries) }
}
