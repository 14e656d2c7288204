use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Duration;

/// A simple wrapper around `reqwest::Client` used to manage HTTP requests
/// with a preconfigured base URL and default settings.
///
/// Every request issued through this client carries a JSON content type and
/// is bounded by a fixed timeout. The client never retries on its own.
#[derive(Debug)]
pub struct HTTPClient {
    /// The underlying `reqwest::Client` used to perform HTTP requests.
    client: reqwest::Client,
    /// Base URL for the API, prepended to all endpoint paths.
    base_url: String,
}

impl HTTPClient {
    /// The request timeout applied when none is configured.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Constructs a new `HTTPClient` with the given base URL and request timeout.
    ///
    /// # Arguments
    /// * `base_url` – The root URL for all HTTP requests (e.g., `"https://api.spacexdata.com"`).
    /// * `timeout` – Upper bound for a single request, including connect and body transfer.
    ///
    /// # Returns
    /// A configured `HTTPClient` instance.
    pub fn new(base_url: &str, timeout: Duration) -> HTTPClient {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .unwrap_or_else(|e| {
                log::error!("Could not build configured HTTP client: {e}, using defaults");
                reqwest::Client::new()
            });
        HTTPClient { client, base_url: base_url.trim_end_matches('/').to_string() }
    }

    /// Returns a reference to the internal `reqwest::Client`.
    pub(super) fn client(&self) -> &reqwest::Client { &self.client }
    /// Returns the base URL that the client was initialized with.
    pub fn url(&self) -> &str { self.base_url.as_str() }
}
