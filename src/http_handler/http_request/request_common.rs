use crate::http_handler::http_client::HTTPClient;
use crate::http_handler::http_response::response_common::{HTTPResponseType, ResponseError};
use strum_macros::Display;

/// HTTP methods used by the launch endpoints.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "UPPERCASE")]
pub(crate) enum HTTPRequestMethod {
    Get,
    Post,
}

impl From<HTTPRequestMethod> for reqwest::Method {
    fn from(value: HTTPRequestMethod) -> Self {
        match value {
            HTTPRequestMethod::Get => reqwest::Method::GET,
            HTTPRequestMethod::Post => reqwest::Method::POST,
        }
    }
}

type Parsed<T> = <<T as HTTPRequestType>::Response as HTTPResponseType>::ParsedResponseType;

pub(crate) trait HTTPRequestType {
    /// Type of the expected response.
    type Response: HTTPResponseType;
    /// Path of the endpoint relative to the client base URL.
    fn endpoint(&self) -> String;
    /// The corresponding HTTP Request Method.
    fn request_method(&self) -> HTTPRequestMethod;
    fn header_params(&self) -> reqwest::header::HeaderMap { reqwest::header::HeaderMap::new() }
    fn get_request_url(&self, client: &HTTPClient) -> String {
        format!("{}{}", client.url(), self.endpoint())
    }
}

pub(crate) trait NoBodyHTTPRequestType: HTTPRequestType {
    async fn send_request(&self, client: &HTTPClient) -> Result<Parsed<Self>, ResponseError>
    where Self: Sized {
        let url = self.get_request_url(client);
        log::debug!("API Request: {} {url}", self.request_method());
        let response = client
            .client()
            .request(self.request_method().into(), &url)
            .headers(self.header_params())
            .send()
            .await?;
        <Self::Response as HTTPResponseType>::read_response(response).await
    }
}

pub(crate) trait JSONBodyHTTPRequestType: HTTPRequestType {
    /// The type of the json body.
    type Body: serde::Serialize;
    /// Returns the serializable object.
    fn body(&self) -> &Self::Body;

    async fn send_request(&self, client: &HTTPClient) -> Result<Parsed<Self>, ResponseError>
    where Self: Sized {
        let url = self.get_request_url(client);
        log::debug!("API Request: {} {url}", self.request_method());
        let response = client
            .client()
            .request(self.request_method().into(), &url)
            .headers(self.header_params())
            .json(self.body())
            .send()
            .await?;
        <Self::Response as HTTPResponseType>::read_response(response).await
    }
}
