use strum_macros::Display;

/// Responses whose body is decoded as JSON into the parsed response type.
pub(crate) trait JSONBodyHTTPResponseType: HTTPResponseType {
    /// Decodes the body, failures surface as [`ResponseError::Decode`].
    async fn parse_json_body(
        response: reqwest::Response,
    ) -> Result<Self::ParsedResponseType, ResponseError>
    where Self::ParsedResponseType: for<'de> serde::Deserialize<'de> {
        response.json::<Self::ParsedResponseType>().await.map_err(ResponseError::from)
    }
}

/// Marker for response types that are their own JSON body, e.g. [`Launch`] or [`LaunchPage`].
///
/// Implementing it is enough to make a type usable as `HTTPRequestType::Response`.
///
/// [`Launch`]: super::launch::Launch
/// [`LaunchPage`]: super::launch_page::LaunchPage
pub(crate) trait SerdeJSONBodyHTTPResponseType {}

impl<T> JSONBodyHTTPResponseType for T
where
    T: SerdeJSONBodyHTTPResponseType,
    for<'de> T: serde::Deserialize<'de>,
{
}

impl<T> HTTPResponseType for T
where
    T: SerdeJSONBodyHTTPResponseType,
    for<'de> T: serde::Deserialize<'de>,
{
    type ParsedResponseType = T;

    async fn read_response(
        response: reqwest::Response,
    ) -> Result<Self::ParsedResponseType, ResponseError> {
        let resp = Self::unwrap_return_code(response).await?;
        Self::parse_json_body(resp).await
    }
}

pub(crate) trait HTTPResponseType {
    type ParsedResponseType;
    async fn read_response(
        response: reqwest::Response,
    ) -> Result<Self::ParsedResponseType, ResponseError>;

    async fn unwrap_return_code(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ResponseError> {
        let status = response.status();
        log::debug!("API Response: {} {}", status.as_u16(), response.url());
        if status.is_success() {
            Ok(response)
        } else if status.is_server_error() {
            Err(ResponseError::InternalServer(status.as_u16()))
        } else if status.is_client_error() {
            Err(ResponseError::ClientError(status.as_u16()))
        } else {
            Err(ResponseError::Unknown)
        }
    }
}

/// Transport level failure of a single request.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ResponseError {
    /// The server answered with a 5xx status.
    InternalServer(u16),
    /// The server answered with a 4xx status, including 404 for unknown ids.
    ClientError(u16),
    /// The request did not complete within the client timeout.
    Timeout,
    /// No connection to the server could be established.
    NoConnection,
    /// The body could not be decoded into the expected type.
    Decode(String),
    Unknown,
}

impl std::error::Error for ResponseError {}
impl From<reqwest::Error> for ResponseError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            ResponseError::Timeout
        } else if value.is_connect() {
            ResponseError::NoConnection
        } else if value.is_decode() {
            ResponseError::Decode(value.to_string())
        } else if let Some(status) = value.status() {
            if status.is_server_error() {
                ResponseError::InternalServer(status.as_u16())
            } else {
                ResponseError::ClientError(status.as_u16())
            }
        } else {
            ResponseError::Unknown
        }
    }
}
