use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};
use crate::http_handler::http_response::launch::Launch;

/// Request type for the /v5/launches/{id} endpoint.
#[derive(Debug)]
pub(crate) struct LaunchRequest<'a> {
    pub(crate) id: &'a str,
}

impl NoBodyHTTPRequestType for LaunchRequest<'_> {}

impl HTTPRequestType for LaunchRequest<'_> {
    type Response = Launch;
    fn endpoint(&self) -> String { format!("/v5/launches/{}", self.id) }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}
