use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};
use crate::http_handler::http_response::launchpad::Launchpad;

/// Request type for the /v4/launchpads/{id} endpoint.
#[derive(Debug)]
pub(crate) struct LaunchpadRequest<'a> {
    pub(crate) id: &'a str,
}

impl NoBodyHTTPRequestType for LaunchpadRequest<'_> {}

impl HTTPRequestType for LaunchpadRequest<'_> {
    type Response = Launchpad;
    fn endpoint(&self) -> String { format!("/v4/launchpads/{}", self.id) }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}
