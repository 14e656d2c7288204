use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};
use crate::http_handler::http_response::launch_list::LaunchList;

/// Request type for the unfiltered /v5/launches endpoint.
#[derive(Debug)]
pub(crate) struct AllLaunchesRequest {}

impl NoBodyHTTPRequestType for AllLaunchesRequest {}

impl HTTPRequestType for AllLaunchesRequest {
    type Response = LaunchList;
    fn endpoint(&self) -> String { String::from("/v5/launches") }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}
