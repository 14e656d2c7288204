use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};
use crate::http_handler::http_response::launch_list::LaunchpadList;

/// Request type for the /v4/launchpads endpoint.
#[derive(Debug)]
pub(crate) struct AllLaunchpadsRequest {}

impl NoBodyHTTPRequestType for AllLaunchpadsRequest {}

impl HTTPRequestType for AllLaunchpadsRequest {
    type Response = LaunchpadList;
    fn endpoint(&self) -> String { String::from("/v4/launchpads") }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}
