use super::{launch::Launch, launchpad::Launchpad};
use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Response type for the unfiltered /v5/launches endpoint.
#[derive(serde::Deserialize, Debug, Clone)]
#[serde(transparent)]
pub struct LaunchList(Vec<Launch>);

impl SerdeJSONBodyHTTPResponseType for LaunchList {}

impl From<LaunchList> for Vec<Launch> {
    fn from(value: LaunchList) -> Self { value.0 }
}

/// Response type for the /v4/launchpads endpoint.
#[derive(serde::Deserialize, Debug, Clone)]
#[serde(transparent)]
pub struct LaunchpadList(Vec<Launchpad>);

impl SerdeJSONBodyHTTPResponseType for LaunchpadList {}

impl From<LaunchpadList> for Vec<Launchpad> {
    fn from(value: LaunchpadList) -> Self { value.0 }
}
