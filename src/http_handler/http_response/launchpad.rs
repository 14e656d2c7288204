use crate::geo::Coordinate;
use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;
use strum_macros::Display;

/// Response type for the /v4/launchpads/{id} endpoint.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
pub struct Launchpad {
    id: String,
    name: String,
    full_name: String,
    locality: String,
    region: String,
    #[serde(default)]
    timezone: String,
    latitude: f64,
    longitude: f64,
    launch_attempts: u32,
    launch_successes: u32,
    #[serde(default)]
    rockets: Vec<String>,
    #[serde(default)]
    launches: Vec<String>,
    status: LaunchpadStatus,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    images: LaunchpadImages,
}

impl SerdeJSONBodyHTTPResponseType for Launchpad {}

impl Launchpad {
    pub fn id(&self) -> &str { &self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn full_name(&self) -> &str { &self.full_name }
    pub fn locality(&self) -> &str { &self.locality }
    pub fn region(&self) -> &str { &self.region }
    pub fn timezone(&self) -> &str { &self.timezone }
    pub fn coordinate(&self) -> Coordinate { Coordinate::new(self.latitude, self.longitude) }
    pub fn launch_attempts(&self) -> u32 { self.launch_attempts }
    pub fn launch_successes(&self) -> u32 { self.launch_successes }
    pub fn rocket_ids(&self) -> &[String] { &self.rockets }
    pub fn launch_ids(&self) -> &[String] { &self.launches }
    pub fn status(&self) -> LaunchpadStatus { self.status }
    pub fn details(&self) -> Option<&str> { self.details.as_deref() }
    pub fn images(&self) -> &[String] { &self.images.large }

    /// Share of successful launches in percent, `None` before the first attempt.
    pub fn success_rate(&self) -> Option<f64> {
        (self.launch_attempts > 0)
            .then(|| f64::from(self.launch_successes) / f64::from(self.launch_attempts) * 100.0)
    }
}

/// Operational status of a launchpad.
#[derive(serde::Deserialize, serde::Serialize, Debug, Display, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LaunchpadStatus {
    Active,
    Inactive,
    Unknown,
    Retired,
    Lost,
    #[serde(rename = "under construction")]
    #[strum(serialize = "under construction")]
    UnderConstruction,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
struct LaunchpadImages {
    large: Vec<String>,
}
