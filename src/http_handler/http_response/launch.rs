use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;
use chrono::{DateTime, Utc};
use strum_macros::Display;

/// Response type for the /v5/launches/{id} endpoint.
///
/// A single scheduled or completed mission. Launches are immutable once
/// fetched and identified by their `id`.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
pub struct Launch {
    id: String,
    name: String,
    date_utc: DateTime<Utc>,
    #[serde(default)]
    date_unix: i64,
    #[serde(default)]
    date_local: String,
    #[serde(default)]
    date_precision: DatePrecision,
    upcoming: bool,
    /// `None` while the outcome is pending or unknown.
    success: Option<bool>,
    details: Option<String>,
    /// Id of the launchpad this mission starts from.
    launchpad: String,
    flight_number: u32,
    #[serde(default)]
    rocket: Option<String>,
    #[serde(default)]
    tbd: bool,
    #[serde(default)]
    net: bool,
    #[serde(default)]
    links: LaunchLinks,
}

impl SerdeJSONBodyHTTPResponseType for Launch {}

impl Launch {
    pub fn id(&self) -> &str { &self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn date_utc(&self) -> DateTime<Utc> { self.date_utc }
    pub fn date_unix(&self) -> i64 { self.date_unix }
    pub fn date_local(&self) -> &str { &self.date_local }
    pub fn date_precision(&self) -> DatePrecision { self.date_precision }
    pub fn is_upcoming(&self) -> bool { self.upcoming }
    pub fn success(&self) -> Option<bool> { self.success }
    pub fn details(&self) -> Option<&str> { self.details.as_deref() }
    pub fn launchpad_id(&self) -> &str { &self.launchpad }
    pub fn flight_number(&self) -> u32 { self.flight_number }
    pub fn rocket_id(&self) -> Option<&str> { self.rocket.as_deref() }
    pub fn is_tbd(&self) -> bool { self.tbd }
    pub fn is_net(&self) -> bool { self.net }
    pub fn links(&self) -> &LaunchLinks { &self.links }

    /// Maps the success tri-state onto a [`LaunchOutcome`].
    pub fn outcome(&self) -> LaunchOutcome {
        match self.success {
            Some(true) => LaunchOutcome::Success,
            Some(false) => LaunchOutcome::Failure,
            None => LaunchOutcome::Pending,
        }
    }

    /// Case-insensitive substring match on the mission name.
    pub fn name_contains(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(&term.to_lowercase())
    }
}

/// Result of a mission as far as it is known.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    Success,
    Failure,
    Pending,
}

/// How precise the announced launch date is.
#[derive(serde::Deserialize, serde::Serialize, Debug, Display, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DatePrecision {
    Half,
    Quarter,
    Year,
    Month,
    Day,
    #[default]
    Hour,
}

/// Media and press links attached to a launch. Every link is optional.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct LaunchLinks {
    patch: PatchLinks,
    reddit: RedditLinks,
    flickr: FlickrLinks,
    presskit: Option<String>,
    webcast: Option<String>,
    youtube_id: Option<String>,
    article: Option<String>,
    wikipedia: Option<String>,
}

impl LaunchLinks {
    pub fn patch_small(&self) -> Option<&str> { self.patch.small.as_deref() }
    pub fn patch_large(&self) -> Option<&str> { self.patch.large.as_deref() }
    pub fn reddit(&self) -> &RedditLinks { &self.reddit }
    pub fn flickr_images(&self) -> &[String] { &self.flickr.original }
    pub fn presskit(&self) -> Option<&str> { self.presskit.as_deref() }
    pub fn webcast(&self) -> Option<&str> { self.webcast.as_deref() }
    pub fn youtube_id(&self) -> Option<&str> { self.youtube_id.as_deref() }
    pub fn article(&self) -> Option<&str> { self.article.as_deref() }
    pub fn wikipedia(&self) -> Option<&str> { self.wikipedia.as_deref() }
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
struct PatchLinks {
    small: Option<String>,
    large: Option<String>,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct RedditLinks {
    campaign: Option<String>,
    launch: Option<String>,
    media: Option<String>,
    recovery: Option<String>,
}

impl RedditLinks {
    pub fn campaign(&self) -> Option<&str> { self.campaign.as_deref() }
    pub fn launch(&self) -> Option<&str> { self.launch.as_deref() }
    pub fn media(&self) -> Option<&str> { self.media.as_deref() }
    pub fn recovery(&self) -> Option<&str> { self.recovery.as_deref() }
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
struct FlickrLinks {
    small: Vec<String>,
    original: Vec<String>,
}
