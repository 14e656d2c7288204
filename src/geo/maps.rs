use super::Coordinate;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Url;
use strum_macros::Display;

/// Characters escaped in label parameters: everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// What the external map application should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MapMode {
    /// Driving directions from the current position to the coordinate.
    Directions,
    /// A pin at the coordinate without routing.
    Location,
}

/// The URL scheme family used to hand a coordinate to a native map application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MapPlatform {
    /// Apple Maps (`maps.apple.com`), used on iOS.
    Apple,
    /// Google Maps app links, used on Android.
    Google,
    /// Plain Google Maps web URLs, the fallback when no app can handle the link.
    Web,
}

impl MapPlatform {
    /// Builds the URL that opens `coordinate` in this platform's map application.
    pub fn map_url(
        self,
        coordinate: Coordinate,
        label: Option<&str>,
        mode: MapMode,
    ) -> Result<Url, MapOpenError> {
        let (lat, lon) = (coordinate.latitude(), coordinate.longitude());
        let (base, label_param) = match (self, mode) {
            (MapPlatform::Apple, MapMode::Directions) => (
                format!("http://maps.apple.com/?daddr={lat},{lon}&dirflg=d&t=m"),
                label.map(|l| ("q", l)),
            ),
            (MapPlatform::Google, MapMode::Directions) => (
                format!(
                    "https://www.google.com/maps/dir/?api=1&destination={lat},{lon}&travelmode=driving"
                ),
                label.map(|l| ("destination_place_id", l)),
            ),
            (MapPlatform::Apple, MapMode::Location) => (
                String::from("http://maps.apple.com/"),
                Some(("q", label.unwrap_or("Location"))),
            ),
            (MapPlatform::Google, MapMode::Location) => (
                format!("https://www.google.com/maps/search/?api=1&query={lat},{lon}"),
                None,
            ),
            (MapPlatform::Web, MapMode::Directions) => (
                format!("https://www.google.com/maps/dir/?api=1&destination={lat},{lon}"),
                None,
            ),
            (MapPlatform::Web, MapMode::Location) => {
                (format!("https://www.google.com/maps/search/{lat},{lon}"), None)
            }
        };
        let mut url = Url::parse(&base).map_err(|e| MapOpenError::InvalidUrl(e.to_string()))?;
        let mut params: Vec<String> = url.query().map(str::to_owned).into_iter().collect();
        if let Some((key, value)) = label_param {
            params.push(format!("{key}={}", utf8_percent_encode(value, URI_COMPONENT)));
        }
        if (self, mode) == (MapPlatform::Apple, MapMode::Location) {
            // `ll` carries a literal comma
            params.push(format!("ll={lat},{lon}"));
        }
        if !params.is_empty() {
            url.set_query(Some(&params.join("&")));
        }
        Ok(url)
    }
}

/// Error returned by an [`ExternalMapOpener`] that failed to hand off a URL.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum MapOpenError {
    InvalidUrl(String),
    NoHandler,
    LaunchFailed(String),
}

impl std::error::Error for MapOpenError {}

/// Platform capability that hands URLs to the operating system.
///
/// Implementations wrap whatever the host offers for opening links; the
/// crate itself never talks to the OS.
pub trait ExternalMapOpener {
    /// The URL scheme family native to this host.
    fn platform(&self) -> MapPlatform;
    /// Whether some installed application can handle `url`.
    fn can_open(&self, url: &Url) -> bool;
    /// Hands `url` to the operating system.
    fn open(&self, url: &Url) -> Result<(), MapOpenError>;
}

/// Opens `coordinate` in the host's map application, falling back to the
/// web variant if the native URL cannot be handled.
///
/// # Returns
/// The URL that was actually opened.
pub fn open_external_map(
    opener: &dyn ExternalMapOpener,
    coordinate: Coordinate,
    label: Option<&str>,
    mode: MapMode,
) -> Result<Url, MapOpenError> {
    let native = opener.platform().map_url(coordinate, label, mode)?;
    let url = if opener.can_open(&native) {
        native
    } else {
        log::debug!("No handler for {native}, falling back to web maps");
        MapPlatform::Web.map_url(coordinate, label, mode)?
    };
    opener.open(&url)?;
    Ok(url)
}
