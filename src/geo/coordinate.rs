use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A geographic position given as latitude/longitude in degrees.
///
/// Used both for launchpad sites and for user location readings.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive towards north.
    latitude: f64,
    /// Longitude in degrees, positive towards east.
    longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self { Self { latitude, longitude } }

    pub fn latitude(&self) -> f64 { self.latitude }
    pub fn longitude(&self) -> f64 { self.longitude }

    pub fn lat_rad(&self) -> f64 { self.latitude.to_radians() }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Error returned when a `"lat,lon"` string cannot be read as a [`Coordinate`].
#[derive(Debug, Clone, PartialEq, Eq, strum_macros::Display)]
pub enum CoordinateParseError {
    MissingComponent,
    InvalidNumber,
}

impl std::error::Error for CoordinateParseError {}

impl FromStr for Coordinate {
    type Err = CoordinateParseError;

    /// Parses `"lat,lon"`, surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s.split_once(',').ok_or(CoordinateParseError::MissingComponent)?;
        let lat = lat.trim().parse::<f64>().map_err(|_| CoordinateParseError::InvalidNumber)?;
        let lon = lon.trim().parse::<f64>().map_err(|_| CoordinateParseError::InvalidNumber)?;
        if !lat.is_finite() || !lon.is_finite() {
            return Err(CoordinateParseError::InvalidNumber);
        }
        Ok(Self::new(lat, lon))
    }
}
