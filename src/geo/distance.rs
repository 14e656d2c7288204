use super::Coordinate;

/// Mean earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between `a` and `b` in kilometers, rounded to two decimals.
///
/// Uses the haversine formula. The result is symmetric in its arguments and
/// zero for identical coordinates.
pub fn calculate_distance(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat_rad().cos() * b.lat_rad().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    (EARTH_RADIUS_KM * c * 100.0).round() / 100.0
}

/// Formats a distance for display.
///
/// * below 1 km: whole meters, e.g. `"850m"`
/// * below 100 km: one decimal, e.g. `"45.7km"`
/// * otherwise: whole kilometers, e.g. `"150km"`
#[allow(clippy::cast_possible_truncation)]
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{}m", (km * 1000.0).round() as i64)
    } else if km < 100.0 {
        // ties round up, `{:.1}` alone would round them to even
        format!("{:.1}km", (km * 10.0).round() / 10.0)
    } else {
        format!("{}km", km.round() as i64)
    }
}
