use crate::types::StrikePoint;

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two WGS84 points.
#[must_use]
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Distance from `(lat, lon)` to the closest strike, or `None` when there are
/// no strikes or no finite distance.
#[must_use]
pub fn nearest_km(lat: f64, lon: f64, strikes: &[StrikePoint]) -> Option<f64> {
    let min = strikes
        .iter()
        .map(|s| haversine_km(lat, lon, s.lat, s.lon))
        .fold(f64::INFINITY, f64::min);
    min.is_finite().then_some(min)
}
