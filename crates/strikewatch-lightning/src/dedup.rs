use std::collections::HashSet;

use crate::scan::StationResult;
use crate::types::StrikePoint;

/// Key two strikes share when they describe the same event: coordinates at
/// four decimal places plus the provider timestamp.
///
/// Coordinates are scaled to integers so values rounding to zero from either
/// side share a key.
fn dedup_key(point: &StrikePoint) -> (i64, i64, &str) {
    (
        ten_thousandths(point.lat),
        ten_thousandths(point.lon),
        point.date_time.as_str(),
    )
}

#[allow(clippy::cast_possible_truncation)]
fn ten_thousandths(degrees: f64) -> i64 {
    (degrees * 1e4).round() as i64
}

/// Merge every station's strikes into one list, keeping the first occurrence
/// of each event. Order follows `results`, then each station's strike order.
pub fn dedup_points<'a, I>(results: I) -> Vec<StrikePoint>
where
    I: IntoIterator<Item = &'a StationResult>,
{
    let mut seen = HashSet::new();
    let mut points = Vec::new();

    for result in results {
        for strike in &result.strikes {
            if seen.insert(dedup_key(strike)) {
                points.push(strike.clone());
            }
        }
    }

    points
}
