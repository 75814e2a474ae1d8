//! Great-circle helpers over geographic point sequences.

use crate::foundation::core::GeoPoint;

/// Mean earth radius (IUGG) in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    // Rounding can push h marginally outside [0, 1] for antipodal or coincident points.
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Initial great-circle bearing from `a` to `b`, degrees clockwise from north in `[0, 360)`.
pub fn initial_bearing_deg(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let y = dlng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();
    normalize_bearing(y.atan2(x).to_degrees())
}

/// Wrap any angle in degrees into `[0, 360)`.
pub fn normalize_bearing(deg: f64) -> f64 {
    let b = deg.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs.
    if b >= 360.0 { 0.0 } else { b }
}

/// Total great-circle length of a polyline.
///
/// Fewer than two points, or any non-finite segment, yields 0 instead of an error.
pub fn path_length_km(points: &[GeoPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let total: f64 = points.windows(2).map(|w| haversine_km(w[0], w[1])).sum();
    if total.is_finite() {
        total
    } else {
        tracing::warn!("non-finite path length; defaulting to 0");
        0.0
    }
}

/// Running length at each vertex; `out[0] == 0` and `out.len() == points.len()`.
///
/// Non-finite segment lengths contribute 0.
pub fn cumulative_lengths_km(points: &[GeoPoint]) -> Vec<f64> {
    let mut out = Vec::with_capacity(points.len());
    let mut acc = 0.0;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            let d = haversine_km(points[i - 1], *p);
            if d.is_finite() {
                acc += d;
            }
        }
        out.push(acc);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/geo.rs"]
mod tests;
