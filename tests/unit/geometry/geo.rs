use super::*;

fn close(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

#[test]
fn one_degree_of_latitude_is_about_111_km() {
    let d = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0));
    assert!(close(d, 111.195, 0.01), "{d}");
}

#[test]
fn coincident_points_have_zero_distance() {
    let p = GeoPoint::new(12.97, 77.59);
    assert_eq!(haversine_km(p, p), 0.0);
}

#[test]
fn cardinal_bearings() {
    let o = GeoPoint::new(0.0, 0.0);
    assert!(close(initial_bearing_deg(o, GeoPoint::new(1.0, 0.0)), 0.0, 1e-9));
    assert!(close(initial_bearing_deg(o, GeoPoint::new(0.0, 1.0)), 90.0, 1e-9));
    assert!(close(initial_bearing_deg(o, GeoPoint::new(-1.0, 0.0)), 180.0, 1e-9));
    assert!(close(initial_bearing_deg(o, GeoPoint::new(0.0, -1.0)), 270.0, 1e-9));
}

#[test]
fn bearing_wraps_into_range() {
    assert_eq!(normalize_bearing(-90.0), 270.0);
    assert_eq!(normalize_bearing(720.0), 0.0);
    assert!(normalize_bearing(-1e-15) < 360.0);
}

#[test]
fn short_or_broken_paths_default_to_zero() {
    assert_eq!(path_length_km(&[]), 0.0);
    assert_eq!(path_length_km(&[GeoPoint::new(1.0, 1.0)]), 0.0);
    assert_eq!(
        path_length_km(&[GeoPoint::new(f64::NAN, 0.0), GeoPoint::new(1.0, 1.0)]),
        0.0
    );
}

#[test]
fn cumulative_lengths_end_at_total() {
    let pts = [
        GeoPoint::new(0.0, 0.0),
        GeoPoint::new(0.0, 1.0),
        GeoPoint::new(1.0, 1.0),
    ];
    let cum = cumulative_lengths_km(&pts);
    assert_eq!(cum.len(), 3);
    assert_eq!(cum[0], 0.0);
    assert!(close(cum[2], path_length_km(&pts), 1e-9));
}
