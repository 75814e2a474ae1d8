use super::*;

#[test]
fn origin_maps_to_base() {
    let p = CoordinateProjector::new(10.0, 20.0, 0.5);
    assert_eq!(p.project(0.0, 0.0), GeoPoint::new(10.0, 20.0));
}

#[test]
fn x_drives_longitude_and_y_drives_latitude() {
    let p = CoordinateProjector::new(10.0, 20.0, 0.5);
    assert_eq!(p.project(2.0, 0.0), GeoPoint::new(10.0, 21.0));
    assert_eq!(p.project(0.0, -4.0), GeoPoint::new(8.0, 20.0));
}

#[test]
fn projection_is_deterministic() {
    let p = CoordinateProjector::default();
    for &(x, y) in &[(0.0, 0.0), (1.25, -3.5), (1e6, -1e6), (-0.001, 42.0)] {
        let a = p.project(x, y);
        let b = p.project(x, y);
        assert_eq!(a, b);
        assert_eq!(p.project_point(GridPoint::new(x, y)), a);
    }
}

#[test]
fn project_path_preserves_order() {
    let p = CoordinateProjector::new(0.0, 0.0, 1.0);
    let out = p.project_path(&[GridPoint::new(1.0, 2.0), GridPoint::new(3.0, 4.0)]);
    assert_eq!(out, vec![GeoPoint::new(2.0, 1.0), GeoPoint::new(4.0, 3.0)]);
}
