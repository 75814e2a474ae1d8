use super::*;

fn rm(id: &str, cost: f64, distance_km: f64, stops: usize) -> RouteMetrics {
    RouteMetrics {
        route_id: id.to_string(),
        vehicle_number: 1,
        color: Rgba8::rgb(0, 0, 0),
        cost,
        distance_km,
        stops,
    }
}

#[test]
fn quality_boundaries_belong_to_the_higher_tier() {
    assert_eq!(classify_quality(79.0, Some(100.0)), Quality::Efficient);
    assert_eq!(classify_quality(80.0, Some(100.0)), Quality::Balanced);
    assert_eq!(classify_quality(119.0, Some(100.0)), Quality::Balanced);
    assert_eq!(classify_quality(120.0, Some(100.0)), Quality::Heavy);
}

#[test]
fn quality_without_usable_average_is_neutral() {
    assert_eq!(classify_quality(50.0, Some(0.0)), Quality::Neutral);
    assert_eq!(classify_quality(50.0, None), Quality::Neutral);
    assert_eq!(classify_quality(50.0, Some(f64::NAN)), Quality::Neutral);
    assert_eq!(Quality::Neutral.label(), "—");
    assert_eq!(Quality::Heavy.to_string(), "Heavy");
}

#[test]
fn fleet_aggregates_and_first_wins_ties() {
    let m = FleetMetrics::from_route_metrics(vec![
        rm("a", 10.0, 5.0, 2),
        rm("b", 10.0, 7.0, 4),
        rm("c", 30.0, 7.0, 3),
    ]);
    assert_eq!(m.total_cost, 50.0);
    assert!((m.avg_cost - 50.0 / 3.0).abs() < 1e-12);
    assert_eq!(m.avg_stops, 3.0);
    assert_eq!(m.total_distance_km, 19.0);
    assert_eq!(m.best.as_ref().unwrap().route_id, "a");
    assert_eq!(m.worst.as_ref().unwrap().route_id, "c");
    assert_eq!(m.longest.as_ref().unwrap().route_id, "b");
}

#[test]
fn empty_fleet_has_zero_aggregates() {
    let m = FleetMetrics::from_route_metrics(vec![]);
    assert_eq!(m.total_cost, 0.0);
    assert_eq!(m.avg_cost, 0.0);
    assert_eq!(m.avg_stops, 0.0);
    assert!(m.best.is_none() && m.worst.is_none() && m.longest.is_none());
    assert_eq!(
        m.quality_of(&rm("x", 5.0, 0.0, 0), &MetricsConfig::default()),
        Quality::Neutral
    );
}

#[test]
fn eta_scales_remaining_distance() {
    let e = Eta::at(10.0, 0.25, 2.0);
    assert!((e.remaining_km - 7.5).abs() < 1e-12);
    assert!((e.eta_minutes.unwrap() - 15.0).abs() < 1e-12);

    let done = Eta::at(10.0, 1.0, 2.0);
    assert_eq!(done.remaining_km, 0.0);
    assert!(done.eta_minutes.is_none());
}

#[test]
fn route_metrics_measure_the_projected_path() {
    use crate::foundation::core::GeoPoint;
    use crate::geometry::projector::CoordinateProjector;
    use crate::solution::fleet::VehicleRoute;
    use crate::solution::payload::NodeId;

    let route = VehicleRoute {
        id: "r1".into(),
        vehicle_number: 4,
        deliveries: vec![NodeId(1), NodeId(2)],
        steps: vec![],
        full_path: vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)],
        cost: 12.5,
    };
    let pr = ProjectedRoute::project(route, 0, &CoordinateProjector::default(), &[]);
    let m = compute_route_metrics(&pr);
    assert_eq!(m.stops, 2);
    assert_eq!(m.vehicle_number, 4);
    // One degree of longitude on the equator.
    assert!((m.distance_km - 111.195).abs() < 0.01);
}
