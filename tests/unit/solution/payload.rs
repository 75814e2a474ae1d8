use super::*;
use serde_json::json;

#[test]
fn parses_solver_shape() {
    let def: SolutionDef = serde_json::from_value(json!({
        "routes": [{
            "id": 7,
            "vehicle_number": 1,
            "deliveries": [3, 4],
            "steps": [{"x": 0, "y": 0}, {"x": 1, "y": 2}],
            "full_path": [{"lat": 12.0, "lng": 77.0}, {"lat": 12.1, "lng": 77.1}],
            "cost": 42.5
        }],
        "nodes": [{"id": 3, "x": 1, "y": 2}, {"id": 4, "x": 0, "y": 0}]
    }))
    .unwrap();

    assert_eq!(def.routes.len(), 1);
    let r = &def.routes[0];
    assert_eq!(r.id, Some(RouteIdDef::Int(7)));
    assert_eq!(r.deliveries, vec![NodeId(3), NodeId(4)]);
    assert_eq!(r.steps[1], GridPoint::new(1.0, 2.0));
    assert_eq!(r.full_path[1], GeoPoint::new(12.1, 77.1));
    assert_eq!(r.cost, 42.5);
    assert_eq!(def.nodes.len(), 2);
}

#[test]
fn accepts_camel_case_and_array_points() {
    let def: SolutionDef = serde_json::from_value(json!({
        "routes": [{
            "id": "r-1",
            "vehicleNumber": 2,
            "steps": [[0, 0], [3, 4]],
            "fullPath": [[1.0, 2.0], [3.0, 4.0]]
        }]
    }))
    .unwrap();

    let r = &def.routes[0];
    assert_eq!(r.id.clone().unwrap().into_string(), "r-1");
    assert_eq!(r.vehicle_number, 2);
    assert_eq!(r.cost, 0.0);
    assert!(r.deliveries.is_empty());
    assert_eq!(r.full_path[0], GeoPoint::new(1.0, 2.0));
    assert!(def.nodes.is_empty());
}

#[test]
fn empty_payload_is_valid() {
    let def = SolutionDef::from_json_str("{}").unwrap();
    assert!(def.routes.is_empty());
    assert!(def.nodes.is_empty());
}

#[test]
fn malformed_payload_is_a_serde_error() {
    let err = SolutionDef::from_json_str(r#"{"routes": [{"steps": []}]}"#).unwrap_err();
    assert!(matches!(err, RouteplayError::Serde(_)));
}
