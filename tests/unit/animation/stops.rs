use super::*;
use crate::foundation::config::EngineConfig;
use crate::foundation::core::GridPoint;
use crate::solution::payload::{NodeDef, RouteDef, SolutionDef};

fn fleet(deliveries: &[u64]) -> Fleet {
    let mut cfg = EngineConfig::default();
    cfg.projection.base_lat = 0.0;
    cfg.projection.base_lng = 0.0;
    cfg.projection.scale = 0.01;

    // Stops at grid x = 0, 1, 2, 1 (a return trip), on a straight east-west line.
    let nodes = [(1, 0.0), (2, 1.0), (3, 2.0)]
        .into_iter()
        .map(|(id, x)| NodeDef {
            id: NodeId(id),
            x,
            y: 0.0,
        })
        .collect();
    let steps = [0.0, 1.0, 2.0, 1.0, 0.0]
        .into_iter()
        .map(|x| GridPoint::new(x, 0.0))
        .collect();
    let def = SolutionDef {
        routes: vec![RouteDef {
            id: None,
            vehicle_number: 1,
            deliveries: deliveries.iter().map(|&d| NodeId(d)).collect(),
            steps,
            full_path: vec![],
            cost: 1.0,
        }],
        nodes,
    };
    Fleet::from_solution(&def, &cfg).unwrap()
}

#[test]
fn fractions_follow_visiting_order() {
    let fleet = fleet(&[2, 3, 1]);
    let track = StopTrack::build(&fleet.routes()[0], &fleet);
    let s = track.statuses(0.0);
    assert_eq!(s.len(), 3);
    assert_eq!(s[0].order, 1);
    assert!((s[0].path_fraction.unwrap() - 0.25).abs() < 1e-6);
    assert!((s[1].path_fraction.unwrap() - 0.5).abs() < 1e-6);
    // Node 1 sits at the origin, which the return leg reaches at the very end.
    assert!((s[2].path_fraction.unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn reached_flags_track_progress() {
    let fleet = fleet(&[2, 3, 1]);
    let track = StopTrack::build(&fleet.routes()[0], &fleet);
    let s = track.statuses(0.6);
    assert!(s[0].reached);
    assert!(s[1].reached);
    assert!(!s[2].reached);
    assert_eq!(track.next_stop(0.6).unwrap().node_id, NodeId(1));
    assert!(track.next_stop(1.0).is_none());
}

#[test]
fn unknown_nodes_keep_their_slot() {
    let fleet = fleet(&[2, 99]);
    let track = StopTrack::build(&fleet.routes()[0], &fleet);
    assert_eq!(track.len(), 2);
    let s = track.statuses(1.0);
    assert!(s[1].position.is_none());
    assert!(s[1].path_fraction.is_none());
    assert!(!s[1].reached);
}
