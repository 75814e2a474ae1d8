use super::*;
use crate::foundation::config::EngineConfig;
use crate::scene::recording::{RecordingRenderer, SceneCall};
use crate::solution::payload::SolutionDef;

fn fleet() -> Fleet {
    let def: SolutionDef = serde_json::from_value(serde_json::json!({
        "routes": [
            {
                "id": 1, "vehicle_number": 1, "deliveries": [1, 2], "cost": 10.0,
                "steps": [[0, 0], [1, 0], [1, 1]],
                "full_path": [[0.0, 0.0], [0.0, 0.01], [0.01, 0.01]]
            },
            {
                "id": 2, "vehicle_number": 2, "deliveries": [3], "cost": 5.0,
                "steps": [[0, 0], [0, 2]],
                "full_path": []
            }
        ],
        "nodes": [
            {"id": 1, "x": 1, "y": 0},
            {"id": 2, "x": 1, "y": 1},
            {"id": 3, "x": 0, "y": 2}
        ]
    }))
    .unwrap();
    Fleet::from_solution(&def, &EngineConfig::default()).unwrap()
}

fn sync(renderer: RecordingRenderer) -> SceneSynchronizer<RecordingRenderer> {
    SceneSynchronizer::new(renderer, SceneConfig::default(), &fleet())
}

fn frame(cinematic: bool) -> VehicleFrame {
    VehicleFrame {
        progress: 0.5,
        position: Some(GeoPoint::new(0.0, 0.01)),
        bearing: 90.0,
        trail: vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.01)],
        pulse: 1.0,
        cinematic,
    }
}

#[test]
fn mutations_before_ready_are_deferred_then_replayed() {
    let mut s = sync(RecordingRenderer::new());
    s.on_active_vehicle_changed(Some(0));
    s.on_frame(frame(false));
    s.pan_to(GeoPoint::new(1.0, 1.0));
    assert!(s.renderer().calls.is_empty());
    assert_eq!(s.pick_node(Point::new(0.0, 0.0)), None);

    s.on_ready();
    let r = s.renderer();
    assert_eq!(r.source_count(), SourceId::ALL.len());
    assert_eq!(r.layer_count(), LayerId::ALL.len());
    assert_eq!(r.source(SourceId::Nodes).unwrap().len(), 3);
    assert_eq!(r.source(SourceId::GhostRoutes).unwrap().len(), 2);
    assert_eq!(r.source(SourceId::ActiveRoute).unwrap().len(), 1);
    assert_eq!(r.source(SourceId::Vehicle).unwrap().len(), 1);
    assert_eq!(r.source(SourceId::ProgressTrail).unwrap().len(), 1);
    assert_eq!(r.count(|c| matches!(c, SceneCall::FitBounds(..))), 1);
    assert_eq!(r.count(|c| matches!(c, SceneCall::PanTo(..))), 0);
}

#[test]
fn on_ready_registers_once() {
    let mut s = sync(RecordingRenderer::new());
    s.on_ready();
    s.on_ready();
    assert_eq!(
        s.renderer()
            .count(|c| matches!(c, SceneCall::AddLayer(_))),
        LayerId::ALL.len()
    );
}

#[test]
fn active_vehicle_change_recolors_and_filters() {
    let mut s = sync(RecordingRenderer::new());
    s.on_ready();
    s.on_active_vehicle_changed(Some(1));
    let r = s.renderer();
    let style = SceneConfig::default();

    let active = r.layer(LayerId::ActiveRoute).unwrap();
    assert_eq!(
        active.paint.color,
        PaintColor::Gradient {
            from: style.palette[1],
            to: style.accent
        }
    );
    assert_eq!(
        r.layer(LayerId::ActiveNodes).unwrap().filter,
        LayerFilter::NodeIn(vec![NodeId(3)])
    );
    assert_eq!(
        r.layer(LayerId::GhostRoutes).unwrap().filter,
        LayerFilter::RouteIsNot(1)
    );
    assert_eq!(
        r.layer(LayerId::GhostActive).unwrap().filter,
        LayerFilter::RouteIs(1)
    );
    assert!(
        r.layer(LayerId::GhostActive).unwrap().paint.opacity
            > r.layer(LayerId::GhostRoutes).unwrap().paint.opacity
    );

    let markers = r.source(SourceId::Markers).unwrap();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].marker, Some(MarkerKind::Start));
    assert_eq!(markers[1].marker, Some(MarkerKind::End));
    assert!(r.source(SourceId::ProgressTrail).unwrap().is_empty());
}

#[test]
fn node_change_updates_source_without_new_layers() {
    let mut s = sync(RecordingRenderer::new());
    s.on_ready();
    let layers_before = s.renderer().count(|c| matches!(c, SceneCall::AddLayer(_)));
    let nodes = fleet().nodes()[..1].to_vec();
    s.on_nodes_changed(&nodes);
    let r = s.renderer();
    assert_eq!(r.source(SourceId::Nodes).unwrap().len(), 1);
    assert_eq!(
        r.count(|c| matches!(c, SceneCall::AddLayer(_))),
        layers_before
    );
}

#[test]
fn camera_follows_only_in_cinematic_mode() {
    let mut s = sync(RecordingRenderer::new());
    s.on_ready();
    s.on_active_vehicle_changed(Some(0));

    s.on_frame(frame(false));
    assert_eq!(
        s.renderer().count(|c| matches!(c, SceneCall::EaseCamera(..))),
        0
    );

    s.on_frame(frame(true));
    let cam = s.renderer().camera();
    let style = SceneConfig::default();
    assert_eq!(cam.center, GeoPoint::new(0.0, 0.01));
    assert_eq!(cam.pitch, style.cinematic_pitch);
    assert_eq!(cam.zoom, style.cinematic_zoom);
    assert_eq!(cam.bearing, 90.0);

    s.on_frame(frame(false));
    assert_eq!(s.renderer().camera().pitch, 0.0);
}

#[test]
fn radar_tracks_pulse() {
    let mut s = sync(RecordingRenderer::new());
    s.on_ready();
    s.on_active_vehicle_changed(Some(0));
    s.on_frame(VehicleFrame {
        pulse: 0.0,
        ..frame(false)
    });
    let small = s.renderer().layer(LayerId::VehicleRadar).unwrap().paint.size;
    s.on_frame(frame(false));
    let big = s.renderer().layer(LayerId::VehicleRadar).unwrap().paint.size;
    assert!(big > small);
}

#[test]
fn pick_resolves_topmost_node() {
    let mut near = Feature::point(GeoPoint::new(0.0, 0.01));
    near.node_id = Some(NodeId(2));
    let mut below = Feature::point(GeoPoint::new(0.0, 0.01));
    below.node_id = Some(NodeId(1));
    let renderer = RecordingRenderer::new().with_rendered_features(vec![
        (LayerId::ActiveNodes, near),
        (LayerId::Nodes, below),
    ]);
    let mut s = sync(renderer);
    s.on_ready();
    assert_eq!(s.pick_node(Point::new(10.0, 10.0)), Some(NodeId(2)));

    let mut empty = sync(RecordingRenderer::new());
    empty.on_ready();
    assert_eq!(empty.pick_node(Point::new(10.0, 10.0)), None);
}

#[test]
fn dispose_tears_down_and_ignores_later_calls() {
    let mut s = sync(RecordingRenderer::new());
    s.on_ready();
    s.dispose();
    assert_eq!(s.renderer().layer_count(), 0);
    assert_eq!(s.renderer().source_count(), 0);

    let calls = s.renderer().calls.len();
    s.on_active_vehicle_changed(Some(0));
    s.on_frame(frame(true));
    s.on_ready();
    assert_eq!(s.renderer().calls.len(), calls);
    assert!(s.is_disposed());
}
