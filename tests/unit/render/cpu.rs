use super::*;

fn renderer(w: u32, h: u32) -> CpuMapRenderer {
    let mut r = CpuMapRenderer::new(CpuRenderOpts {
        width: w,
        height: h,
        ..CpuRenderOpts::default()
    });
    r.ease_camera(
        CameraTarget {
            center: Some(GeoPoint::new(12.97, 77.59)),
            zoom: Some(14.0),
            ..CameraTarget::default()
        },
        0.0,
    );
    r
}

fn dot_layer(color: Rgba8) -> LayerSpec {
    LayerSpec {
        id: LayerId::Vehicle,
        source: SourceId::Vehicle,
        kind: LayerKind::Circle,
        paint: LayerPaint {
            color: PaintColor::Solid(color),
            size: 10.0,
            opacity: 1.0,
        },
        filter: LayerFilter::All,
    }
}

#[test]
fn camera_center_projects_to_screen_center() {
    let r = renderer(200, 100);
    let p = r.project(GeoPoint::new(12.97, 77.59));
    assert!((p.x - 100.0).abs() < 1e-9);
    assert!((p.y - 50.0).abs() < 1e-9);

    // North is up, east is right.
    let north = r.project(GeoPoint::new(12.98, 77.59));
    let east = r.project(GeoPoint::new(12.97, 77.60));
    assert!(north.y < 50.0);
    assert!(east.x > 100.0);
}

#[test]
fn bearing_rotates_east_to_the_top() {
    let mut r = renderer(200, 200);
    r.ease_camera(
        CameraTarget {
            bearing: Some(90.0),
            ..CameraTarget::default()
        },
        0.0,
    );
    let east = r.project(GeoPoint::new(12.97, 77.60));
    assert!((east.x - 100.0).abs() < 1e-6);
    assert!(east.y < 100.0);
}

#[test]
fn fit_bounds_keeps_corners_inside_padding() {
    let mut r = renderer(400, 300);
    let bounds = GeoBounds {
        min: GeoPoint::new(12.90, 77.50),
        max: GeoPoint::new(13.00, 77.70),
    };
    r.fit_bounds(bounds, 20.0, 0.0);
    for p in [bounds.min, bounds.max] {
        let s = r.project(p);
        assert!((19.0..=381.0).contains(&s.x), "{s:?}");
        assert!((19.0..=281.0).contains(&s.y), "{s:?}");
    }
}

#[test]
fn camera_transitions_ease_over_time() {
    let mut r = renderer(100, 100);
    r.advance(1_000.0);
    r.ease_camera(
        CameraTarget {
            zoom: Some(16.0),
            ..CameraTarget::default()
        },
        500.0,
    );
    assert!(r.is_animating());
    assert_eq!(r.camera().zoom, 14.0);

    r.advance(1_250.0);
    let mid = r.camera().zoom;
    assert!(mid > 14.0 && mid < 16.0);

    r.advance(1_500.0);
    assert_eq!(r.camera().zoom, 16.0);
    assert!(!r.is_animating());
}

#[test]
fn render_draws_layers_over_background() {
    let mut r = renderer(64, 64);
    r.add_source(
        SourceId::Vehicle,
        vec![Feature::point(GeoPoint::new(12.97, 77.59))],
    );
    r.add_layer(dot_layer(Rgba8::rgb(255, 0, 0)));

    let frame = r.render().unwrap();
    assert_eq!(frame.data.len(), 64 * 64 * 4);
    assert!(frame.premultiplied);

    let px = |x: usize, y: usize| {
        let i = (y * 64 + x) * 4;
        [frame.data[i], frame.data[i + 1], frame.data[i + 2], frame.data[i + 3]]
    };
    assert_eq!(px(0, 0), [18, 20, 28, 255]);
    let c = px(32, 32);
    assert!(c[0] > 200 && c[1] < 40 && c[2] < 40, "{c:?}");
}

#[test]
fn straight_rgba_unpremultiplies_translucent_pixels() {
    let frame = FrameRGBA {
        width: 3,
        height: 1,
        data: vec![64, 32, 0, 128, 9, 9, 9, 0, 18, 20, 28, 255],
        premultiplied: true,
    };
    assert_eq!(
        frame.to_straight_rgba8(),
        vec![128, 64, 0, 128, 0, 0, 0, 0, 18, 20, 28, 255]
    );

    let straight = FrameRGBA {
        premultiplied: false,
        ..frame.clone()
    };
    assert_eq!(straight.to_straight_rgba8(), frame.data);
}

#[test]
fn oversized_surface_is_rejected() {
    let r = CpuMapRenderer::new(CpuRenderOpts {
        width: 70_000,
        height: 10,
        ..CpuRenderOpts::default()
    });
    assert!(r.render().is_err());
}

#[test]
fn pick_hits_circle_features_near_the_pointer() {
    let mut r = renderer(200, 200);
    let mut f = Feature::point(GeoPoint::new(12.97, 77.59));
    f.node_id = Some(crate::solution::payload::NodeId(7));
    r.add_source(SourceId::Nodes, vec![f]);
    r.add_layer(LayerSpec {
        id: LayerId::Nodes,
        source: SourceId::Nodes,
        ..dot_layer(Rgba8::rgb(0, 255, 0))
    });

    let hit = r.query_rendered_features(Point::new(104.0, 100.0), &[LayerId::Nodes]);
    assert_eq!(hit.len(), 1);
    assert!(
        r.query_rendered_features(Point::new(150.0, 150.0), &[LayerId::Nodes])
            .is_empty()
    );
    assert!(
        r.query_rendered_features(Point::new(100.0, 100.0), &[LayerId::Vehicle])
            .is_empty()
    );
}
