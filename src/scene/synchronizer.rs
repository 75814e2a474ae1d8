use crate::foundation::config::SceneConfig;
use crate::foundation::core::{GeoPoint, Point, Rgba8};
use crate::scene::renderer::{
    CameraTarget, Feature, FeatureCollection, LayerFilter, LayerId, LayerKind, LayerPaint,
    LayerSpec, MapRenderer, MarkerKind, PaintColor, SourceId,
};
use crate::solution::fleet::{DeliveryNode, Fleet, ProjectedRoute};
use crate::solution::payload::NodeId;

/// Per-frame vehicle state derived before the scene is touched.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleFrame {
    /// Progress the frame was derived from.
    pub progress: f64,
    /// Interpolated vehicle position (`None` without a route).
    pub position: Option<GeoPoint>,
    /// Vehicle heading in degrees.
    pub bearing: f64,
    /// Traveled geometry.
    pub trail: Vec<GeoPoint>,
    /// Glow oscillator sample in `[0, 1]`.
    pub pulse: f64,
    /// Follow the vehicle with the camera.
    pub cinematic: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Pending,
    Ready,
    Disposed,
}

/// Sole owner of the map renderer.
///
/// Every entry point records the desired state and pushes it into the renderer only once the scene
/// is ready; `on_ready` replays whatever arrived earlier. After `dispose` all calls are ignored.
pub struct SceneSynchronizer<R: MapRenderer> {
    renderer: R,
    style: SceneConfig,
    lifecycle: Lifecycle,

    nodes: Vec<DeliveryNode>,
    routes: Vec<ProjectedRoute>,
    active: Option<usize>,
    frame: Option<VehicleFrame>,
    selected: Option<NodeId>,
    hovered: Option<NodeId>,
    following: bool,
}

impl<R: MapRenderer> SceneSynchronizer<R> {
    /// Wrap `renderer`. Nothing is registered until [`Self::on_ready`].
    pub fn new(renderer: R, style: SceneConfig, fleet: &Fleet) -> Self {
        Self {
            renderer,
            style,
            lifecycle: Lifecycle::Pending,
            nodes: fleet.nodes().to_vec(),
            routes: fleet.routes().to_vec(),
            active: None,
            frame: None,
            selected: None,
            hovered: None,
            following: false,
        }
    }

    /// Whether the scene accepts mutations.
    pub fn is_ready(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    /// Whether the scene was torn down.
    pub fn is_disposed(&self) -> bool {
        self.lifecycle == Lifecycle::Disposed
    }

    /// Read-only view of the renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Register sources and layers, then replay the latest desired state. Runs once.
    #[tracing::instrument(skip_all, fields(nodes = self.nodes.len(), routes = self.routes.len()))]
    pub fn on_ready(&mut self) {
        if self.lifecycle != Lifecycle::Pending {
            return;
        }

        for id in SourceId::ALL {
            self.renderer.add_source(id, FeatureCollection::new());
        }
        for spec in self.layer_specs() {
            self.renderer.add_layer(spec);
        }
        self.lifecycle = Lifecycle::Ready;

        self.push_nodes();
        self.renderer
            .set_source_data(SourceId::GhostRoutes, ghost_features(&self.routes));
        self.push_active();
        self.push_selection();
        if self.frame.is_some() {
            self.push_frame();
        }
        tracing::debug!("scene ready");
    }

    /// New node list; only the nodes source is updated.
    pub fn on_nodes_changed(&mut self, nodes: &[DeliveryNode]) {
        if self.is_disposed() {
            return;
        }
        self.nodes = nodes.to_vec();
        if self.is_ready() {
            self.push_nodes();
        }
    }

    /// Active vehicle switched (`None` for an empty fleet).
    pub fn on_active_vehicle_changed(&mut self, index: Option<usize>) {
        if self.is_disposed() {
            return;
        }
        self.active = index;
        self.frame = None;
        if self.is_ready() {
            self.push_active();
        }
    }

    /// Per-frame vehicle update (playing or scrubbing).
    pub fn on_frame(&mut self, frame: VehicleFrame) {
        if self.is_disposed() {
            return;
        }
        self.frame = Some(frame);
        if self.is_ready() {
            self.push_frame();
        }
    }

    /// Selected or hovered node changed.
    pub fn on_selection_changed(&mut self, selected: Option<NodeId>, hovered: Option<NodeId>) {
        if self.is_disposed() {
            return;
        }
        self.selected = selected;
        self.hovered = hovered;
        if self.is_ready() {
            self.push_selection();
        }
    }

    /// Pan the camera (no re-fit). Dropped while not ready.
    pub fn pan_to(&mut self, center: GeoPoint) {
        if self.is_ready() {
            self.renderer.pan_to(center, self.style.pan_duration_ms);
        }
    }

    /// Topmost node drawn at a screen point.
    pub fn pick_node(&self, point: Point) -> Option<NodeId> {
        if !self.is_ready() {
            return None;
        }
        self.renderer
            .query_rendered_features(point, &LayerId::NODE_LAYERS)
            .into_iter()
            .find_map(|f| f.node_id)
    }

    /// Let the renderer advance camera transitions.
    pub fn advance(&mut self, now_ms: f64) {
        if self.is_ready() {
            self.renderer.advance(now_ms);
        }
    }

    /// Remove every layer and source. Later calls are no-ops.
    pub fn dispose(&mut self) {
        if self.lifecycle == Lifecycle::Ready {
            for id in LayerId::ALL.into_iter().rev() {
                self.renderer.remove_layer(id);
            }
            for id in SourceId::ALL {
                self.renderer.remove_source(id);
            }
        }
        self.lifecycle = Lifecycle::Disposed;
        tracing::debug!("scene disposed");
    }

    fn active_route(&self) -> Option<&ProjectedRoute> {
        self.active.and_then(|i| self.routes.get(i))
    }

    fn active_color(&self) -> Rgba8 {
        self.active_route()
            .map(|r| r.color)
            .unwrap_or(self.style.accent)
    }

    fn push_nodes(&mut self) {
        let features = self
            .nodes
            .iter()
            .map(|n| Feature {
                node_id: Some(n.id),
                ..Feature::point(n.position)
            })
            .collect();
        self.renderer.set_source_data(SourceId::Nodes, features);
    }

    fn push_active(&mut self) {
        let color = self.active_color();
        let accent = self.style.accent;
        let route = self.active_route().cloned();

        let (ghost_filter, ghost_active_filter) = match self.active {
            Some(i) => (LayerFilter::RouteIsNot(i), LayerFilter::RouteIs(i)),
            None => (LayerFilter::All, LayerFilter::None),
        };
        self.renderer
            .set_layer_filter(LayerId::GhostRoutes, ghost_filter);
        self.renderer
            .set_layer_filter(LayerId::GhostActive, ghost_active_filter);

        let (line, markers, deliveries) = match &route {
            Some(r) if r.has_route() => (
                vec![Feature {
                    route_index: Some(r.index),
                    ..Feature::line(r.path.clone())
                }],
                marker_features(r, accent),
                r.route.deliveries.clone(),
            ),
            Some(r) => (vec![], vec![], r.route.deliveries.clone()),
            None => (vec![], vec![], vec![]),
        };
        self.renderer.set_source_data(SourceId::ActiveRoute, line);
        self.renderer
            .set_source_data(SourceId::ProgressTrail, FeatureCollection::new());
        self.renderer.set_source_data(SourceId::Markers, markers);
        self.renderer
            .set_source_data(SourceId::Vehicle, FeatureCollection::new());

        self.renderer.set_layer_paint(
            LayerId::ActiveRoute,
            LayerPaint {
                color: PaintColor::Gradient { from: color, to: accent },
                size: 4.0,
                opacity: 1.0,
            },
        );
        self.renderer.set_layer_paint(
            LayerId::ActiveNodes,
            LayerPaint {
                color: PaintColor::Solid(color),
                size: 6.0,
                opacity: 1.0,
            },
        );
        self.renderer
            .set_layer_filter(LayerId::ActiveNodes, LayerFilter::NodeIn(deliveries));

        if let Some(bounds) = route.as_ref().and_then(|r| r.bounds()) {
            self.renderer.fit_bounds(
                bounds,
                self.style.fit_padding_px,
                self.style.fit_duration_ms,
            );
        }
    }

    fn push_frame(&mut self) {
        let Some(frame) = self.frame.clone() else {
            return;
        };

        let vehicle = frame
            .position
            .map(|p| {
                vec![Feature {
                    bearing: Some(frame.bearing),
                    route_index: self.active,
                    ..Feature::point(p)
                }]
            })
            .unwrap_or_default();
        self.renderer.set_source_data(SourceId::Vehicle, vehicle);

        let trail = if frame.trail.len() >= 2 {
            vec![Feature {
                route_index: self.active,
                ..Feature::line(frame.trail.clone())
            }]
        } else {
            vec![]
        };
        self.renderer.set_source_data(SourceId::ProgressTrail, trail);
        let radar = self.radar_paint(frame.pulse);
        self.renderer.set_layer_paint(LayerId::VehicleRadar, radar);

        match (frame.cinematic, frame.position) {
            (true, Some(p)) => {
                self.renderer.ease_camera(
                    CameraTarget {
                        center: Some(p),
                        zoom: Some(self.style.cinematic_zoom),
                        bearing: Some(frame.bearing + self.style.cinematic_bearing_offset),
                        pitch: Some(self.style.cinematic_pitch),
                    },
                    self.style.follow_duration_ms,
                );
                self.following = true;
            }
            (false, _) if self.following => {
                self.renderer.ease_camera(
                    CameraTarget {
                        bearing: Some(0.0),
                        pitch: Some(0.0),
                        ..CameraTarget::default()
                    },
                    self.style.follow_duration_ms,
                );
                self.following = false;
            }
            _ => {}
        }
    }

    fn push_selection(&mut self) {
        let ids: Vec<NodeId> = self.selected.into_iter().chain(self.hovered).collect();
        self.renderer
            .set_layer_filter(LayerId::NodeHighlight, LayerFilter::NodeIn(ids));
    }

    fn radar_paint(&self, pulse: f64) -> LayerPaint {
        let pulse = pulse.clamp(0.0, 1.0);
        LayerPaint {
            color: PaintColor::Solid(self.active_color()),
            size: self.style.radar_radius_px * (0.6 + 0.4 * pulse),
            opacity: 0.2 + 0.4 * (1.0 - pulse),
        }
    }

    fn layer_specs(&self) -> Vec<LayerSpec> {
        let s = &self.style;
        let line = |id, source, color, size, opacity| LayerSpec {
            id,
            source,
            kind: LayerKind::Line,
            paint: LayerPaint {
                color,
                size,
                opacity,
            },
            filter: LayerFilter::All,
        };
        let circle = |id, source, color, size, opacity, filter| LayerSpec {
            id,
            source,
            kind: LayerKind::Circle,
            paint: LayerPaint {
                color,
                size,
                opacity,
            },
            filter,
        };

        vec![
            line(
                LayerId::GhostRoutes,
                SourceId::GhostRoutes,
                PaintColor::FeatureOr(s.node_color),
                3.0,
                s.ghost_opacity_inactive,
            ),
            LayerSpec {
                filter: LayerFilter::None,
                ..line(
                    LayerId::GhostActive,
                    SourceId::GhostRoutes,
                    PaintColor::FeatureOr(s.node_color),
                    3.0,
                    s.ghost_opacity_active,
                )
            },
            line(
                LayerId::ActiveRoute,
                SourceId::ActiveRoute,
                PaintColor::Gradient {
                    from: s.accent,
                    to: s.accent,
                },
                4.0,
                1.0,
            ),
            line(
                LayerId::ProgressTrail,
                SourceId::ProgressTrail,
                PaintColor::Solid(s.accent),
                6.0,
                0.9,
            ),
            circle(
                LayerId::Nodes,
                SourceId::Nodes,
                PaintColor::Solid(s.node_color),
                4.0,
                0.8,
                LayerFilter::All,
            ),
            circle(
                LayerId::ActiveNodes,
                SourceId::Nodes,
                PaintColor::Solid(s.accent),
                6.0,
                1.0,
                LayerFilter::NodeIn(vec![]),
            ),
            circle(
                LayerId::NodeHighlight,
                SourceId::Nodes,
                PaintColor::Solid(s.accent),
                9.0,
                1.0,
                LayerFilter::NodeIn(vec![]),
            ),
            circle(
                LayerId::Markers,
                SourceId::Markers,
                PaintColor::FeatureOr(s.accent),
                7.0,
                1.0,
                LayerFilter::All,
            ),
            circle(
                LayerId::VehicleRadar,
                SourceId::Vehicle,
                PaintColor::Solid(s.accent),
                s.radar_radius_px,
                0.4,
                LayerFilter::All,
            ),
            circle(
                LayerId::Vehicle,
                SourceId::Vehicle,
                PaintColor::Solid(s.accent),
                7.0,
                1.0,
                LayerFilter::All,
            ),
        ]
    }
}

fn ghost_features(routes: &[ProjectedRoute]) -> FeatureCollection {
    routes
        .iter()
        .filter(|r| r.has_route())
        .map(|r| Feature {
            route_index: Some(r.index),
            color: Some(r.color),
            ..Feature::line(r.path.clone())
        })
        .collect()
}

fn marker_features(route: &ProjectedRoute, accent: Rgba8) -> FeatureCollection {
    let (Some(&start), Some(&end)) = (route.path.first(), route.path.last()) else {
        return vec![];
    };
    vec![
        Feature {
            marker: Some(MarkerKind::Start),
            color: Some(route.color),
            route_index: Some(route.index),
            ..Feature::point(start)
        },
        Feature {
            marker: Some(MarkerKind::End),
            color: Some(accent),
            route_index: Some(route.index),
            ..Feature::point(end)
        },
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/scene/synchronizer.rs"]
mod tests;
