use crate::foundation::core::{GeoBounds, GeoPoint, Lerp, Point, Rgba8};
use crate::solution::payload::NodeId;

/// Named data sources registered once on scene-ready.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    /// All delivery nodes.
    Nodes,
    /// Geometry of every route.
    GhostRoutes,
    /// Active route's full geometry.
    ActiveRoute,
    /// Traveled portion of the active route.
    ProgressTrail,
    /// Start and end markers of the active route.
    Markers,
    /// The animated vehicle.
    Vehicle,
}

impl SourceId {
    /// Every source in registration order.
    pub const ALL: [SourceId; 6] = [
        SourceId::Nodes,
        SourceId::GhostRoutes,
        SourceId::ActiveRoute,
        SourceId::ProgressTrail,
        SourceId::Markers,
        SourceId::Vehicle,
    ];
}

/// Named layers, listed bottom to top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerId {
    /// Routes of inactive vehicles.
    GhostRoutes,
    /// The active vehicle's ghost route, drawn brighter.
    GhostActive,
    /// Active route stroked with a color gradient.
    ActiveRoute,
    /// Glowing trail behind the vehicle.
    ProgressTrail,
    /// Every delivery node.
    Nodes,
    /// Nodes served by the active vehicle.
    ActiveNodes,
    /// Selected and hovered nodes.
    NodeHighlight,
    /// Start and end markers.
    Markers,
    /// Pulsing halo under the vehicle.
    VehicleRadar,
    /// Vehicle marker.
    Vehicle,
}

impl LayerId {
    /// Every layer in draw order.
    pub const ALL: [LayerId; 10] = [
        LayerId::GhostRoutes,
        LayerId::GhostActive,
        LayerId::ActiveRoute,
        LayerId::ProgressTrail,
        LayerId::Nodes,
        LayerId::ActiveNodes,
        LayerId::NodeHighlight,
        LayerId::Markers,
        LayerId::VehicleRadar,
        LayerId::Vehicle,
    ];

    /// Layers a pointer pick resolves nodes against, topmost first.
    pub const NODE_LAYERS: [LayerId; 3] =
        [LayerId::NodeHighlight, LayerId::ActiveNodes, LayerId::Nodes];
}

/// Geometry of one feature.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Geometry {
    /// Single position.
    Point(GeoPoint),
    /// Polyline.
    LineString(Vec<GeoPoint>),
}

/// Marker role for point features in the markers source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// Route start.
    Start,
    /// Route end.
    End,
}

/// A feature with the typed properties layers style and filter on.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Feature {
    /// Geometry.
    pub geometry: Geometry,
    /// Delivery node this feature represents.
    pub node_id: Option<NodeId>,
    /// Route this feature belongs to.
    pub route_index: Option<usize>,
    /// Per-feature color.
    pub color: Option<Rgba8>,
    /// Heading in degrees (vehicle only).
    pub bearing: Option<f64>,
    /// Marker role.
    pub marker: Option<MarkerKind>,
}

impl Feature {
    /// Point feature with no properties.
    pub fn point(p: GeoPoint) -> Self {
        Self {
            geometry: Geometry::Point(p),
            node_id: None,
            route_index: None,
            color: None,
            bearing: None,
            marker: None,
        }
    }

    /// Line feature with no properties.
    pub fn line(points: Vec<GeoPoint>) -> Self {
        Self {
            geometry: Geometry::LineString(points),
            ..Self::point(GeoPoint::default())
        }
    }
}

/// Ordered feature list pushed into a source.
pub type FeatureCollection = Vec<Feature>;

/// How a layer draws its features.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Points as filled circles.
    Circle,
    /// Lines as strokes.
    Line,
}

/// Color source of a layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintColor {
    /// Fixed color.
    Solid(Rgba8),
    /// Use each feature's `color`, falling back to the given color.
    FeatureOr(Rgba8),
    /// Interpolate along the line from `from` to `to`.
    Gradient {
        /// Color at line start.
        from: Rgba8,
        /// Color at line end.
        to: Rgba8,
    },
}

/// Paint properties of a layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LayerPaint {
    /// Color source.
    pub color: PaintColor,
    /// Line width or circle radius in pixels.
    pub size: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

/// Feature filter of a layer.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerFilter {
    /// Draw everything.
    #[default]
    All,
    /// Draw nothing.
    None,
    /// Only nodes whose id is listed.
    NodeIn(Vec<NodeId>),
    /// Only features of this route.
    RouteIs(usize),
    /// Every route except this one.
    RouteIsNot(usize),
}

impl LayerFilter {
    /// Whether `f` passes the filter.
    pub fn matches(&self, f: &Feature) -> bool {
        match self {
            Self::All => true,
            Self::None => false,
            Self::NodeIn(ids) => f.node_id.is_some_and(|id| ids.contains(&id)),
            Self::RouteIs(i) => f.route_index == Some(*i),
            Self::RouteIsNot(i) => f.route_index != Some(*i),
        }
    }
}

/// Layer registration.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayerSpec {
    /// Layer name.
    pub id: LayerId,
    /// Source it draws.
    pub source: SourceId,
    /// Draw style.
    pub kind: LayerKind,
    /// Paint.
    pub paint: LayerPaint,
    /// Filter.
    pub filter: LayerFilter,
}

/// Camera position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CameraPose {
    /// Map center.
    pub center: GeoPoint,
    /// Web-Mercator zoom level.
    pub zoom: f64,
    /// Rotation in degrees, clockwise from north.
    pub bearing: f64,
    /// Tilt in degrees.
    pub pitch: f64,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            center: GeoPoint::default(),
            zoom: 12.0,
            bearing: 0.0,
            pitch: 0.0,
        }
    }
}

impl Lerp for CameraPose {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        // Bearing takes the short way round.
        let mut delta = (b.bearing - a.bearing) % 360.0;
        if delta > 180.0 {
            delta -= 360.0;
        } else if delta < -180.0 {
            delta += 360.0;
        }
        Self {
            center: GeoPoint::lerp(&a.center, &b.center, t),
            zoom: f64::lerp(&a.zoom, &b.zoom, t),
            bearing: (a.bearing + delta * t).rem_euclid(360.0),
            pitch: f64::lerp(&a.pitch, &b.pitch, t),
        }
    }
}

/// Partial camera target; `None` fields keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct CameraTarget {
    /// Center.
    pub center: Option<GeoPoint>,
    /// Zoom.
    pub zoom: Option<f64>,
    /// Bearing.
    pub bearing: Option<f64>,
    /// Pitch.
    pub pitch: Option<f64>,
}

impl CameraTarget {
    /// Resolve against the current pose.
    pub fn resolve(&self, current: &CameraPose) -> CameraPose {
        CameraPose {
            center: self.center.unwrap_or(current.center),
            zoom: self.zoom.unwrap_or(current.zoom),
            bearing: self.bearing.unwrap_or(current.bearing),
            pitch: self.pitch.unwrap_or(current.pitch),
        }
    }
}

/// Renderer boundary of the persistent map scene.
///
/// Implementations own sources, layers and the camera; the scene synchronizer is the only caller.
pub trait MapRenderer {
    /// Register a source with initial data.
    fn add_source(&mut self, id: SourceId, data: FeatureCollection);
    /// Replace a source's data (last write wins).
    fn set_source_data(&mut self, id: SourceId, data: FeatureCollection);
    /// Remove a source.
    fn remove_source(&mut self, id: SourceId);
    /// Register a layer.
    fn add_layer(&mut self, spec: LayerSpec);
    /// Replace a layer's paint.
    fn set_layer_paint(&mut self, id: LayerId, paint: LayerPaint);
    /// Replace a layer's filter.
    fn set_layer_filter(&mut self, id: LayerId, filter: LayerFilter);
    /// Remove a layer.
    fn remove_layer(&mut self, id: LayerId);
    /// Animate the camera towards `target`.
    fn ease_camera(&mut self, target: CameraTarget, duration_ms: f64);
    /// Animate the camera to show `bounds` with `padding_px` on every side.
    fn fit_bounds(&mut self, bounds: GeoBounds, padding_px: f64, duration_ms: f64);
    /// Animate the camera center only.
    fn pan_to(&mut self, center: GeoPoint, duration_ms: f64);
    /// Features drawn at screen `point` on `layers`, topmost first.
    fn query_rendered_features(&self, point: Point, layers: &[LayerId]) -> Vec<Feature>;
    /// Current camera pose.
    fn camera(&self) -> CameraPose;
    /// Advance renderer-side animations to `now_ms`.
    fn advance(&mut self, _now_ms: f64) {}
}

#[cfg(test)]
#[path = "../../tests/unit/scene/renderer.rs"]
mod tests;
