//! Routeplay is a route playback and projection engine.
//!
//! It takes a solved vehicle-routing instance (per-vehicle stop sequences and path geometry in an
//! abstract grid space) and drives a scrubbable, camera-following animation of it on a persistent
//! map scene, keeping distance, ETA and route-quality metrics in step with playback.
//!
//! - Parse a [`SolutionDef`] and validate it into a [`Fleet`]
//! - Create a [`PlaybackSession`] over a [`MapRenderer`]
//! - Call [`PlaybackSession::tick`] once per frame and feed it [`Intent`]s or [`InputEvent`]s
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod geometry;
pub(crate) mod interaction;
pub(crate) mod metrics;
pub(crate) mod playback;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod session;
pub(crate) mod solution;

pub use crate::foundation::config::{
    EngineConfig, MetricsConfig, PlaybackConfig, ProjectionConfig, SceneConfig,
};
pub use crate::foundation::core::{GeoBounds, GeoPoint, GridPoint, Lerp, Point, Rgba8, Vec2};
pub use crate::foundation::error::{RouteplayError, RouteplayResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::interpolate::{
    Parameterization, PathInterpolator, PathSample, waypoint_index,
};
pub use crate::animation::stops::{StopStatus, StopTrack};
pub use crate::geometry::geo::{
    EARTH_RADIUS_KM, cumulative_lengths_km, haversine_km, initial_bearing_deg, normalize_bearing,
    path_length_km,
};
pub use crate::geometry::projector::CoordinateProjector;
pub use crate::interaction::input::{InputController, InputEvent, Intent, KeyCode};
pub use crate::interaction::selection::{NodeSelection, SelectionController, resolve_node};
pub use crate::metrics::calculator::{
    Eta, FleetMetrics, Quality, RouteMetrics, classify_quality, classify_quality_with,
    compute_fleet_metrics, compute_route_metrics,
};
pub use crate::playback::clock::{ClockState, FrameDriver, PlaybackClock};
pub use crate::playback::fleet::{FleetSequencer, FleetStep};
pub use crate::playback::pulse::PulseOscillator;
pub use crate::playback::state::PlaybackState;
pub use crate::playback::timer::Timer;
pub use crate::render::cpu::{CpuMapRenderer, CpuRenderOpts, FrameRGBA};
pub use crate::scene::recording::{RecordingRenderer, SceneCall};
pub use crate::scene::renderer::{
    CameraPose, CameraTarget, Feature, FeatureCollection, Geometry, LayerFilter, LayerId,
    LayerKind, LayerPaint, LayerSpec, MapRenderer, MarkerKind, PaintColor, SourceId,
};
pub use crate::scene::synchronizer::{SceneSynchronizer, VehicleFrame};
pub use crate::session::playback_session::{ControlsView, FrameSnapshot, PlaybackSession};
pub use crate::solution::fleet::{DeliveryNode, Fleet, ProjectedRoute, VehicleRoute, palette_color};
pub use crate::solution::payload::{NodeDef, NodeId, RouteDef, RouteIdDef, SolutionDef};
