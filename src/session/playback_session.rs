use crate::animation::interpolate::{PathInterpolator, PathSample, waypoint_index};
use crate::animation::stops::{StopStatus, StopTrack};
use crate::foundation::config::EngineConfig;
use crate::foundation::core::GeoPoint;
use crate::foundation::error::RouteplayResult;
use crate::geometry::projector::CoordinateProjector;
use crate::interaction::input::{InputController, InputEvent, Intent};
use crate::interaction::selection::{NodeSelection, SelectionController, resolve_node};
use crate::metrics::calculator::{
    Eta, FleetMetrics, Quality, RouteMetrics, classify_quality_with, compute_fleet_metrics,
};
use crate::playback::clock::{ClockState, PlaybackClock};
use crate::playback::fleet::{FleetSequencer, FleetStep};
use crate::playback::pulse::PulseOscillator;
use crate::playback::state::PlaybackState;
use crate::scene::renderer::MapRenderer;
use crate::scene::synchronizer::{SceneSynchronizer, VehicleFrame};
use crate::solution::fleet::{Fleet, ProjectedRoute};
use crate::solution::payload::{NodeDef, NodeId, SolutionDef};

/// Enabled/disabled state of the playback controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ControlsView {
    /// Active vehicle has playable geometry; when `false` every control is disabled.
    pub has_route: bool,
    /// Playing right now.
    pub playing: bool,
    /// Speed dial.
    pub speed: u8,
    /// Number of vehicles.
    pub vehicle_count: usize,
    /// Deliveries on the active route.
    pub stop_count: usize,
}

/// Derived values of one tick, computed before the scene is updated.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameSnapshot {
    /// Tick time.
    pub now_ms: f64,
    /// Active vehicle index.
    pub vehicle_index: usize,
    /// Active vehicle number.
    pub vehicle_number: Option<u32>,
    /// Progress after this tick.
    pub progress: f64,
    /// Clock lifecycle.
    pub state: ClockState,
    /// Active route is playable.
    pub has_route: bool,
    /// Vehicle position.
    pub position: Option<GeoPoint>,
    /// Vehicle heading in degrees.
    pub bearing: Option<f64>,
    /// Last coarse waypoint reached.
    pub waypoint: Option<usize>,
    /// Glow oscillator.
    pub pulse: f64,
    /// Distance left.
    pub remaining_km: f64,
    /// Minutes left.
    pub eta_minutes: Option<f64>,
    /// Next undelivered stop.
    pub next_stop: Option<NodeId>,
}

/// Engine facade: owns the playback state and every driver, and is the only path to the scene.
///
/// The host calls [`PlaybackSession::tick`] once per animation frame with a wall-clock timestamp.
/// The progress clock, the pulse oscillator, the fleet sequencer and the hover-pan debounce are all
/// multiplexed on that one tick.
pub struct PlaybackSession<R: MapRenderer> {
    cfg: EngineConfig,
    fleet: Fleet,
    metrics: FleetMetrics,
    state: PlaybackState,
    clock: PlaybackClock,
    pulse: PulseOscillator,
    sequencer: FleetSequencer,
    selection: SelectionController,
    input: InputController,
    interpolator: PathInterpolator,
    stops: StopTrack,
    scene: SceneSynchronizer<R>,
    now_ms: f64,
}

impl<R: MapRenderer> PlaybackSession<R> {
    /// Build a session over a validated fleet. The scene stays pending until [`Self::scene_ready`].
    #[tracing::instrument(skip_all, fields(routes = fleet.len(), nodes = fleet.nodes().len()))]
    pub fn new(fleet: Fleet, cfg: EngineConfig, renderer: R) -> RouteplayResult<Self> {
        cfg.validate()?;
        let metrics = compute_fleet_metrics(fleet.routes());
        let mut scene = SceneSynchronizer::new(renderer, cfg.scene.clone(), &fleet);
        scene.on_active_vehicle_changed((!fleet.is_empty()).then_some(0));

        let state = PlaybackState {
            speed_multiplier: cfg.playback.min_speed,
            ..PlaybackState::default()
        };
        let stops = fleet
            .route(0)
            .map(|r| StopTrack::build(r, &fleet))
            .unwrap_or_default();

        let mut session = Self {
            clock: PlaybackClock::new(cfg.playback.base_speed),
            pulse: PulseOscillator::new(cfg.playback.pulse_period_ms),
            sequencer: FleetSequencer::new(cfg.playback.fleet_advance_delay_ms),
            selection: SelectionController::new(cfg.playback.hover_pan_delay_ms),
            input: InputController::new(),
            interpolator: PathInterpolator::arc_length(),
            cfg,
            fleet,
            metrics,
            state,
            stops,
            scene,
            now_ms: 0.0,
        };
        session.sync_frame();
        Ok(session)
    }

    /// Parse, validate and project a solver payload, then build a session.
    pub fn from_solution(
        def: &SolutionDef,
        cfg: EngineConfig,
        renderer: R,
    ) -> RouteplayResult<Self> {
        let fleet = Fleet::from_solution(def, &cfg)?;
        Self::new(fleet, cfg, renderer)
    }

    /// The renderer finished initializing.
    pub fn scene_ready(&mut self) {
        self.scene.on_ready();
    }

    /// Advance every driver to `now_ms` and push the resulting frame into the scene.
    pub fn tick(&mut self, now_ms: f64) -> FrameSnapshot {
        if now_ms.is_finite() {
            self.now_ms = now_ms;
        }
        let now = self.now_ms;

        if self.clock.driver().is_active() {
            self.clock.step(&mut self.state);
        }

        let has_route = self.has_route();
        let step = self.sequencer.tick(
            now,
            self.state.autoplay_fleet,
            self.clock.state(),
            self.state.vehicle_index,
            self.fleet.len(),
            has_route,
        );
        if let FleetStep::Advance { to, .. } = step {
            self.change_vehicle(to);
            if self.has_route() {
                self.clock.play(&mut self.state);
            }
        }

        if let Some(target) = self.selection.due_pan(now) {
            self.scene.pan_to(target);
        }

        let snapshot = self.sync_frame();
        self.scene.advance(now);
        snapshot
    }

    /// Apply one intent. Vehicle-dependent intents are ignored for an empty fleet.
    pub fn apply(&mut self, intent: Intent, now_ms: f64) {
        if now_ms.is_finite() {
            self.now_ms = now_ms;
        }
        let count = self.fleet.len();
        let pb = self.cfg.playback;

        match intent {
            Intent::TogglePlay => {
                if self.has_route() {
                    self.clock.toggle(&mut self.state);
                }
            }
            Intent::Play => {
                if self.has_route() {
                    self.clock.play(&mut self.state);
                }
            }
            Intent::Pause => self.clock.pause(&mut self.state),
            Intent::NextVehicle if count > 0 => {
                self.change_vehicle((self.state.vehicle_index + 1) % count);
            }
            Intent::PrevVehicle if count > 0 => {
                self.change_vehicle((self.state.vehicle_index + count - 1) % count);
            }
            Intent::SelectVehicle(i) if i < count => self.change_vehicle(i),
            Intent::NextVehicle | Intent::PrevVehicle | Intent::SelectVehicle(_) => {}
            Intent::SpeedUp => {
                let v = i32::from(self.state.speed_multiplier) + 1;
                self.state.set_speed(v, pb.min_speed, pb.max_speed);
            }
            Intent::SpeedDown => {
                let v = i32::from(self.state.speed_multiplier) - 1;
                self.state.set_speed(v, pb.min_speed, pb.max_speed);
            }
            Intent::SetSpeed(v) => self.state.set_speed(i32::from(v), pb.min_speed, pb.max_speed),
            Intent::Scrub(v) => {
                self.clock.scrub(&mut self.state, v);
                self.sync_frame();
            }
            Intent::SelectNode(id) => {
                self.selection.select_node(&mut self.state, &self.fleet, id);
                self.push_selection();
            }
            Intent::HoverNode(id) => {
                self.selection
                    .hover_node(&mut self.state, &self.fleet, id, self.now_ms);
                self.push_selection();
            }
            Intent::PickAt(point) => {
                if let Some(id) = self.scene.pick_node(point) {
                    self.selection
                        .select_node(&mut self.state, &self.fleet, Some(id));
                    self.push_selection();
                }
            }
            Intent::SetCinematic(on) => {
                self.state.cinematic = on;
                self.sync_frame();
            }
            Intent::SetAutoplayFleet(on) => self.state.autoplay_fleet = on,
        }
    }

    /// Translate a raw gesture through the input gate and apply it.
    pub fn handle_input(&mut self, event: InputEvent, now_ms: f64) {
        if let Some(intent) = self.input.translate(event) {
            self.apply(intent, now_ms);
        }
    }

    /// Open or close the input gate.
    pub fn set_input_enabled(&mut self, enabled: bool) {
        self.input.set_enabled(enabled);
    }

    /// Replace the node list. Only the nodes source is pushed; a vanished selection is cleared.
    pub fn set_nodes(&mut self, nodes: &[NodeDef]) -> RouteplayResult<()> {
        let projector = CoordinateProjector::from_config(&self.cfg.projection);
        self.fleet.replace_nodes(nodes, &projector)?;
        self.scene.on_nodes_changed(self.fleet.nodes());
        self.rebuild_stops();

        let selected = self.state.selected_node_id;
        if selected.is_some_and(|id| self.fleet.node(id).is_none()) {
            self.state.selected_node_id = None;
        }
        let hovered = self.state.hovered_node_id;
        if hovered.is_some_and(|id| self.fleet.node(id).is_none()) {
            self.state.hovered_node_id = None;
            self.selection.cancel();
        }
        self.push_selection();
        Ok(())
    }

    /// Stop every driver and tear the scene down.
    pub fn dispose(&mut self) {
        self.clock.stop(&mut self.state);
        self.sequencer.cancel();
        self.selection.cancel();
        self.scene.dispose();
    }

    /// Current playback state.
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Clock lifecycle.
    pub fn clock_state(&self) -> ClockState {
        self.clock.state()
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// The validated fleet.
    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// The scene owner (read-only).
    pub fn scene(&self) -> &SceneSynchronizer<R> {
        &self.scene
    }

    /// Active route, if any.
    pub fn active_route(&self) -> Option<&ProjectedRoute> {
        self.fleet.route(self.state.vehicle_index)
    }

    /// Whether the active route has at least two path points.
    pub fn has_route(&self) -> bool {
        self.active_route().is_some_and(ProjectedRoute::has_route)
    }

    /// Metrics of the active route.
    pub fn active_metrics(&self) -> Option<&RouteMetrics> {
        self.metrics.routes.get(self.state.vehicle_index)
    }

    /// Quality tier of the active route.
    pub fn active_quality(&self) -> Quality {
        match self.active_metrics() {
            Some(m) => {
                classify_quality_with(m.cost, Some(self.metrics.avg_cost), &self.cfg.metrics)
            }
            None => Quality::Neutral,
        }
    }

    /// Fleet aggregates.
    pub fn fleet_metrics(&self) -> &FleetMetrics {
        &self.metrics
    }

    /// Remaining distance and ETA at the current progress.
    pub fn eta(&self) -> Eta {
        let total = self.active_metrics().map(|m| m.distance_km).unwrap_or(0.0);
        Eta::at(total, self.state.progress, self.cfg.metrics.minutes_per_km)
    }

    /// Stop list of the active route.
    pub fn stops(&self) -> Vec<StopStatus> {
        self.stops.statuses(self.state.progress)
    }

    /// Vehicle position and heading at the current progress.
    pub fn vehicle_sample(&self) -> Option<PathSample> {
        let r = self.active_route()?;
        self.interpolator
            .interpolate_with_lengths(&r.path, &r.path_km, self.state.progress)
    }

    /// Resolved selection.
    pub fn selected_node(&self) -> Option<NodeSelection> {
        let id = self.state.selected_node_id?;
        resolve_node(&self.fleet, self.state.vehicle_index, id)
    }

    /// Control panel state.
    pub fn controls(&self) -> ControlsView {
        ControlsView {
            has_route: self.has_route(),
            playing: self.state.playing,
            speed: self.state.speed_multiplier,
            vehicle_count: self.fleet.len(),
            stop_count: self.stops.len(),
        }
    }

    fn change_vehicle(&mut self, index: usize) {
        let from = self.state.vehicle_index;
        if !self.state.set_vehicle_index(index) {
            return;
        }
        self.clock.stop(&mut self.state);
        self.sequencer.cancel();
        self.rebuild_stops();
        self.scene.on_active_vehicle_changed(Some(index));
        tracing::debug!(from, to = index, "active vehicle changed");
        self.sync_frame();
    }

    fn rebuild_stops(&mut self) {
        self.stops = self
            .active_route()
            .map(|r| StopTrack::build(r, &self.fleet))
            .unwrap_or_default();
    }

    fn push_selection(&mut self) {
        self.scene
            .on_selection_changed(self.state.selected_node_id, self.state.hovered_node_id);
    }

    /// Derive this frame's values, then push them into the scene.
    fn sync_frame(&mut self) -> FrameSnapshot {
        let progress = self.state.progress;
        let pulse = self.pulse.sample(self.now_ms);
        let route = self.active_route();

        let sample = self.vehicle_sample();
        let trail = route
            .map(|r| {
                self.interpolator
                    .trail_with_lengths(&r.path, &r.path_km, progress)
            })
            .unwrap_or_default();
        let waypoint = route.and_then(|r| waypoint_index(&r.steps, progress));
        let eta = self.eta();

        let snapshot = FrameSnapshot {
            now_ms: self.now_ms,
            vehicle_index: self.state.vehicle_index,
            vehicle_number: route.map(ProjectedRoute::vehicle_number),
            progress,
            state: self.clock.state(),
            has_route: self.has_route(),
            position: sample.map(|s| s.position),
            bearing: sample.map(|s| s.bearing),
            waypoint,
            pulse,
            remaining_km: eta.remaining_km,
            eta_minutes: eta.eta_minutes,
            next_stop: self.stops.next_stop(progress).map(|s| s.node_id),
        };

        self.scene.on_frame(VehicleFrame {
            progress,
            position: snapshot.position,
            bearing: snapshot.bearing.unwrap_or(0.0),
            trail,
            pulse,
            cinematic: self.state.cinematic,
        });
        snapshot
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/playback_session.rs"]
mod tests;
