use crate::foundation::core::Rgba8;
use crate::foundation::error::{RouteplayError, RouteplayResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Presentation and playback constants.
///
/// None of these describe a physical model: the speed dial and the minutes-per-km ETA factor are
/// display conveniences and are kept configurable for that reason.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Grid-to-geo projection constants.
    pub projection: ProjectionConfig,
    /// Playback clock and timers.
    pub playback: PlaybackConfig,
    /// Derived metric constants.
    pub metrics: MetricsConfig,
    /// Scene styling and camera behavior.
    pub scene: SceneConfig,
}

/// Affine grid-to-geo projection constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Latitude of grid origin.
    pub base_lat: f64,
    /// Longitude of grid origin.
    pub base_lng: f64,
    /// Degrees per grid unit.
    pub scale: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            base_lat: 12.9716,
            base_lng: 77.5946,
            scale: 0.01,
        }
    }
}

/// Playback clock constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Progress added per frame at speed multiplier 1.
    pub base_speed: f64,
    /// Lowest speed multiplier.
    pub min_speed: u8,
    /// Highest speed multiplier.
    pub max_speed: u8,
    /// Divisor applied to wall-clock milliseconds by the glow pulse.
    pub pulse_period_ms: f64,
    /// Pause between vehicles in fleet autoplay.
    pub fleet_advance_delay_ms: f64,
    /// Debounce before a hovered node pans the camera.
    pub hover_pan_delay_ms: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            base_speed: 0.002,
            min_speed: 1,
            max_speed: 10,
            pulse_period_ms: 300.0,
            fleet_advance_delay_ms: 1200.0,
            hover_pan_delay_ms: 150.0,
        }
    }
}

/// Metric constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// ETA factor; 2.0 corresponds to 30 km/h.
    pub minutes_per_km: f64,
    /// Upper bound (exclusive) of the "Efficient" cost ratio.
    pub efficient_below: f64,
    /// Lower bound (inclusive) of the "Heavy" cost ratio.
    pub heavy_from: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            minutes_per_km: 2.0,
            efficient_below: 0.8,
            heavy_from: 1.2,
        }
    }
}

/// Scene styling and camera constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Route colors, cycled by vehicle index.
    pub palette: Vec<Rgba8>,
    /// Gradient end color for the active route.
    pub accent: Rgba8,
    /// Color of delivery nodes not on the active route.
    pub node_color: Rgba8,
    /// Ghost-route opacity for inactive vehicles.
    pub ghost_opacity_inactive: f64,
    /// Ghost-route opacity for the active vehicle.
    pub ghost_opacity_active: f64,
    /// Camera zoom while following the vehicle in cinematic mode.
    pub cinematic_zoom: f64,
    /// Camera pitch (degrees) in cinematic mode.
    pub cinematic_pitch: f64,
    /// Added to the vehicle bearing for the cinematic camera bearing.
    pub cinematic_bearing_offset: f64,
    /// Padding in pixels when fitting the camera to a route.
    pub fit_padding_px: f64,
    /// Duration of route-fit camera transitions.
    pub fit_duration_ms: f64,
    /// Duration of cinematic follow transitions.
    pub follow_duration_ms: f64,
    /// Duration of hover pan transitions.
    pub pan_duration_ms: f64,
    /// Base radius of the radar halo in pixels.
    pub radar_radius_px: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            palette: vec![
                Rgba8::rgb(0x22, 0xd3, 0xee),
                Rgba8::rgb(0xa7, 0x8b, 0xfa),
                Rgba8::rgb(0xf4, 0x72, 0xb6),
                Rgba8::rgb(0x34, 0xd3, 0x99),
                Rgba8::rgb(0xfb, 0xbf, 0x24),
                Rgba8::rgb(0x60, 0xa5, 0xfa),
                Rgba8::rgb(0xf8, 0x71, 0x71),
                Rgba8::rgb(0x4a, 0xde, 0x80),
            ],
            accent: Rgba8::rgb(0xfa, 0xcc, 0x15),
            node_color: Rgba8::rgb(0x94, 0xa3, 0xb8),
            ghost_opacity_inactive: 0.15,
            ghost_opacity_active: 0.45,
            cinematic_zoom: 15.0,
            cinematic_pitch: 60.0,
            cinematic_bearing_offset: 0.0,
            fit_padding_px: 60.0,
            fit_duration_ms: 900.0,
            follow_duration_ms: 250.0,
            pan_duration_ms: 400.0,
            radar_radius_px: 18.0,
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> RouteplayResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            RouteplayError::config(format!("read config '{}': {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_slice(&bytes)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `ROUTEPLAY_*` environment overrides. Unparseable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        fn env_f64(name: &str) -> Option<f64> {
            std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
        }

        if let Some(v) = env_f64("ROUTEPLAY_BASE_LAT") {
            self.projection.base_lat = v;
        }
        if let Some(v) = env_f64("ROUTEPLAY_BASE_LNG") {
            self.projection.base_lng = v;
        }
        if let Some(v) = env_f64("ROUTEPLAY_SCALE") {
            self.projection.scale = v;
        }
        if let Some(v) = env_f64("ROUTEPLAY_BASE_SPEED") {
            self.playback.base_speed = v;
        }
        if let Some(v) = env_f64("ROUTEPLAY_MINUTES_PER_KM") {
            self.metrics.minutes_per_km = v;
        }
        self
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> RouteplayResult<()> {
        let p = &self.projection;
        if !(p.base_lat.is_finite() && p.base_lng.is_finite() && p.scale.is_finite()) {
            return Err(RouteplayError::config("projection constants must be finite"));
        }

        let pb = &self.playback;
        if !pb.base_speed.is_finite() || pb.base_speed <= 0.0 {
            return Err(RouteplayError::config("base_speed must be > 0"));
        }
        if pb.min_speed == 0 || pb.min_speed > pb.max_speed {
            return Err(RouteplayError::config(
                "speed bounds must satisfy 1 <= min_speed <= max_speed",
            ));
        }
        if !pb.pulse_period_ms.is_finite() || pb.pulse_period_ms <= 0.0 {
            return Err(RouteplayError::config("pulse_period_ms must be > 0"));
        }
        for (name, v) in [
            ("fleet_advance_delay_ms", pb.fleet_advance_delay_ms),
            ("hover_pan_delay_ms", pb.hover_pan_delay_ms),
            ("fit_duration_ms", self.scene.fit_duration_ms),
            ("follow_duration_ms", self.scene.follow_duration_ms),
            ("pan_duration_ms", self.scene.pan_duration_ms),
            ("fit_padding_px", self.scene.fit_padding_px),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(RouteplayError::config(format!("{name} must be >= 0")));
            }
        }

        let m = &self.metrics;
        if !m.minutes_per_km.is_finite() || m.minutes_per_km < 0.0 {
            return Err(RouteplayError::config("minutes_per_km must be >= 0"));
        }
        if !(m.efficient_below.is_finite()
            && m.heavy_from.is_finite()
            && m.efficient_below <= m.heavy_from)
        {
            return Err(RouteplayError::config(
                "quality thresholds must satisfy efficient_below <= heavy_from",
            ));
        }

        if self.scene.palette.is_empty() {
            return Err(RouteplayError::config("palette must not be empty"));
        }
        for (name, v) in [
            ("ghost_opacity_inactive", self.scene.ghost_opacity_inactive),
            ("ghost_opacity_active", self.scene.ghost_opacity_active),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(RouteplayError::config(format!("{name} must be in [0, 1]")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
