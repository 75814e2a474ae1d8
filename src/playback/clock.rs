use crate::playback::state::{PlaybackState, clamp_unit};

/// Clock lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockState {
    /// Not advancing.
    #[default]
    Idle,
    /// Advancing every frame.
    Playing,
    /// Reached the end of the route; progress frozen at 1.
    Completed,
}

/// Handle for the recurring per-frame callback.
///
/// Each request starts a new generation so a cancelled callback can be told apart from a live one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameDriver {
    generation: u64,
    active: bool,
}

impl FrameDriver {
    /// Start (or keep) the per-frame callback.
    pub fn request(&mut self) {
        if !self.active {
            self.generation += 1;
            self.active = true;
        }
    }

    /// Stop the per-frame callback.
    pub fn cancel(&mut self) {
        self.active = false;
    }

    /// Whether a callback is scheduled.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Generation of the most recent request.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Owns the play/pause state machine and advances progress each frame while playing.
#[derive(Clone, Debug)]
pub struct PlaybackClock {
    state: ClockState,
    base_speed: f64,
    driver: FrameDriver,
}

impl PlaybackClock {
    /// Idle clock advancing `base_speed * speed_multiplier` per frame.
    pub fn new(base_speed: f64) -> Self {
        Self {
            state: ClockState::Idle,
            base_speed,
            driver: FrameDriver::default(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Per-frame driver handle.
    pub fn driver(&self) -> FrameDriver {
        self.driver
    }

    /// Start playing. A completed (or fully scrubbed) route restarts from 0.
    pub fn play(&mut self, pb: &mut PlaybackState) {
        if self.state == ClockState::Playing {
            return;
        }
        if self.state == ClockState::Completed || pb.progress >= 1.0 {
            pb.progress = 0.0;
        }
        self.state = ClockState::Playing;
        pb.playing = true;
        self.driver.request();
        tracing::debug!(progress = pb.progress, "playback started");
    }

    /// Pause if playing.
    pub fn pause(&mut self, pb: &mut PlaybackState) {
        if self.state != ClockState::Playing {
            return;
        }
        self.state = ClockState::Idle;
        pb.playing = false;
        self.driver.cancel();
        tracing::debug!(progress = pb.progress, "playback paused");
    }

    /// Play when paused, pause when playing.
    pub fn toggle(&mut self, pb: &mut PlaybackState) {
        if self.state == ClockState::Playing {
            self.pause(pb);
        } else {
            self.play(pb);
        }
    }

    /// Drop back to `Idle` and cancel the frame driver (vehicle change, unmount).
    pub fn stop(&mut self, pb: &mut PlaybackState) {
        self.state = ClockState::Idle;
        pb.playing = false;
        self.driver.cancel();
    }

    /// Scrub to `value`. Never changes `playing`.
    pub fn scrub(&mut self, pb: &mut PlaybackState, value: f64) {
        pb.progress = clamp_unit(value);
        if self.state == ClockState::Completed && pb.progress < 1.0 {
            self.state = ClockState::Idle;
        }
    }

    /// Advance one frame. Returns `true` on the frame that completes the route.
    pub fn step(&mut self, pb: &mut PlaybackState) -> bool {
        if self.state != ClockState::Playing {
            return false;
        }
        let delta = self.base_speed * f64::from(pb.speed_multiplier);
        pb.progress = clamp_unit(pb.progress + delta);
        if pb.progress >= 1.0 {
            pb.progress = 1.0;
            self.state = ClockState::Completed;
            pb.playing = false;
            self.driver.cancel();
            tracing::debug!(vehicle = pb.vehicle_index, "playback completed");
            return true;
        }
        false
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
