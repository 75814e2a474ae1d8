use crate::playback::clock::ClockState;
use crate::playback::timer::Timer;

/// What the sequencer wants the session to do this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FleetStep {
    /// Nothing to do.
    Idle,
    /// Completion seen; waiting for the advance delay.
    Waiting,
    /// Switch to `to` (progress 0) and start playing.
    Advance {
        /// Vehicle index being left.
        from: usize,
        /// Next vehicle index.
        to: usize,
    },
}

/// Fleet autoplay: advances to the next vehicle a fixed delay after each completion.
#[derive(Clone, Debug)]
pub struct FleetSequencer {
    delay_ms: f64,
    timer: Timer,
}

impl FleetSequencer {
    /// Sequencer waiting `delay_ms` between vehicles.
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            timer: Timer::new(),
        }
    }

    /// Whether an advance is pending.
    pub fn is_waiting(&self) -> bool {
        self.timer.is_armed()
    }

    /// Drop any pending advance.
    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    /// Evaluate one tick.
    ///
    /// A vehicle without playable geometry advances immediately on the tick that observes it, so
    /// autoplay never stalls on an empty route.
    pub fn tick(
        &mut self,
        now_ms: f64,
        autoplay: bool,
        clock: ClockState,
        vehicle_index: usize,
        route_count: usize,
        has_route: bool,
    ) -> FleetStep {
        if !autoplay || route_count == 0 {
            self.timer.cancel();
            return FleetStep::Idle;
        }

        let next = (vehicle_index + 1) % route_count;
        if !has_route {
            self.timer.cancel();
            return FleetStep::Advance {
                from: vehicle_index,
                to: next,
            };
        }

        if clock != ClockState::Completed {
            self.timer.cancel();
            return FleetStep::Idle;
        }

        self.timer.arm_once(now_ms, self.delay_ms);
        if self.timer.fire_if_due(now_ms) {
            tracing::debug!(from = vehicle_index, to = next, "fleet advance");
            FleetStep::Advance {
                from: vehicle_index,
                to: next,
            }
        } else {
            FleetStep::Waiting
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/fleet.rs"]
mod tests;
