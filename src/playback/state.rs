use crate::solution::payload::NodeId;

/// Single authoritative playback state, mutated only through intents.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlaybackState {
    /// Active vehicle index into the route list.
    pub vehicle_index: usize,
    /// Position along the active route in `[0, 1]`.
    pub progress: f64,
    /// Whether the frame driver is advancing `progress`.
    pub playing: bool,
    /// Speed dial value.
    pub speed_multiplier: u8,
    /// Camera follows the vehicle.
    pub cinematic: bool,
    /// Play every vehicle in sequence.
    pub autoplay_fleet: bool,
    /// Selected delivery node.
    pub selected_node_id: Option<NodeId>,
    /// Hovered delivery node.
    pub hovered_node_id: Option<NodeId>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            vehicle_index: 0,
            progress: 0.0,
            playing: false,
            speed_multiplier: 1,
            cinematic: false,
            autoplay_fleet: false,
            selected_node_id: None,
            hovered_node_id: None,
        }
    }
}

impl PlaybackState {
    /// Switch vehicles. Progress resets to 0 when the index actually changes.
    pub fn set_vehicle_index(&mut self, index: usize) -> bool {
        if index == self.vehicle_index {
            return false;
        }
        self.vehicle_index = index;
        self.progress = 0.0;
        true
    }

    /// Set progress, clamped to `[0, 1]` (NaN maps to 0).
    pub fn set_progress(&mut self, value: f64) {
        self.progress = clamp_unit(value);
    }

    /// Set the speed dial, clamped to `[min, max]`.
    pub fn set_speed(&mut self, value: i32, min: u8, max: u8) {
        self.speed_multiplier = value.clamp(i32::from(min), i32::from(max)) as u8;
    }
}

pub(crate) fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/state.rs"]
mod tests;
