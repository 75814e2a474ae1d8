use crate::foundation::core::Point;
use crate::solution::payload::NodeId;

/// Keys the engine reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCode {
    /// Play/pause.
    Space,
    /// Next vehicle.
    ArrowRight,
    /// Previous vehicle.
    ArrowLeft,
    /// Speed +1.
    ArrowUp,
    /// Speed -1.
    ArrowDown,
    /// Anything else.
    Other,
}

/// Raw gesture delivered by the host UI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// Key press.
    Key(KeyCode),
    /// Click on the map at a screen point.
    PointerClick {
        /// Screen x.
        x: f64,
        /// Screen y.
        y: f64,
    },
    /// Pointer entered a node row or marker (`None` when it left).
    PointerHover(Option<NodeId>),
    /// Click on a vehicle row in the sidebar.
    VehicleRowClick(usize),
    /// Drag on the scrub control.
    ScrubDrag(f64),
}

/// State change requested of the playback session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
    /// Play/pause; restarts a finished route.
    TogglePlay,
    /// Start playing.
    Play,
    /// Pause.
    Pause,
    /// Next vehicle (wraps).
    NextVehicle,
    /// Previous vehicle (wraps).
    PrevVehicle,
    /// Jump to a vehicle.
    SelectVehicle(usize),
    /// Speed +1 (clamped).
    SpeedUp,
    /// Speed -1 (clamped).
    SpeedDown,
    /// Set speed (clamped).
    SetSpeed(u8),
    /// Set progress directly.
    Scrub(f64),
    /// Select a node, or clear the selection.
    SelectNode(Option<NodeId>),
    /// Hover a node, or clear the hover.
    HoverNode(Option<NodeId>),
    /// Resolve the node under a screen point and select it.
    PickAt(Point),
    /// Toggle camera follow.
    SetCinematic(bool),
    /// Toggle fleet autoplay.
    SetAutoplayFleet(bool),
}

/// Maps gestures to intents behind an enable gate (closed while a modal captures input).
#[derive(Clone, Copy, Debug)]
pub struct InputController {
    enabled: bool,
}

impl Default for InputController {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl InputController {
    /// Open gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open or close the gate.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether events are translated.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Intent for `event`, or `None` when gated or unmapped.
    pub fn translate(&self, event: InputEvent) -> Option<Intent> {
        if !self.enabled {
            return None;
        }
        match event {
            InputEvent::Key(key) => match key {
                KeyCode::Space => Some(Intent::TogglePlay),
                KeyCode::ArrowRight => Some(Intent::NextVehicle),
                KeyCode::ArrowLeft => Some(Intent::PrevVehicle),
                KeyCode::ArrowUp => Some(Intent::SpeedUp),
                KeyCode::ArrowDown => Some(Intent::SpeedDown),
                KeyCode::Other => None,
            },
            InputEvent::PointerClick { x, y } => Some(Intent::PickAt(Point::new(x, y))),
            InputEvent::PointerHover(id) => Some(Intent::HoverNode(id)),
            InputEvent::VehicleRowClick(i) => Some(Intent::SelectVehicle(i)),
            InputEvent::ScrubDrag(v) => Some(Intent::Scrub(v)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/input.rs"]
mod tests;
