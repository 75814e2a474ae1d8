use crate::foundation::core::GeoPoint;
use crate::playback::state::PlaybackState;
use crate::playback::timer::Timer;
use crate::solution::fleet::Fleet;
use crate::solution::payload::NodeId;

/// A resolved node selection.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct NodeSelection {
    /// Node id.
    pub node_id: NodeId,
    /// Geographic position.
    pub position: GeoPoint,
    /// 1-based visit order on the active route, if the active vehicle serves it.
    pub visit_order: Option<usize>,
}

/// Resolve `id` against the fleet and the active route. Unknown ids resolve to `None`.
pub fn resolve_node(fleet: &Fleet, active_route: usize, id: NodeId) -> Option<NodeSelection> {
    let node = fleet.node(id)?;
    Some(NodeSelection {
        node_id: id,
        position: node.position,
        visit_order: fleet.visit_order(active_route, id),
    })
}

/// Node selection and hover, with a debounced camera pan on hover.
#[derive(Clone, Debug)]
pub struct SelectionController {
    pan_delay_ms: f64,
    pan_timer: Timer,
    pending_pan: Option<GeoPoint>,
}

impl SelectionController {
    /// Controller panning `pan_delay_ms` after the pointer settles on a node.
    pub fn new(pan_delay_ms: f64) -> Self {
        Self {
            pan_delay_ms,
            pan_timer: Timer::new(),
            pending_pan: None,
        }
    }

    /// Select `id` (or clear with `None`). An unknown id clears the selection.
    pub fn select_node(
        &mut self,
        pb: &mut PlaybackState,
        fleet: &Fleet,
        id: Option<NodeId>,
    ) -> Option<NodeSelection> {
        let resolved = id.and_then(|id| resolve_node(fleet, pb.vehicle_index, id));
        pb.selected_node_id = resolved.map(|s| s.node_id);
        resolved
    }

    /// Hover `id` (or clear). Schedules a pan to the node; never touches selection or playback.
    pub fn hover_node(
        &mut self,
        pb: &mut PlaybackState,
        fleet: &Fleet,
        id: Option<NodeId>,
        now_ms: f64,
    ) {
        let node = id.and_then(|id| fleet.node(id));
        pb.hovered_node_id = node.map(|n| n.id);
        match node {
            Some(n) => {
                self.pending_pan = Some(n.position);
                self.pan_timer.arm(now_ms, self.pan_delay_ms);
            }
            None => self.cancel(),
        }
    }

    /// Pan target whose debounce elapsed at `now_ms`.
    pub fn due_pan(&mut self, now_ms: f64) -> Option<GeoPoint> {
        if self.pan_timer.fire_if_due(now_ms) {
            self.pending_pan.take()
        } else {
            None
        }
    }

    /// Drop any scheduled pan.
    pub fn cancel(&mut self) {
        self.pan_timer.cancel();
        self.pending_pan = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/selection.rs"]
mod tests;
