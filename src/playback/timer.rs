/// One-shot deadline timer driven by the session tick.
///
/// All operations are idempotent: cancelling an idle timer or firing an unarmed one does nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Timer {
    due_at_ms: Option<f64>,
}

impl Timer {
    /// Idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm to fire `delay_ms` after `now_ms`, replacing any pending deadline (debounce).
    pub fn arm(&mut self, now_ms: f64, delay_ms: f64) {
        self.due_at_ms = Some(now_ms + delay_ms.max(0.0));
    }

    /// Arm only when not already pending.
    pub fn arm_once(&mut self, now_ms: f64, delay_ms: f64) {
        if self.due_at_ms.is_none() {
            self.arm(now_ms, delay_ms);
        }
    }

    /// Drop the pending deadline.
    pub fn cancel(&mut self) {
        self.due_at_ms = None;
    }

    /// Whether a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.due_at_ms.is_some()
    }

    /// Pending deadline.
    pub fn due_at_ms(&self) -> Option<f64> {
        self.due_at_ms
    }

    /// Returns `true` once when the deadline has passed, then disarms.
    pub fn fire_if_due(&mut self, now_ms: f64) -> bool {
        match self.due_at_ms {
            Some(due) if now_ms >= due => {
                self.due_at_ms = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/timer.rs"]
mod tests;
