/// Glow oscillator. Runs every frame whatever the playback state and never touches progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PulseOscillator {
    period_ms: f64,
}

impl PulseOscillator {
    /// Oscillator dividing wall-clock milliseconds by `period_ms`.
    pub fn new(period_ms: f64) -> Self {
        Self { period_ms }
    }

    /// `(sin(now / period) + 1) / 2`, in `[0, 1]`.
    pub fn sample(&self, now_ms: f64) -> f64 {
        if !now_ms.is_finite() || self.period_ms <= 0.0 {
            return 0.5;
        }
        (((now_ms / self.period_ms).sin() + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/pulse.rs"]
mod tests;
