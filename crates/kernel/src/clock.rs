use std::time::Instant;

/// Clamp a raw frame delta (seconds) into `[0, max_delta]`.
///
/// Long stalls (a backgrounded tab, a debugger break) must not turn into one
/// giant simulation step. A NaN bound leaves the delta unbounded above; it
/// never goes negative.
pub fn clamp_delta(raw: f32, max_delta: f32) -> f32 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.min(max_delta).max(0.0)
}

/// Measures time between frame callbacks.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_delta: f32,
}

impl FrameClock {
    pub fn new(max_delta: f32) -> Self {
        Self {
            last: None,
            max_delta,
        }
    }

    /// Seconds since the previous call, clamped. The first call returns 0.
    pub fn delta(&mut self, now: Instant) -> f32 {
        let raw = match self.last {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last = Some(now);
        clamp_delta(raw, self.max_delta)
    }
}
