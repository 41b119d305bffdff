use std::time::Instant;

/// Frames per second measured between successive captures.
///
/// Only the previous capture time is kept; the value is for reporting and
/// never feeds back into control flow.
#[derive(Debug, Default)]
pub struct ThroughputMeter {
    last: Option<Instant>,
}

impl ThroughputMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a capture at `now`. `None` on the first call.
    pub fn tick_at(&mut self, now: Instant) -> Option<f64> {
        let fps = self.last.and_then(|last| {
            let secs = now.saturating_duration_since(last).as_secs_f64();
            (secs > 0.0).then(|| 1.0 / secs)
        });
        self.last = Some(now);
        fps
    }
}
