use std::time::Instant;

/// Wall-clock frame timer for real-time runs.
pub struct FrameTimer {
    last: Instant,
    pub dt: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            dt: 0.0,
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Monotonic simulation time advanced by a fixed step.
///
/// `now` is kept in f64 so expiry comparisons stay exact over long sessions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimClock {
    /// Seconds since the simulation started.
    pub now: f64,
    /// Length of one tick in seconds.
    pub dt: f32,
    /// Ticks completed.
    pub ticks: u64,
}

impl SimClock {
    pub fn new(dt: f32) -> Self {
        Self {
            now: 0.0,
            dt,
            ticks: 0,
        }
    }

    pub fn advance(&mut self) {
        self.ticks += 1;
        self.now = self.ticks as f64 * self.dt as f64;
    }

    /// Timestamp `secs` seconds from now.
    pub fn after(&self, secs: f32) -> f64 {
        self.now + secs as f64
    }
}
