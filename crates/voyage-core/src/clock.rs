//! Explicit presentation time.
//!
//! Every per-tick update receives a [`Tick`] instead of reading a wall clock,
//! which keeps oscillations and timers deterministic under test.

/// Nominal delta used for the first tick (60 FPS).
pub const NOMINAL_DT_MS: f64 = 1000.0 / 60.0;

/// Largest delta a single tick may carry. Longer gaps (background tabs,
/// debugger pauses) are clamped so interpolation does not overshoot.
pub const MAX_DT_MS: f64 = 100.0;

/// Time information for one render tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tick {
    /// Presentation time since start, in milliseconds.
    pub elapsed_ms: f64,
    /// Time since the previous tick, in seconds.
    pub dt_secs: f32,
}

impl Tick {
    pub fn new(elapsed_ms: f64, dt_secs: f32) -> Self {
        Self { elapsed_ms, dt_secs }
    }

    /// Elapsed time in seconds, for oscillators.
    #[allow(clippy::cast_possible_truncation)]
    pub fn elapsed_secs(&self) -> f32 {
        (self.elapsed_ms / 1000.0) as f32
    }
}

/// Turns raw frame timestamps into clamped [`Tick`]s.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_timestamp: Option<f64>,
    elapsed_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance using an absolute timestamp such as the one passed to
    /// `requestAnimationFrame`.
    pub fn advance_to(&mut self, timestamp_ms: f64) -> Tick {
        let delta = match self.last_timestamp {
            None => NOMINAL_DT_MS,
            Some(last) => timestamp_ms - last,
        };
        self.last_timestamp = Some(timestamp_ms);
        self.advance_by(delta)
    }

    /// Advance by a relative delta in milliseconds.
    #[allow(clippy::cast_possible_truncation)]
    pub fn advance_by(&mut self, delta_ms: f64) -> Tick {
        // NaN falls through to zero as well
        let delta = if delta_ms > 0.0 { delta_ms.min(MAX_DT_MS) } else { 0.0 };
        self.elapsed_ms += delta;
        Tick {
            elapsed_ms: self.elapsed_ms,
            dt_secs: (delta / 1000.0) as f32,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Forget the previous timestamp, e.g. after the loop was paused.
    pub fn resync(&mut self) {
        self.last_timestamp = None;
    }
}
