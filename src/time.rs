//! Frame clock producing the per-frame time step.
//!
//! The simulation only ever sees a `dt` in seconds. [`FrameClock`] derives it
//! from wall time, or from caller-supplied durations for deterministic runs:
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//!
//! // In your frame loop:
//! let dt = clock.tick();
//! system.frame(dt, &view, &mut sink)?;
//! ```

use std::time::{Duration, Instant};

/// Largest `dt` handed out by default, in seconds.
pub const DEFAULT_MAX_DELTA: f32 = 0.25;

/// Per-frame time step source.
///
/// A stalled frame (debugger, window drag) would otherwise produce one huge
/// step that flings every particle across the scene, so steps are clamped to
/// `max_delta`.
#[derive(Debug)]
pub struct FrameClock {
    last_frame: Instant,
    elapsed: f32,
    delta: f32,
    frame: u64,
    paused: bool,
    fixed_delta: Option<f32>,
    time_scale: f32,
    max_delta: f32,
}

impl FrameClock {
    /// Create a clock starting now.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            elapsed: 0.0,
            delta: 0.0,
            frame: 0,
            paused: false,
            fixed_delta: None,
            time_scale: 1.0,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }

    /// Measure wall time since the previous tick and return the step.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.tick_with(raw)
    }

    /// Advance by a caller-supplied frame duration and return the step.
    ///
    /// While paused the step is `0.0`. Otherwise it is the fixed delta (if
    /// set) or `raw`, clamped to `max_delta`, then scaled.
    pub fn tick_with(&mut self, raw: Duration) -> f32 {
        self.frame += 1;
        if self.paused {
            self.delta = 0.0;
            return self.delta;
        }

        let base = self.fixed_delta.unwrap_or(raw.as_secs_f32());
        self.delta = base.min(self.max_delta) * self.time_scale;
        self.elapsed += self.delta;
        self.delta
    }

    /// Step returned by the last tick.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Simulated seconds since start (sum of steps).
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Ticks since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Whether the clock is paused.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current time scale.
    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Stop producing time; ticks return `0.0`.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after [`pause`](Self::pause). Time spent paused is not replayed.
    pub fn resume(&mut self) {
        if self.paused {
            self.last_frame = Instant::now();
            self.paused = false;
        }
    }

    /// Toggle pause state.
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Use a constant step instead of wall time. `None` restores wall time.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta.map(|d| d.max(0.0));
    }

    /// Set the time scale; negative values clamp to `0.0`.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Set the largest unscaled step a tick may produce.
    pub fn set_max_delta(&mut self, max_delta: f32) {
        self.max_delta = max_delta.max(0.0);
    }

    /// Restart from zero, keeping scale and fixed-step settings.
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.elapsed = 0.0;
        self.delta = 0.0;
        self.frame = 0;
        self.paused = false;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
