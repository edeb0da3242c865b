//! Frame timing.
//!
//! [`FrameClock`] is ticked once per rendered frame and feeds the update rule
//! its elapsed time (for the ambient drift) and the frame hook its stats.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//! clock.set_fixed_delta(Some(1.0 / 60.0));
//!
//! let (elapsed, delta) = clock.tick();
//! assert_eq!(clock.frame(), 1);
//! ```

use std::time::{Duration, Instant};

const RATE_WINDOW: Duration = Duration::from_millis(500);

/// Frame rate measured over half-second windows.
#[derive(Debug, Clone, Copy)]
struct RateWindow {
    opened: Instant,
    frames: u32,
    rate: f32,
}

impl RateWindow {
    fn open(at: Instant) -> Self {
        Self {
            opened: at,
            frames: 0,
            rate: 0.0,
        }
    }

    fn record(&mut self, at: Instant) {
        self.frames += 1;
        let span = at.duration_since(self.opened);
        if span >= RATE_WINDOW {
            self.rate = self.frames as f32 / span.as_secs_f32();
            self.frames = 0;
            self.opened = at;
        }
    }
}

/// Elapsed time, delta, frame count and FPS for one engine.
#[derive(Debug)]
pub struct FrameClock {
    origin: Instant,
    previous: Instant,
    elapsed: f32,
    delta: f32,
    frames: u64,
    window: RateWindow,
    /// When set, every tick advances by exactly this much.
    step: Option<f32>,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            origin: now,
            previous: now,
            elapsed: 0.0,
            delta: 0.0,
            frames: 0,
            window: RateWindow::open(now),
            step: None,
        }
    }

    /// Advance by one frame. Returns `(elapsed, delta)` in seconds.
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();
        self.frames += 1;

        if let Some(step) = self.step {
            self.delta = step;
            self.elapsed += step;
            if step > 0.0 {
                self.window.rate = step.recip();
            }
        } else {
            self.delta = (now - self.previous).as_secs_f32();
            self.elapsed = (now - self.origin).as_secs_f32();
            self.window.record(now);
        }
        self.previous = now;

        (self.elapsed, self.delta)
    }

    /// Seconds since the clock started.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Seconds between the last two ticks.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Ticks so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frames
    }

    /// Frames per second, refreshed twice a second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.window.rate
    }

    /// Use a fixed step for deterministic runs. `None` returns to wall time.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.step = delta.map(|d| d.max(0.0));
    }

    pub fn fixed_delta(&self) -> Option<f32> {
        self.step
    }

    /// Restart from zero, keeping the fixed delta.
    pub fn reset(&mut self) {
        *self = Self {
            step: self.step,
            ..Self::new()
        };
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_clock_is_at_zero() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.fps(), 0.0);
        assert_eq!(clock.fixed_delta(), None);
    }

    #[test]
    fn test_wall_time_moves_forward() {
        let mut clock = FrameClock::new();
        std::thread::sleep(Duration::from_millis(5));
        let (first, _) = clock.tick();
        std::thread::sleep(Duration::from_millis(5));
        let (second, delta) = clock.tick();

        assert!(second > first);
        assert!(delta > 0.0);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_fixed_step_ignores_wall_time() {
        let mut clock = FrameClock::new();
        clock.set_fixed_delta(Some(0.25));

        std::thread::sleep(Duration::from_millis(20));
        for _ in 0..4 {
            clock.tick();
        }

        assert_eq!(clock.delta(), 0.25);
        assert_eq!(clock.elapsed(), 1.0);
        assert_eq!(clock.fps(), 4.0);
    }

    #[test]
    fn test_negative_step_is_clamped() {
        let mut clock = FrameClock::new();
        clock.set_fixed_delta(Some(-1.0));
        clock.tick();

        assert_eq!(clock.fixed_delta(), Some(0.0));
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_reset_keeps_fixed_step() {
        let mut clock = FrameClock::new();
        clock.set_fixed_delta(Some(0.5));
        clock.tick();
        clock.reset();

        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.fixed_delta(), Some(0.5));
    }
}
