//! Fixed-timestep accumulator driving the timers and the render loop.
//!
//! Interval timers advance in fixed steps so a toggle lands on a known
//! boundary no matter how uneven the frames are; the render callback runs
//! once per frame with the frame's own duration.

use std::time::Duration;

use tracing::warn;

/// Longest frame accepted; anything longer is clamped rather than caught up.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(250);

/// What one frame should do: `updates` timer steps of `step`, then one
/// render of `frame_time`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTick {
    pub updates: u32,
    pub step: Duration,
    pub frame_time: Duration,
}

#[derive(Debug)]
pub struct FrameClock {
    step: Duration,
    accumulator: Duration,
    total_sim_time: Duration,
    frame_count: u64,
    update_count: u64,
}

impl FrameClock {
    /// A zero `step` is bumped to one millisecond.
    pub fn new(step: Duration) -> Self {
        Self {
            step: step.max(Duration::from_millis(1)),
            accumulator: Duration::ZERO,
            total_sim_time: Duration::ZERO,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Account for one frame of `frame_time`.
    pub fn advance(&mut self, frame_time: Duration) -> FrameTick {
        let frame_time = if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time.as_secs_f64() * 1000.0,
                MAX_FRAME_TIME.as_secs_f64() * 1000.0
            );
            MAX_FRAME_TIME
        } else {
            frame_time
        };

        self.accumulator += frame_time;
        let mut updates = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            self.total_sim_time += self.step;
            updates += 1;
        }
        self.update_count += u64::from(updates);
        self.frame_count += 1;

        FrameTick {
            updates,
            step: self.step,
            frame_time,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Time covered by executed timer steps.
    pub fn total_sim_time(&self) -> Duration {
        self.total_sim_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(5);

    #[test]
    fn test_single_step() {
        let mut clock = FrameClock::new(STEP);
        let tick = clock.advance(STEP);
        assert_eq!(tick.updates, 1);
        assert_eq!(tick.step, STEP);
        assert_eq!(clock.total_sim_time(), STEP);
    }

    #[test]
    fn test_partial_frame_carries_over() {
        let mut clock = FrameClock::new(STEP);
        assert_eq!(clock.advance(Duration::from_millis(3)).updates, 0);
        assert_eq!(clock.advance(Duration::from_millis(3)).updates, 1);
        // 1ms left over from the second frame.
        assert_eq!(clock.advance(Duration::from_millis(4)).updates, 1);
        assert_eq!(clock.total_sim_time(), Duration::from_millis(10));
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut clock = FrameClock::new(STEP);
        let tick = clock.advance(Duration::from_secs(1));
        assert_eq!(tick.frame_time, MAX_FRAME_TIME);
        assert_eq!(tick.updates, 50);
    }

    #[test]
    fn test_sim_time_matches_updates() {
        let mut clock = FrameClock::new(STEP);
        for ms in [17, 15, 20, 16, 33, 8, 18] {
            clock.advance(Duration::from_millis(ms));
        }
        assert_eq!(clock.frame_count(), 7);
        assert_eq!(clock.total_sim_time(), STEP * clock.update_count() as u32);
        assert_eq!(clock.update_count(), 127 / 5);
    }

    #[test]
    fn test_zero_frame_time_still_renders() {
        let mut clock = FrameClock::new(STEP);
        let tick = clock.advance(Duration::ZERO);
        assert_eq!(tick.updates, 0);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_zero_step_is_bumped() {
        let clock = FrameClock::new(Duration::ZERO);
        assert_eq!(clock.step(), Duration::from_millis(1));
    }
}
