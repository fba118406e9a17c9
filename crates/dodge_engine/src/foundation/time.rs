//! Frame timing
//!
//! The host loop reports wall-clock timestamps; [`FrameClock`] turns them
//! into simulation steps. Deltas are clamped so a stalled frame cannot
//! produce a huge step, and ticks arriving faster than the minimum frame
//! interval are coalesced into the next one.

use std::time::SystemTime;

use crate::core::config::FrameConfig;
use crate::foundation::math::clamp;

/// Per-frame timing handed to logic components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Simulated seconds since the previous step
    pub dt: f32,
    /// Index of this logic pass, starting at 0 and increasing by one per pass
    pub frame: u64,
    /// Wall-clock time when the pass started
    pub now: SystemTime,
}

impl Timing {
    /// Create a timing value for the given frame
    pub fn new(dt: f32, frame: u64) -> Self {
        Self {
            dt,
            frame,
            now: SystemTime::now(),
        }
    }
}

/// Clamped, rate-limited frame clock
#[derive(Debug, Clone)]
pub struct FrameClock {
    config: FrameConfig,
    last: Option<f64>,
    steps: u64,
    coalesced: u64,
}

impl FrameClock {
    /// Create a clock with the given limits
    pub fn new(config: FrameConfig) -> Self {
        Self {
            config,
            last: None,
            steps: 0,
            coalesced: 0,
        }
    }

    /// Feed a host timestamp in seconds.
    ///
    /// Returns the delta to simulate, or `None` when the tick is coalesced.
    /// The first timestamp only primes the clock. A coalesced tick leaves the
    /// previous timestamp in place so the skipped time carries over.
    pub fn advance(&mut self, now: f64) -> Option<f32> {
        let last = *self.last.get_or_insert(now);
        #[allow(clippy::cast_possible_truncation)]
        let delta = clamp((now - last) as f32, 0.0, self.config.max_delta);

        if delta > self.config.min_frame_interval {
            self.last = Some(now);
            self.steps += 1;
            Some(delta)
        } else {
            self.coalesced += 1;
            None
        }
    }

    /// Forget the previous timestamp; the next tick primes the clock again
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Number of ticks that produced a step
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Number of ticks that were coalesced
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Active limits
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(FrameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_tick_primes_and_is_coalesced() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(10.0), None);
        assert_eq!(clock.coalesced(), 1);
    }

    #[test]
    fn test_fast_ticks_are_coalesced_until_interval_passes() {
        let mut clock = FrameClock::default();
        clock.advance(0.0);
        // 60 Hz: 1/60 < 1/30, so the second tick is skipped
        assert_eq!(clock.advance(1.0 / 60.0), None);
        let dt = clock.advance(2.5 / 60.0).unwrap();
        assert_relative_eq!(dt, 2.5 / 60.0, epsilon = 1e-5);
        assert_eq!(clock.steps(), 1);
    }

    #[test]
    fn test_large_gap_is_clamped_to_max_delta() {
        let mut clock = FrameClock::default();
        clock.advance(0.0);
        let dt = clock.advance(5.0).unwrap();
        assert_relative_eq!(dt, 0.1);
    }

    #[test]
    fn test_time_going_backwards_never_steps() {
        let mut clock = FrameClock::default();
        clock.advance(3.0);
        assert_eq!(clock.advance(1.0), None);
    }

    #[test]
    fn test_reset_primes_again() {
        let mut clock = FrameClock::default();
        clock.advance(0.0);
        clock.reset();
        assert_eq!(clock.advance(100.0), None);
        assert!(clock.advance(100.05).is_some());
    }
}
