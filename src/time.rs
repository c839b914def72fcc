//! Frame clock: turns `performance.now()` timestamps into clamped
//! elapsed seconds for the simulation step.
//!
//! `draw_web()` runs at the display refresh rate, which stalls when the
//! tab is hidden. The clamp keeps a resumed tab from replaying the gap.

/// Longest frame the simulation will advance in one step.
pub const MAX_FRAME_DELTA_SECS: f64 = 0.25;

pub struct FrameClock {
    max_delta_secs: f64,
    /// Timestamp of the previous update (ms), None before the first frame.
    last_timestamp: Option<f64>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DELTA_SECS)
    }
}

impl FrameClock {
    pub fn new(max_delta_secs: f64) -> Self {
        Self {
            max_delta_secs,
            last_timestamp: None,
        }
    }

    /// Feed the current wall-clock timestamp in milliseconds.
    /// Returns the seconds to simulate this frame: 0 on the first frame,
    /// otherwise the gap since the previous call clamped to `[0, max]`.
    pub fn update(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last_timestamp {
            Some(prev) if now_ms.is_finite() => ((now_ms - prev) / 1000.0).clamp(0.0, self.max_delta_secs),
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.last_timestamp = Some(now_ms);
        }
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn first_frame_is_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.update(12_345.0), 0.0);
    }

    #[test]
    fn returns_seconds_between_frames() {
        let mut clock = FrameClock::default();
        clock.update(1000.0);
        assert!(approx(clock.update(1016.0), 0.016));
        assert!(approx(clock.update(1116.0), 0.1));
    }

    #[test]
    fn long_gap_is_clamped() {
        let mut clock = FrameClock::default();
        clock.update(0.0);
        // Tab hidden for a minute.
        assert_eq!(clock.update(60_000.0), MAX_FRAME_DELTA_SECS);
        // The next frame measures from the resumed timestamp.
        assert!(approx(clock.update(60_020.0), 0.02));
    }

    #[test]
    fn backwards_timestamp_is_zero() {
        let mut clock = FrameClock::default();
        clock.update(500.0);
        assert_eq!(clock.update(400.0), 0.0);
        assert!(approx(clock.update(450.0), 0.05));
    }

    #[test]
    fn non_finite_timestamp_is_ignored() {
        let mut clock = FrameClock::default();
        clock.update(100.0);
        assert_eq!(clock.update(f64::NAN), 0.0);
        assert!(approx(clock.update(200.0), 0.1));
    }

    #[test]
    fn steady_60fps_sums_to_one_second() {
        let mut clock = FrameClock::default();
        clock.update(0.0);
        let total: f64 = (1..=60).map(|i| clock.update(i as f64 * 1000.0 / 60.0)).sum();
        assert!(approx(total, 1.0));
    }
}
