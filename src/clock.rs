//! Simulation clock.
//!
//! Maps simulation milliseconds onto a UTC epoch and advances frame by frame
//! until the end of the recorded telemetry.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::ClockConfig;
use crate::model::TimeMs;

#[derive(Debug, Clone)]
pub struct SimulationClock {
    epoch: DateTime<Utc>,
    stop_ms: TimeMs,
    current_ms: TimeMs,
    multiplier: f64,
}

impl SimulationClock {
    pub fn new(epoch: DateTime<Utc>, stop_ms: TimeMs, multiplier: f64) -> Self {
        Self {
            epoch,
            stop_ms: stop_ms.max(0.0),
            current_ms: 0.0,
            multiplier,
        }
    }

    pub fn from_config(config: &ClockConfig, stop_ms: TimeMs) -> Self {
        Self::new(config.epoch, stop_ms, config.multiplier)
    }

    /// Milliseconds elapsed since the epoch
    pub fn elapsed_ms(&self) -> TimeMs {
        self.current_ms
    }

    pub fn stop_ms(&self) -> TimeMs {
        self.stop_ms
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    /// Absolute UTC time of the current position
    pub fn current_time(&self) -> Option<DateTime<Utc>> {
        self.time_at(self.current_ms)
    }

    /// Absolute UTC time of an arbitrary simulation offset, or `None` when it
    /// falls outside the representable calendar range
    pub fn time_at(&self, time_ms: TimeMs) -> Option<DateTime<Utc>> {
        let millis = time_ms.round();
        if !(millis.abs() < i64::MAX as f64) {
            return None;
        }
        let delta = TimeDelta::try_milliseconds(millis as i64)?;
        self.epoch.checked_add_signed(delta)
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn is_finished(&self) -> bool {
        self.current_ms >= self.stop_ms
    }

    /// Advance by `step` scaled by the multiplier, clamped at the stop time.
    /// Returns the new elapsed time.
    pub fn tick(&mut self, step: Duration) -> TimeMs {
        let advance = step.as_secs_f64() * 1000.0 * self.multiplier;
        self.current_ms = (self.current_ms + advance).min(self.stop_ms);
        self.current_ms
    }

    /// Jump to a simulation offset inside `[0, stop]`
    pub fn seek(&mut self, time_ms: TimeMs) {
        self.current_ms = time_ms.clamp(0.0, self.stop_ms);
    }

    pub fn reset(&mut self) {
        self.current_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_is_clamped_at_stop() {
        let mut clock = SimulationClock::from_config(&ClockConfig::default(), 2500.0);
        assert_eq!(clock.tick(Duration::from_secs(1)), 1000.0);
        assert_eq!(clock.tick(Duration::from_secs(1)), 2000.0);
        assert!(!clock.is_finished());
        assert_eq!(clock.tick(Duration::from_secs(1)), 2500.0);
        assert!(clock.is_finished());
    }

    #[test]
    fn test_multiplier_scales_steps() {
        let epoch = ClockConfig::default().epoch;
        let mut clock = SimulationClock::new(epoch, 10_000.0, 4.0);
        assert_eq!(clock.tick(Duration::from_millis(500)), 2000.0);
    }

    #[test]
    fn test_current_time_follows_epoch() {
        let mut clock = SimulationClock::from_config(&ClockConfig::default(), 120_000.0);
        clock.seek(90_500.0);
        assert_eq!(
            clock.current_time().unwrap().to_rfc3339(),
            "2026-01-27T12:01:30.500+00:00"
        );
        clock.seek(-5.0);
        assert_eq!(clock.elapsed_ms(), 0.0);
        clock.seek(1e12);
        assert_eq!(clock.elapsed_ms(), 120_000.0);
        clock.reset();
        assert_eq!(clock.elapsed_ms(), 0.0);
    }

    #[test]
    fn test_time_outside_calendar_range_has_no_timestamp() {
        let clock = SimulationClock::from_config(&ClockConfig::default(), 1e17);
        assert_eq!(clock.time_at(clock.stop_ms()), None);
        assert_eq!(clock.time_at(f64::NAN), None);
        assert_eq!(clock.time_at(-1e300), None);
        assert!(clock.time_at(1000.0).is_some());
    }
}
