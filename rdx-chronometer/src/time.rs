//! Time sources used by chronometers.
//!
//! A `TimeSource` yields a reading in fractional seconds. Only differences
//! between two readings of the same source are meaningful; the origin is
//! source-specific.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Process-wide origin for monotonic readings, captured on first use.
static MONOTONIC_ORIGIN: Lazy<Instant> = Lazy::new(Instant::now);

/// Something that can be asked for the current time.
pub trait TimeSource: Clone {
    /// The current reading in seconds.
    fn seconds(&self) -> f64;

    /// The current point in time, for display only.
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The host clock.
///
/// With `high_resolution` set, readings come from the monotonic clock and are
/// immune to wall-clock adjustments. Otherwise the wall clock is read and
/// truncated to microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemClock {
    high_resolution: bool,
}

impl SystemClock {
    pub fn new(high_resolution: bool) -> Self {
        Self { high_resolution }
    }

    pub fn is_high_resolution(&self) -> bool {
        self.high_resolution
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TimeSource for SystemClock {
    fn seconds(&self) -> f64 {
        if self.high_resolution {
            MONOTONIC_ORIGIN.elapsed().as_secs_f64()
        } else {
            Utc::now().timestamp_micros() as f64 / 1e6
        }
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same reading, so a test can keep one handle and advance
/// time under a chronometer that owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock reading zero seconds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.set(self.seconds() + by.as_secs_f64());
    }

    /// Sets the absolute reading, in seconds. Moving backwards is allowed.
    pub fn set(&self, seconds: f64) {
        self.bits.store(seconds.to_bits(), Ordering::SeqCst);
    }
}

impl TimeSource for ManualClock {
    fn seconds(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }

    fn now(&self) -> DateTime<Utc> {
        let micros = (self.seconds() * 1e6).round() as i64;
        DateTime::from_timestamp_micros(micros).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_readings_never_decrease() {
        let clock = SystemClock::new(true);
        let first = clock.seconds();
        let second = clock.seconds();
        assert!(second >= first);
    }

    #[test]
    fn test_wall_clock_is_unix_seconds() {
        let clock = SystemClock::new(false);
        let reading = clock.seconds();
        let expected = Utc::now().timestamp() as f64;
        assert!((reading - expected).abs() < 5.0);
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        assert_eq!(clock.seconds(), 0.0);

        handle.advance(Duration::from_millis(1500));
        assert_eq!(clock.seconds(), 1.5);

        clock.set(10.0);
        assert_eq!(handle.seconds(), 10.0);
        assert_eq!(handle.now().timestamp(), 10);
    }
}
