//! Timestamp utilities and the injectable clock used by cache TTL logic

use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Format for timestamps embedded in asset filenames.
///
/// Chosen so that lexicographic comparison of the rendered string matches
/// chronological order (no slashes or colons, fixed field widths).
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// Render a timestamp in the filename-safe, sortable format
pub fn filename_timestamp(t: DateTime<Utc>) -> String {
    t.format(FILENAME_TIMESTAMP_FORMAT).to_string()
}

/// Monotonic time source.
///
/// Components that reason about elapsed time (the scan cache's TTL) take a
/// `Clock` instead of calling `Instant::now()` directly, so tests can drive
/// time explicitly.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Production clock backed by `std::time::Instant`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for tests
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Advance the clock by `delta`
    pub fn advance(&self, delta: Duration) {
        let mut offset = self.offset.lock().unwrap();
        *offset += delta;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_timestamp_is_sortable() {
        use chrono::TimeZone;
        let earlier = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        assert!(filename_timestamp(earlier) < filename_timestamp(later));
    }

    #[test]
    fn test_filename_timestamp_has_no_path_separators() {
        let rendered = filename_timestamp(Utc::now());
        assert!(!rendered.contains('/'));
        assert!(!rendered.contains(':'));
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new();
        let t0 = clock.now();
        clock.advance(Duration::from_secs(31));
        let t1 = clock.now();
        assert_eq!(t1 - t0, Duration::from_secs(31));
    }

    #[test]
    fn test_manual_clock_is_stable_without_advance() {
        let clock = ManualClock::new();
        let t0 = clock.now();
        let t1 = clock.now();
        assert_eq!(t0, t1);
    }

}
