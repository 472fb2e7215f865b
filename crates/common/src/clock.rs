//! Session clock utilities.
//!
//! Frame timestamps are monotonic nanoseconds since the session started.
//! This module anchors that monotonic timeline to wall-clock time so
//! persisted gesture records can carry absolute timestamps.

use chrono::{DateTime, Duration, Utc};

/// Anchors session timestamps (nanoseconds since session start) to the
/// wall-clock time the session started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClock {
    /// Wall-clock time at epoch.
    epoch_wall: DateTime<Utc>,
}

impl SessionClock {
    /// Create a new session clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch_wall: Utc::now(),
        }
    }

    /// Create a clock with a known wall-clock epoch (for replaying recordings).
    pub fn from_wall(epoch_wall: DateTime<Utc>) -> Self {
        Self { epoch_wall }
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> DateTime<Utc> {
        self.epoch_wall
    }

    /// Wall-clock time corresponding to a session timestamp.
    pub fn wall_time_at(&self, timestamp_ns: u64) -> DateTime<Utc> {
        let offset = i64::try_from(timestamp_ns).unwrap_or(i64::MAX);
        self.epoch_wall + Duration::nanoseconds(offset)
    }

    /// Convert an elapsed nanosecond value to seconds.
    pub fn ns_to_secs(ns: u64) -> f64 {
        ns as f64 / 1_000_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_anchored_now() {
        let before = Utc::now();
        let clock = SessionClock::start();
        assert!(clock.epoch_wall() >= before);
        assert!(clock.epoch_wall() <= Utc::now());
    }

    #[test]
    fn test_ns_to_secs_conversion() {
        assert!((SessionClock::ns_to_secs(1_500_000_000) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_wall_time_offsets_from_epoch() {
        let epoch = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let clock = SessionClock::from_wall(epoch);

        let later = clock.wall_time_at(1_250_000_000);
        assert_eq!(later.to_rfc3339(), "2026-01-01T00:00:01.250+00:00");
        assert_eq!(clock.wall_time_at(0), epoch);
    }
}
