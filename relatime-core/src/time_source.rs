//! Time source abstraction for clock access
//!
//! The engine never reads the system clock directly. Hosts inject a
//! [`TimeSource`] so that embedders can supply whatever clock they have,
//! and tests can pin time to a known instant.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, FixedOffset, Local, Offset, TimeDelta, Utc};

/// Trait for accessing the current time.
///
/// Implementations provide the current instant and the UTC offset used to
/// render calendar dates and tooltips in the reader's local time.
pub trait TimeSource {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The local UTC offset. Defaults to UTC itself, which is what headless
    /// hosts usually want.
    fn local_offset(&self) -> FixedOffset {
        Utc.fix()
    }
}

/// Time source backed by the operating system clock.
pub struct SystemTimeSource;

impl SystemTimeSource {
    pub fn new() -> Self {
        SystemTimeSource
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_offset(&self) -> FixedOffset {
        *Local::now().offset()
    }
}

/// Manually driven time source for tests and deterministic hosts.
///
/// Cloning yields a handle onto the same clock, so one copy can be injected
/// into the engine while the test keeps another to advance time with.
#[derive(Clone)]
pub struct FixedTimeSource {
    millis: Arc<AtomicI64>,
    offset: FixedOffset,
}

impl FixedTimeSource {
    /// A clock pinned to `start`, reporting a UTC local offset.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self::with_offset(start, Utc.fix())
    }

    /// A clock pinned to `start` with an explicit local offset.
    pub fn with_offset(start: DateTime<Utc>, offset: FixedOffset) -> Self {
        FixedTimeSource {
            millis: Arc::new(AtomicI64::new(start.timestamp_millis())),
            offset,
        }
    }

    /// Move the clock to an absolute instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        self.millis.store(instant.timestamp_millis(), Ordering::Relaxed);
    }

    /// Advance the clock by `delta`. Negative deltas move it backwards.
    pub fn advance(&self, delta: TimeDelta) {
        self.millis
            .fetch_add(delta.num_milliseconds(), Ordering::Relaxed);
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::Relaxed))
            .unwrap_or(DateTime::UNIX_EPOCH)
    }

    fn local_offset(&self) -> FixedOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    #[test]
    fn test_system_time_source_sanity() {
        let source = SystemTimeSource::new();
        let now = source.now();

        // Basic sanity checks that we got a reasonable time
        assert!(now.year() >= 2000 && now.year() <= 2100, "Year should be reasonable");
        assert!(source.local_offset().local_minus_utc().abs() <= 14 * 3600);
    }

    #[test]
    fn test_fixed_time_source_reports_start() {
        let start = Utc.with_ymd_and_hms(2013, 11, 14, 13, 24, 43).unwrap();
        let source = FixedTimeSource::new(start);
        assert_eq!(source.now(), start);
        assert_eq!(source.local_offset(), Utc.fix());
    }

    #[test]
    fn test_fixed_time_source_advance() {
        let start = Utc.with_ymd_and_hms(2013, 11, 14, 13, 24, 43).unwrap();
        let source = FixedTimeSource::new(start);

        source.advance(TimeDelta::seconds(90));
        assert_eq!(source.now(), start + TimeDelta::seconds(90));

        source.advance(TimeDelta::milliseconds(-500));
        assert_eq!(source.now(), start + TimeDelta::milliseconds(89_500));
    }

    #[test]
    fn test_fixed_time_source_clones_share_the_clock() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let source = FixedTimeSource::new(start);
        let handle = source.clone();

        handle.advance(TimeDelta::minutes(5));
        assert_eq!(source.now(), start + TimeDelta::minutes(5));
    }

    #[test]
    fn test_fixed_time_source_custom_offset() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let source = FixedTimeSource::with_offset(start, offset);
        assert_eq!(source.local_offset(), offset);
    }
}
