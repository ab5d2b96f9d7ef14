//! Instants, spans and the clock they are read from

use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in time with millisecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Timestamp(instant)
    }

    /// Build a timestamp from milliseconds since the Unix epoch.
    /// Out-of-range values clamp to the epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(Utc.timestamp_millis_opt(millis).single().unwrap_or_default())
    }

    /// Milliseconds since the Unix epoch
    pub fn millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Shift by a signed span, saturating at the representable range
    pub fn plus(&self, span: Duration) -> Self {
        match self.0.checked_add_signed(span) {
            Some(shifted) => Timestamp(shifted),
            None if span < Duration::zero() => Timestamp(DateTime::<Utc>::MIN_UTC),
            None => Timestamp(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Elapsed time from `earlier` to `self`, negative if `earlier` is later
    pub fn since(&self, earlier: Timestamp) -> DurationValue {
        DurationValue::from_seconds((self.millis() - earlier.millis()) as f64 / 1000.0)
    }

    /// Parse an RFC 3339 instant
    pub fn parse(input: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(input)
            .ok()
            .map(|dt| Timestamp(dt.with_timezone(&Utc)))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// A signed span of time, in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DurationValue(f64);

impl DurationValue {
    pub fn from_seconds(seconds: f64) -> Self {
        DurationValue(seconds)
    }

    pub fn seconds(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Source of "now" for expiration checks and warning cooldowns
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp(Utc::now())
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        ManualClock {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, span: Duration) {
        let mut now = self.now.lock();
        *now = now.plus(span);
    }

    pub fn set(&self, instant: Timestamp) {
        *self.now.lock() = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_round_trip_through_constructor() {
        let ts = Timestamp::from_millis(1_700_000_000_123);
        assert_eq!(ts.millis(), 1_700_000_000_123);
    }

    #[test]
    fn test_since_is_negative_for_future_instant() {
        let now = Timestamp::from_millis(1_000_000);
        let later = now.plus(Duration::seconds(10));
        assert_eq!(now.since(later).seconds(), -10.0);
        assert_eq!(later.since(now).seconds(), 10.0);
    }

    #[test]
    fn test_plus_saturates_at_representable_range() {
        let now = Timestamp::from_millis(1_700_000_000_000);
        let huge = Duration::try_seconds(9_000_000_000_000).unwrap();

        let forward = now.plus(huge);
        assert_eq!(forward.as_datetime(), DateTime::<Utc>::MAX_UTC);
        assert!(forward > now);

        let backward = now.plus(-huge);
        assert_eq!(backward.as_datetime(), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_since_keeps_millisecond_fraction() {
        let a = Timestamp::from_millis(2_500);
        let b = Timestamp::from_millis(1_000);
        assert_eq!(a.since(b).seconds(), 1.5);
    }

    #[test]
    fn test_display_formats() {
        let ts = Timestamp::parse("2025-01-17T10:00:00Z").unwrap();
        assert_eq!(ts.to_string(), "2025-01-17T10:00:00.000Z");
        assert_eq!(DurationValue::from_seconds(-10.0).to_string(), "-10s");
        assert_eq!(DurationValue::from_seconds(1.5).to_string(), "1.5s");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_manual_clock_moves_only_when_told() {
        let clock = ManualClock::new(Timestamp::from_millis(0));
        assert_eq!(clock.now().millis(), 0);
        clock.advance(Duration::milliseconds(250));
        assert_eq!(clock.now().millis(), 250);
        clock.set(Timestamp::from_millis(10));
        assert_eq!(clock.now().millis(), 10);
    }
}
